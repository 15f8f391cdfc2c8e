//! Appending curated selections to a case's VariantSampleList.

use common::{
    api_error::ApiError,
    case::CaseSummary,
    variant_sample_list::{VariantSampleList, VariantSampleSelection},
};
use serde_json::json;
use tracing::info;

use crate::{api::filter_sets::item_path, portal_utils::portal_client::PortalClient};

pub async fn get_variant_sample_list(client: &PortalClient, id: &str) -> Result<VariantSampleList, ApiError> {
    let path = item_path("variant-sample-lists", id);
    client.get_json(&format!("{}?datastore=database&frame=object", path)).await
}

/// Add selections to the case's list, creating (and linking) the list on
/// first use. Existing entries are sent back unchanged.
pub async fn add_to_variant_sample_list(
    client: &PortalClient,
    case: &CaseSummary,
    selections: Vec<VariantSampleSelection>,
) -> Result<VariantSampleList, ApiError> {
    match &case.variant_sample_list_id {
        Some(id) => {
            let mut list = get_variant_sample_list(client, id).await?;
            let appended = list.append(selections);
            if appended == 0 {
                return Ok(list);
            }
            let Some(at_id) = list.at_id.clone() else {
                return Err(ApiError::Decode { message: "VariantSampleList has no @id".to_string() });
            };
            info!("Appending {} selection(s) to {}", appended, at_id);
            client.patch_item(&at_id, &list.patch_payload()).await
        }
        None => {
            let mut list = VariantSampleList {
                created_for_case: Some(case.accession.clone()),
                ..Default::default()
            };
            list.append(selections);
            let mut payload = list.create_payload();
            if let (serde_json::Value::Object(map), Some(project)) = (&mut payload, &case.project) {
                map.insert("project".into(), project.clone().into());
            }
            info!("Creating VariantSampleList for case {}", case.accession);
            let created: VariantSampleList = client.post_item("/variant-sample-lists/", &payload).await?;
            let Some(created_id) = created.at_id.clone() else {
                return Err(ApiError::Decode { message: "created VariantSampleList has no @id".to_string() });
            };
            let _case: serde_json::Value = client.patch_item(&case.at_id, &json!({ "variant_sample_list_id": created_id })).await?;
            Ok(created)
        }
    }
}
