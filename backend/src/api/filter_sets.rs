//! Loading and saving FilterSets.

use common::{
    api_error::ApiError,
    case::CaseSummary,
    filter_set::{FilterSet, SavedFilterSet},
};
use serde_json::json;
use tracing::{info, warn};

use crate::portal_utils::portal_client::PortalClient;

/// Path for an item given either its `@id` or its uuid/accession.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    if id.starts_with('/') {
        id.to_string()
    } else {
        format!("/{}/{}/", collection, id)
    }
}

pub async fn get_case(client: &PortalClient, case_id: &str) -> Result<CaseSummary, ApiError> {
    let path = item_path("cases", case_id);
    client.get_json(&format!("{}?frame=object", path)).await
}

pub async fn get_filter_set(client: &PortalClient, id: &str) -> Result<FilterSet, ApiError> {
    let path = item_path("filter-sets", id);
    client.get_json(&format!("{}?datastore=database&frame=object", path)).await
}

/// The case's active FilterSet, or a blank unsaved one when it has none.
pub async fn load_case_filter_set(client: &PortalClient, case: &CaseSummary) -> Result<FilterSet, ApiError> {
    match &case.active_filterset {
        Some(id) => get_filter_set(client, id).await,
        None => Ok(FilterSet::blank(Some(&case.accession))),
    }
}

/// The preset a FilterSet was copied from, if it still exists.
pub async fn load_origin_preset(client: &PortalClient, filter_set: &FilterSet) -> Result<Option<FilterSet>, ApiError> {
    let Some(preset_id) = &filter_set.derived_from_preset_filterset else {
        return Ok(None);
    };
    match get_filter_set(client, preset_id).await {
        Ok(preset) => Ok(Some(preset)),
        Err(ApiError::NotFound { .. }) => {
            warn!("Preset {} no longer exists", preset_id);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Persist a FilterSet. A new one is POSTed, an existing one is PATCHed with
/// its comparable fields, and either way the case is pointed at it if it is
/// not already. A failed link does not lose the stored document: it comes
/// back with `link_error` set so the next save only has to retry the link.
pub async fn save_filter_set(client: &PortalClient, case: &CaseSummary, filter_set: &FilterSet) -> Result<SavedFilterSet, ApiError> {
    let stored: FilterSet = match &filter_set.at_id {
        Some(at_id) => {
            info!("Saving FilterSet {}", at_id);
            let body = serde_json::to_value(filter_set.comparable()).map_err(|e| ApiError::Decode { message: e.to_string() })?;
            let mut stored: FilterSet = client.patch_item(at_id, &body).await?;
            stored.at_id.get_or_insert_with(|| at_id.clone());
            stored
        }
        None => {
            info!("Creating FilterSet for case {}", case.accession);
            let mut payload = filter_set.create_payload();
            if let serde_json::Value::Object(map) = &mut payload {
                if filter_set.created_in_case_accession.is_none() && !case.accession.is_empty() {
                    map.insert("created_in_case_accession".into(), case.accession.clone().into());
                }
                if let Some(project) = &case.project {
                    map.insert("project".into(), project.clone().into());
                }
            }
            client.post_item("/filter-sets/", &payload).await?
        }
    };
    let Some(stored_id) = stored.at_id.clone() else {
        return Err(ApiError::Decode { message: "stored FilterSet has no @id".to_string() });
    };
    if case.active_filterset.as_deref() == Some(stored_id.as_str()) {
        return Ok(SavedFilterSet { filter_set: stored, link_error: None });
    }
    info!("Linking FilterSet {} to case {}", stored_id, case.at_id);
    let linked: Result<serde_json::Value, ApiError> = client.patch_item(&case.at_id, &json!({ "active_filterset": stored_id })).await;
    let link_error = linked.err();
    if let Some(e) = &link_error {
        warn!("FilterSet {} stored but not linked to case {}: {}", stored_id, case.at_id, e);
    }
    Ok(SavedFilterSet { filter_set: stored, link_error })
}

/// Save the FilterSet's current content as a new preset.
pub async fn create_preset(
    client: &PortalClient,
    filter_set: &FilterSet,
    title: &str,
    project: Option<&str>,
    user: Option<&str>,
) -> Result<FilterSet, ApiError> {
    info!("Creating preset '{}'", title);
    client.post_item("/filter-sets/", &filter_set.preset_payload(title, project, user)).await
}

pub async fn list_presets(client: &PortalClient, project: &str, search_type: &str) -> Result<Vec<FilterSet>, ApiError> {
    let query = form_query(&[
        ("type", "FilterSet"),
        ("preset_for_projects", project),
        ("search_type", search_type),
        ("sort", "-date_created"),
    ]);
    Ok(client.search::<FilterSet>(&query).await?.graph)
}

pub(crate) fn form_query(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
}
