//! Access key management for the signed-in user.

use common::{
    access_key::{AccessKey, AccessKeySecret},
    api_error::ApiError,
};
use serde_json::json;
use tracing::info;

use crate::{api::filter_sets::form_query, portal_utils::portal_client::PortalClient};

pub async fn list_access_keys(client: &PortalClient, user_uuid: &str) -> Result<Vec<AccessKey>, ApiError> {
    let query = form_query(&[("type", "AccessKey"), ("user.uuid", user_uuid), ("sort", "-date_created")]);
    Ok(client.search::<AccessKey>(&query).await?.graph)
}

pub async fn create_access_key(client: &PortalClient) -> Result<AccessKeySecret, ApiError> {
    info!("Creating access key");
    client.post_json("/access-keys/", &json!({})).await
}

pub async fn reset_access_key_secret(client: &PortalClient, at_id: &str) -> Result<AccessKeySecret, ApiError> {
    info!("Resetting secret of {}", at_id);
    client.post_json(&format!("{}?currentAction=reset-secret", at_id), &json!({})).await
}

pub async fn delete_access_key(client: &PortalClient, at_id: &str) -> Result<(), ApiError> {
    info!("Deleting {}", at_id);
    let _: serde_json::Value = client.patch_json(at_id, &json!({ "status": "deleted" })).await?;
    Ok(())
}
