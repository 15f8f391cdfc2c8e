//! Page context documents for client-side navigation.

use common::api_error::ApiError;
use tracing::info;

use crate::portal_utils::portal_client::PortalClient;

/// The JSON document the portal serves for a page path.
pub async fn get_context(client: &PortalClient, href: &str) -> Result<serde_json::Value, ApiError> {
    let separator = if href.contains('?') { '&' } else { '?' };
    info!("Loading context for {}", href);
    client.get_json(&format!("{}{}frame=page&format=json", href, separator)).await
}
