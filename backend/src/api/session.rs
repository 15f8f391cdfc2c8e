use common::{api_error::ApiError, app_state::SessionUser};
use serde::Deserialize;

use crate::portal_utils::portal_client::PortalClient;

#[derive(Debug, Deserialize)]
struct SessionProperties {
    #[serde(default)]
    details: Option<SessionUser>,
    #[serde(default)]
    user_uuid: Option<String>,
}

/// The signed-in user, or `None` for an anonymous session.
pub async fn get_session_user(client: &PortalClient) -> Result<Option<SessionUser>, ApiError> {
    let properties: SessionProperties = client.get_json("/session-properties").await?;
    Ok(properties.details.map(|mut user| {
        if user.uuid.is_empty() {
            user.uuid = properties.user_uuid.unwrap_or_default();
        }
        user
    }))
}
