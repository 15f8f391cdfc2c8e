//! Ingestion submission status.

use common::{api_error::ApiError, ingestion::IngestionSubmission, polling::PollPolicy};
use tracing::info;

use crate::{api::filter_sets::item_path, config::PortalConfig, portal_utils::portal_client::PortalClient};

pub async fn get_submission(client: &PortalClient, id: &str) -> Result<IngestionSubmission, ApiError> {
    let path = item_path("ingestion-submissions", id);
    client.get_json(&format!("{}?datastore=database&frame=object", path)).await
}

/// The polling cadence clients should use for submissions, from
/// `PORTAL_POLL_INTERVAL_MS` and `PORTAL_POLL_MAX_ATTEMPTS`.
pub fn configured_poll_policy() -> Result<PollPolicy, ApiError> {
    let config = PortalConfig::from_env().map_err(|e| ApiError::Server { status: 500, message: format!("Portal configuration: {:#}", e) })?;
    info!("Submission polling every {:?}, at most {} checks", config.poll.interval, config.poll.max_attempts);
    Ok(config.poll)
}
