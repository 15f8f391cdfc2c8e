//! Compound (multi filter block) search.

use common::{api_error::ApiError, search_query::CompoundSearchRequest, search_result::CompoundSearchResponse};
use tracing::info;

use crate::portal_utils::portal_client::PortalClient;

pub async fn compound_search(client: &PortalClient, request: &CompoundSearchRequest) -> Result<CompoundSearchResponse, ApiError> {
    if request.filter_blocks.is_empty() {
        return Ok(CompoundSearchResponse::default());
    }
    info!(
        "Compound search over {} block(s), intersect = {}, from = {}",
        request.filter_blocks.len(),
        request.intersect,
        request.from
    );
    let body = serde_json::to_value(request).map_err(|e| ApiError::Decode { message: e.to_string() })?;
    match client.post_json("/compound_search", &body).await {
        // no hits is reported as 404
        Err(ApiError::NotFound { .. }) => Ok(CompoundSearchResponse::default()),
        other => other,
    }
}
