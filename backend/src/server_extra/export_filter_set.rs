use anyhow::Context;
use axum::{body::Body, extract::Path, http::StatusCode, response::{IntoResponse, Response}};
use common::api_error::ApiError;
use tracing::info;

use crate::{api::filter_sets::get_filter_set, portal_utils::portal_client::get_portal_client};

async fn _export_filter_set(filter_set_id: String) -> anyhow::Result<Response> {
    info!("Exporting FilterSet: {}", filter_set_id);

    let client = get_portal_client()?;
    let filter_set = get_filter_set(&client, &filter_set_id).await?;
    let mut export = serde_json::to_value(filter_set.comparable()).context("Failed to serialize FilterSet")?;
    if let serde_json::Value::Object(map) = &mut export {
        map.insert("search_type".into(), filter_set.search_type.clone().into());
    }
    let data = serde_json::to_vec_pretty(&export).context("Failed to serialize FilterSet")?;

    let filename = format!("filterset-{}.json", filter_set.uuid.as_deref().unwrap_or(&filter_set_id));
    let headers: [(String, String); 2] = [
        ("Content-Type".to_string(), "application/json".to_string()),
        (
           "Content-Disposition".to_string(),
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, Body::from(data)).into_response())
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::NotFound { .. }) => StatusCode::NOT_FOUND,
        Some(ApiError::Permission { .. }) => StatusCode::FORBIDDEN,
        Some(ApiError::Network { .. }) | Some(ApiError::Server { .. }) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn export_filter_set(Path(filter_set_id): Path<String>) -> Response {
    match _export_filter_set(filter_set_id).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("export_filter_set: request failed: {:#?}", e);
            (status_for(&e), Body::from(e.to_string())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_errors_keep_their_status() {
        let not_found = anyhow::Error::new(ApiError::NotFound { resource: "/filter-sets/x/".into() });
        assert_eq!(status_for(&not_found), StatusCode::NOT_FOUND);
        let offline = anyhow::Error::new(ApiError::Network { message: "refused".into() });
        assert_eq!(status_for(&offline), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&anyhow::anyhow!("other")), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
