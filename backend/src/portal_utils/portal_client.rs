//! JSON-over-HTTP client for the portal REST API.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use common::api_error::{ApiError, ValidationDetail};

use crate::config::PortalConfig;

/// Body of a successful POST or PATCH: the written item inside `@graph`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    #[serde(rename = "@graph")]
    pub graph: Vec<T>,
}

/// Body of `GET /search/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(rename = "@graph", default = "Vec::new")]
    pub graph: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorName {
    One(String),
    Path(Vec<serde_json::Value>),
}

impl ErrorName {
    fn joined(self) -> String {
        match self {
            ErrorName::One(name) => name,
            ErrorName::Path(parts) => parts
                .iter()
                .map(|p| match p {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("."),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawErrorDetail {
    name: Option<ErrorName>,
    #[serde(default)]
    description: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawErrorBody {
    title: Option<String>,
    description: Option<String>,
    detail: Option<String>,
    errors: Vec<RawErrorDetail>,
}

/// Map a failed response to an [`ApiError`].
pub fn error_from_response(status: StatusCode, body: &str, path: &str) -> ApiError {
    let parsed = serde_json::from_str::<RawErrorBody>(body).unwrap_or_default();
    let message = parsed
        .detail
        .clone()
        .or(parsed.description.clone())
        .or(parsed.title.clone())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    match status {
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST => {
            let mut details: Vec<ValidationDetail> = parsed
                .errors
                .into_iter()
                .map(|e| ValidationDetail {
                    name: e.name.map(|n| n.joined()).unwrap_or_default(),
                    description: e.description,
                    location: e.location,
                })
                .collect();
            if details.is_empty() {
                details.push(ValidationDetail { name: path.to_string(), description: message, location: None });
            }
            ApiError::Validation { details }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Permission { message },
        StatusCode::NOT_FOUND => ApiError::NotFound { resource: path.to_string() },
        _ => ApiError::Server { status: status.as_u16(), message },
    }
}

fn error_from_transport(error: reqwest::Error) -> ApiError {
    if error.is_decode() {
        ApiError::Decode { message: error.to_string() }
    } else {
        ApiError::Network { message: error.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl PortalClient {
    pub fn new(config: &PortalConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(error_from_transport)?;
        Ok(Self { http, base_url: config.base_url.clone(), auth_token: config.auth_token.clone() })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn request<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<&serde_json::Value>) -> Result<T, ApiError> {
        let url = self.url(path);
        info!("PORTAL {} {}", method, url);
        let mut request = self.http.request(method.clone(), &url).header("Accept", "application/json");
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(error_from_transport)?;
        let status = response.status();
        let response_txt = response.text().await.map_err(error_from_transport)?;
        if status.is_client_error() || status.is_server_error() {
            warn!("PORTAL {} {} failed: {}", method, url, status);
            return Err(error_from_response(status, &response_txt, path));
        }
        debug!("PORTAL RESPONSE: len = {}", response_txt.len());
        serde_json::from_str(&response_txt).map_err(|e| ApiError::Decode { message: format!("{} {}: {}", method, path, e) })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch_json<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T, ApiError> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    fn first_item<T>(response: ItemResponse<T>, path: &str) -> Result<T, ApiError> {
        response
            .graph
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode { message: format!("{}: response @graph was empty", path) })
    }

    /// POST a new item and return it as stored.
    pub async fn post_item<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T, ApiError> {
        let response: ItemResponse<T> = self.post_json(path, body).await?;
        Self::first_item(response, path)
    }

    /// PATCH an item and return it as stored.
    pub async fn patch_item<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T, ApiError> {
        let response: ItemResponse<T> = self.patch_json(path, body).await?;
        Self::first_item(response, path)
    }

    /// `GET /search/`. The portal answers an empty search with 404, which is
    /// returned here as an empty result.
    pub async fn search<T: DeserializeOwned>(&self, query: &str) -> Result<SearchResponse<T>, ApiError> {
        let path = format!("/search/?{}", query.trim_start_matches('?'));
        match self.get_json(&path).await {
            Err(ApiError::NotFound { .. }) => Ok(SearchResponse { graph: vec![], total: 0 }),
            other => other,
        }
    }
}

/// Client configured from the environment.
pub fn get_portal_client() -> Result<PortalClient, ApiError> {
    let config = PortalConfig::from_env().map_err(|e| ApiError::Server { status: 500, message: format!("Portal configuration: {:#}", e) })?;
    PortalClient::new(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_body_is_itemized() {
        let body = r#"{"status": "error", "code": 422, "title": "Unprocessable Entity", "description": "Failed validation",
            "errors": [{"location": "body", "name": ["filter_blocks", 0, "query"], "description": "'x' is not of type 'string'"},
                       {"location": "body", "name": "title", "description": "required"}]}"#;
        let error = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body, "/filter-sets/");
        let ApiError::Validation { details } = error else { panic!("expected validation error") };
        assert_eq!(details[0].name, "filter_blocks.0.query");
        assert_eq!(details[1].name, "title");
        assert_eq!(details[1].location.as_deref(), Some("body"));
    }

    #[test]
    fn statuses_map_to_categories() {
        let forbidden = error_from_response(StatusCode::FORBIDDEN, r#"{"detail": "Unauthorized: edit failed permission check"}"#, "/cases/X/");
        assert_eq!(forbidden, ApiError::Permission { message: "Unauthorized: edit failed permission check".into() });
        assert_eq!(error_from_response(StatusCode::NOT_FOUND, "", "/x/"), ApiError::NotFound { resource: "/x/".into() });
        assert_eq!(
            error_from_response(StatusCode::BAD_GATEWAY, "<html>", "/x/"),
            ApiError::Server { status: 502, message: "Bad Gateway".into() }
        );
        let ApiError::Validation { details } = error_from_response(StatusCode::BAD_REQUEST, r#"{"description": "bad query"}"#, "/compound_search") else {
            panic!("expected validation error")
        };
        assert_eq!(details[0].description, "bad query");
    }

    #[test]
    fn urls_join_base_and_path() {
        let client = PortalClient::new(&PortalConfig::from_lookup(|_| None).unwrap()).unwrap();
        assert_eq!(client.url("/cases/X/"), "http://localhost:6543/cases/X/");
        assert_eq!(client.url("profiles/"), "http://localhost:6543/profiles/");
        assert_eq!(client.url("https://other.org/a"), "https://other.org/a");
    }
}
