//! Categorized failures of portal requests, shared by server and client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alerts::{Alert, AlertStyle};

/// One entry of the `errors` list in a portal validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    #[error("Validation failed ({} error(s))", .details.len())]
    Validation { details: Vec<ValidationDetail> },

    #[error("Permission denied: {message}")]
    Permission { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Gave up after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("Unexpected response: {message}")]
    Decode { message: String },
}

const SERVER_MESSAGE_PREFIX: &str = "portal-error:";

impl ApiError {
    pub fn is_permission(&self) -> bool {
        matches!(self, ApiError::Permission { .. })
    }

    /// Alert shown to the user for this failure.
    pub fn to_alert(&self) -> Alert {
        match self {
            ApiError::Validation { details } => Alert::new(
                "Validation Failure",
                details.iter().map(|d| format!("{}: {}", d.name, d.description)).collect(),
                AlertStyle::Danger,
            ),
            ApiError::Permission { message } => Alert::new(
                "Not Permitted",
                vec![message.clone(), "You may not have access to edit this item.".to_string()],
                AlertStyle::Warning,
            ),
            ApiError::NotFound { resource } => Alert::new("Not Found", vec![format!("Could not find {}", resource)], AlertStyle::Warning),
            ApiError::Network { message } => Alert::new(
                "Network Error",
                vec![message.clone(), "Check your connection and try again.".to_string()],
                AlertStyle::Danger,
            ),
            ApiError::Server { status, message } => {
                Alert::new("Server Error", vec![format!("{}: {}", status, message)], AlertStyle::Danger)
            }
            ApiError::Timeout { attempts } => Alert::new(
                "Timed Out",
                vec![format!("No result after {} checks. The job may still be running; reload later.", attempts)],
                AlertStyle::Warning,
            ),
            ApiError::Decode { message } => Alert::new("Unexpected Response", vec![message.clone()], AlertStyle::Danger),
        }
    }

    /// Encoded form carried in a server function error message.
    pub fn to_server_message(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("{SERVER_MESSAGE_PREFIX}{json}"),
            Err(_) => self.to_string(),
        }
    }

    /// Recover the error from a server function message. Anything not
    /// produced by [`ApiError::to_server_message`] becomes a `Server` error.
    pub fn from_server_message(message: &str) -> Self {
        message
            .find(SERVER_MESSAGE_PREFIX)
            .and_then(|start| serde_json::from_str(&message[start + SERVER_MESSAGE_PREFIX.len()..]).ok())
            .unwrap_or_else(|| ApiError::Server { status: 500, message: message.to_string() })
    }
}
