//! Access key documents.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccessKey {
    #[serde(rename = "@id")]
    pub at_id: String,
    pub uuid: Option<String>,
    pub access_key_id: String,
    pub description: Option<String>,
    pub date_created: Option<String>,
    pub status: Option<String>,
}

/// Returned on creation or secret reset. The secret is never shown again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeySecret {
    #[serde(rename = "@id", default)]
    pub at_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}
