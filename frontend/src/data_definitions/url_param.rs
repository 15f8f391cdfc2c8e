//! Route segments carrying structured state (base64 of CBOR).

use std::{fmt::Display, str::FromStr};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wraps a value so the router can put it in a path segment.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UrlParam<T>(pub T);

impl<T> From<T> for UrlParam<T> {
    fn from(value: T) -> Self {
        UrlParam(value)
    }
}

impl<T: Serialize> Display for UrlParam<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut serialized = Vec::new();
        if ciborium::into_writer(&self.0, &mut serialized).is_ok() {
            write!(f, "{}", URL_SAFE.encode(serialized))?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum UrlParamError {
    #[error("Failed to decode base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to deserialize: {0}")]
    Cbor(#[from] ciborium::de::Error<std::io::Error>),
}

impl<T: for<'de> Deserialize<'de>> FromStr for UrlParam<T> {
    type Err = UrlParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = URL_SAFE.decode(s.as_bytes())?;
        let parsed = ciborium::from_reader(std::io::Cursor::new(bytes))?;
        Ok(UrlParam(parsed))
    }
}
