//! Server-side access to the portal REST API.

pub mod config;
pub mod portal_utils;
pub mod api;
pub mod server_extra;
