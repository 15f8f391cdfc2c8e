//! Portal HTTP helpers.

pub mod portal_client;
