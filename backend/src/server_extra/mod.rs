//! Plain axum routes mounted next to the Dioxus router.

pub mod export_filter_set;
