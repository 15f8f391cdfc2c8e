//! Shared constants for the portal client.

pub const DEFAULT_SEARCH_TYPE: &str = "VariantSample";

/// Rows requested per compound search page.
pub const PAGE_SIZE: u64 = 25;

/// Repeated save clicks inside this window collapse into one request.
pub const SAVE_THROTTLE_MS: u64 = 1000;

/// A request still pending after this long shows the slow-network indicator.
pub const SLOW_NETWORK_THRESHOLD_MS: u64 = 1500;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 24;

/// Shown when leaving a page that holds unsaved FilterSet edits.
pub const UNSAVED_CHANGES_WARNING: &str = "The FilterSet has unsaved changes. Leave anyway?";
