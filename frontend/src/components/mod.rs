pub mod error_boundary;
pub mod suspend_boundary;
pub mod alerts;
pub mod navbar;
pub mod filter_set_components;
