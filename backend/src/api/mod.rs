//! Portal API operations used by the workbench.

pub mod filter_sets;
pub mod compound_search;
pub mod schemas;
pub mod variant_sample_lists;
pub mod ingestion;
pub mod access_keys;
pub mod session;
pub mod context;
