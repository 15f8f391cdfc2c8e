//! Common library exports shared between frontend and backend.

extern crate serde;


pub mod portal_const;
pub mod api_error;
pub mod alerts;
pub mod filter_block;
pub mod case;
pub mod filter_set;
pub mod duplicates;
pub mod field_blocks;
pub mod facet_dictionary;
pub mod selection;
pub mod save_state;
pub mod throttle;
pub mod polling;
pub mod navigation;
pub mod variant_sample_list;
pub mod search_query;
pub mod search_result;
pub mod ingestion;
pub mod access_key;
pub mod app_state;
pub mod hydration;
pub mod page_titles;
