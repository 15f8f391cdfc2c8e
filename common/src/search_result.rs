use serde::{Deserialize, Serialize};

use crate::facet_dictionary::FacetDefinition;


/// Response of `POST /compound_search` and `GET /search/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompoundSearchResponse {
    #[serde(rename = "@graph")]
    pub graph: Vec<SearchResultItem>,
    pub total: u64,
    pub facets: Vec<FacetDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResultItem {
    #[serde(rename = "@id")]
    pub at_id: String,
    #[serde(default)]
    pub display_title: String,
    /// Names of the filter blocks whose query matched this row.
    #[serde(rename = "__matching_filter_block_names", default)]
    pub matching_filter_block_names: Vec<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
