//! Compound search request models.

use serde::{Deserialize, Serialize};

use crate::{filter_block::FilterBlock, filter_set::FilterSetFlag, portal_const::{DEFAULT_SEARCH_TYPE, PAGE_SIZE}};


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompoundFilterBlock {
    pub name: String,
    pub query: String,
    pub flags_applied: Vec<String>,
}

impl From<&FilterBlock> for CompoundFilterBlock {
    fn from(block: &FilterBlock) -> Self {
        Self { name: block.name.clone(), query: block.query.clone(), flags_applied: block.flags_applied.clone() }
    }
}

/// Body of `POST /compound_search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundSearchRequest {
    pub filter_blocks: Vec<CompoundFilterBlock>,
    pub flags: Vec<FilterSetFlag>,
    pub intersect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_flags: Option<String>,
    pub search_type: String,
    pub from: u64,
    pub limit: u64,
}

impl Default for CompoundSearchRequest {
    fn default() -> Self {
        Self {
            filter_blocks: vec![],
            flags: vec![],
            intersect: false,
            global_flags: None,
            search_type: DEFAULT_SEARCH_TYPE.to_string(),
            from: 0,
            limit: PAGE_SIZE,
        }
    }
}

impl CompoundSearchRequest {
    pub fn page(mut self, page_number: u64) -> Self {
        self.from = page_number * self.limit;
        self
    }
}
