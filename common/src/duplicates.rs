//! Duplicate filter block detection.
//!
//! Each block is only compared with the blocks before it, and the first match
//! is recorded. The later block is always the one flagged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter_block::{FilterBlock, ParsedQuery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DuplicateBlocks {
    /// index -> index of the first earlier block with the same name
    pub duplicate_names: BTreeMap<usize, usize>,
    /// index -> index of the first earlier block with the same parsed query
    pub duplicate_queries: BTreeMap<usize, usize>,
}

impl DuplicateBlocks {
    pub fn is_empty(&self) -> bool {
        self.duplicate_names.is_empty() && self.duplicate_queries.is_empty()
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.duplicate_names.contains_key(&index) || self.duplicate_queries.contains_key(&index)
    }
}

pub fn find_duplicate_blocks(blocks: &[FilterBlock]) -> DuplicateBlocks {
    let parsed: Vec<ParsedQuery> = blocks.iter().map(|b| b.parsed_query()).collect();
    let mut result = DuplicateBlocks::default();

    for (j, block) in blocks.iter().enumerate() {
        if let Some(i) = blocks[..j].iter().position(|earlier| earlier.name == block.name) {
            result.duplicate_names.insert(j, i);
        }
        if let Some(i) = parsed[..j].iter().position(|earlier| *earlier == parsed[j]) {
            result.duplicate_queries.insert(j, i);
        }
    }
    result
}
