//! Which filter blocks take part in a compound search, and whether a saved
//! selection still matches the current FilterSet.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    filter_block::parse_query,
    filter_set::FilterSet,
    search_query::{CompoundFilterBlock, CompoundSearchRequest},
    variant_sample_list::FilterBlocksUsed,
};

/// Selected block indices (empty means every block) plus the union/intersect
/// switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectionState {
    selected: BTreeSet<usize>,
    pub intersect: bool,
}

impl SelectionState {
    pub fn is_all(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.is_empty() || self.selected.contains(&index)
    }

    /// Toggle one block. Deselecting from "all" keeps every other block, and
    /// the last selected block cannot be deselected.
    pub fn toggle(&mut self, index: usize, block_count: usize) {
        if index >= block_count {
            return;
        }
        self.selected.retain(|i| *i < block_count);
        if self.selected.is_empty() {
            self.selected = (0..block_count).filter(|i| *i != index).collect();
        } else if self.selected.contains(&index) {
            if self.selected.len() == 1 {
                return;
            }
            self.selected.remove(&index);
        } else {
            self.selected.insert(index);
        }
        if self.selected.len() == block_count {
            self.selected.clear();
        }
    }

    /// Drop indices past the last block. Nothing left, or every block left,
    /// means all blocks.
    pub fn normalized(&self, block_count: usize) -> Self {
        let mut selected: BTreeSet<usize> = self.selected.iter().copied().filter(|i| *i < block_count).collect();
        if selected.len() == block_count {
            selected.clear();
        }
        Self { selected, intersect: self.intersect }
    }

    pub fn select_only(&mut self, index: usize, block_count: usize) {
        if index < block_count {
            self.selected = BTreeSet::from([index]);
            if block_count == 1 {
                self.selected.clear();
            }
        }
    }

    pub fn select_all(&mut self) {
        self.selected.clear();
    }

    pub fn set_intersect(&mut self, intersect: bool) {
        self.intersect = intersect;
    }

    pub fn effective_indices(&self, block_count: usize) -> Vec<usize> {
        if self.selected.is_empty() {
            (0..block_count).collect()
        } else {
            self.selected.iter().copied().filter(|i| *i < block_count).collect()
        }
    }

    /// Keep indices valid after the block at `removed` is deleted.
    pub fn on_block_removed(&mut self, removed: usize) {
        self.selected = self
            .selected
            .iter()
            .filter(|i| **i != removed)
            .map(|i| if *i > removed { i - 1 } else { *i })
            .collect();
    }

    /// Keep indices valid after a block is inserted at `inserted`.
    pub fn on_block_inserted(&mut self, inserted: usize) {
        if self.selected.is_empty() {
            return;
        }
        self.selected = self.selected.iter().map(|i| if *i >= inserted { i + 1 } else { *i }).collect();
    }

    pub fn to_compound_request(&self, filter_set: &FilterSet, global_flags: Option<String>) -> CompoundSearchRequest {
        let filter_blocks = self
            .effective_indices(filter_set.filter_blocks.len())
            .into_iter()
            .map(|i| CompoundFilterBlock::from(&filter_set.filter_blocks[i]))
            .collect();
        CompoundSearchRequest {
            filter_blocks,
            flags: filter_set.flags.clone(),
            intersect: self.intersect,
            global_flags,
            search_type: filter_set.search_type.clone(),
            ..Default::default()
        }
    }

    /// What to record on a VariantSampleList entry selected under this state.
    pub fn blocks_used(&self, filter_set: &FilterSet) -> FilterBlocksUsed {
        FilterBlocksUsed::from_blocks(
            self.effective_indices(filter_set.filter_blocks.len())
                .into_iter()
                .map(|i| &filter_set.filter_blocks[i]),
            self.intersect,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedBlockStatus {
    Unchanged,
    QueryChanged { current_query: String },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlockCheck {
    pub name: String,
    pub status: SavedBlockStatus,
}

/// Compare the blocks recorded on a saved selection with the FilterSet as it
/// is now, matching by block name.
pub fn check_saved_selection(used: &FilterBlocksUsed, filter_set: &FilterSet) -> Vec<SavedBlockCheck> {
    used.filter_blocks
        .iter()
        .map(|saved| {
            let status = match filter_set.filter_blocks.iter().find(|b| b.name == saved.name) {
                None => SavedBlockStatus::Missing,
                Some(current) if parse_query(&current.query) == parse_query(&saved.query) => SavedBlockStatus::Unchanged,
                Some(current) => SavedBlockStatus::QueryChanged { current_query: current.query.clone() },
            };
            SavedBlockCheck { name: saved.name.clone(), status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_block::FilterBlock;

    fn three_blocks() -> FilterSet {
        let mut fs = FilterSet::blank(None);
        fs.filter_blocks = vec![
            FilterBlock::new("A", "type=Gene"),
            FilterBlock::new("B", "impact=HIGH"),
            FilterBlock::new("C", "af.to=0.01"),
        ];
        fs
    }

    #[test]
    fn toggling_out_of_all_selects_the_rest() {
        let mut selection = SelectionState::default();
        selection.toggle(1, 3);
        assert_eq!(selection.effective_indices(3), vec![0, 2]);
        selection.toggle(1, 3);
        assert!(selection.is_all());
    }

    #[test]
    fn last_selected_block_stays_selected() {
        let mut selection = SelectionState::default();
        selection.select_only(2, 3);
        selection.toggle(2, 3);
        assert_eq!(selection.effective_indices(3), vec![2]);
    }

    #[test]
    fn out_of_range_indices_are_dropped() {
        let fs = {
            let mut fs = three_blocks();
            fs.remove_block(2).unwrap();
            fs
        };
        let mut stale = SelectionState::default();
        stale.select_only(2, 3);

        let selection = stale.normalized(2);
        assert!(selection.is_all());
        assert!(selection.is_selected(0) && selection.is_selected(1));
        assert_eq!(selection.to_compound_request(&fs, None).filter_blocks.len(), 2);

        let mut mixed = SelectionState::default();
        mixed.toggle(1, 4);
        let mixed = mixed.normalized(2);
        assert_eq!(mixed.effective_indices(2), vec![0]);
        assert!(!mixed.is_all());
    }

    #[test]
    fn toggle_ignores_stale_indices() {
        let mut stale = SelectionState::default();
        stale.select_only(3, 4);
        stale.toggle(0, 2);
        assert_eq!(stale.effective_indices(2), vec![1]);
        assert!(!stale.is_all());
    }

    #[test]
    fn removal_shifts_later_indices() {
        let mut selection = SelectionState::default();
        selection.select_only(2, 3);
        selection.toggle(0, 3);
        selection.on_block_removed(1);
        assert_eq!(selection.effective_indices(2), vec![0, 1]);
        selection.on_block_removed(1);
        assert_eq!(selection.effective_indices(1), vec![0]);
    }

    #[test]
    fn insertion_shifts_later_indices() {
        let mut selection = SelectionState::default();
        selection.select_only(1, 3);
        selection.on_block_inserted(1);
        assert_eq!(selection.effective_indices(4), vec![2]);
    }

    #[test]
    fn compound_request_uses_selected_blocks() {
        let fs = three_blocks();
        let mut selection = SelectionState::default();
        selection.select_only(1, 3);
        selection.set_intersect(true);
        let request = selection.to_compound_request(&fs, None);
        assert_eq!(request.filter_blocks.len(), 1);
        assert_eq!(request.filter_blocks[0].name, "B");
        assert!(request.intersect);
        assert_eq!(request.from, 0);
    }

    #[test]
    fn saved_selection_check() {
        let mut fs = three_blocks();
        let used = SelectionState::default().blocks_used(&fs);
        fs.set_block_query(1, "impact=MODERATE").unwrap();
        fs.remove_block(2).unwrap();
        let checks = check_saved_selection(&used, &fs);
        assert_eq!(checks[0].status, SavedBlockStatus::Unchanged);
        assert_eq!(checks[1].status, SavedBlockStatus::QueryChanged { current_query: "impact=MODERATE".into() });
        assert_eq!(checks[2].status, SavedBlockStatus::Missing);
    }
}
