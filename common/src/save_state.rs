//! Save-state and preset-derivation tracking for a FilterSet being edited.

use serde::{Deserialize, Serialize};

use crate::{
    api_error::ApiError,
    duplicates::find_duplicate_blocks,
    filter_set::{ComparableFilterSet, FilterSet},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SaveState {
    /// Never saved; there is no server id yet.
    UnsavedNew,
    Saved,
    Dirty,
    Saving,
    /// The last save failed and the content has not changed since.
    Error(ApiError),
}

impl SaveState {
    pub fn can_save(&self) -> bool {
        matches!(self, SaveState::UnsavedNew | SaveState::Dirty | SaveState::Error(_))
    }

    /// Leaving the page would lose edits.
    pub fn has_unsaved_changes(&self) -> bool {
        !matches!(self, SaveState::Saved)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveTracker {
    last_saved: Option<ComparableFilterSet>,
    in_flight: Option<ComparableFilterSet>,
    failed: Option<(ComparableFilterSet, ApiError)>,
}

impl SaveTracker {
    /// Tracker for a FilterSet as loaded from the server (or a blank one).
    pub fn for_loaded(filter_set: &FilterSet) -> Self {
        Self {
            last_saved: filter_set.is_saved().then(|| filter_set.comparable()),
            in_flight: None,
            failed: None,
        }
    }

    pub fn state(&self, current: &FilterSet) -> SaveState {
        if self.in_flight.is_some() {
            return SaveState::Saving;
        }
        let comparable = current.comparable();
        if let Some((content, error)) = &self.failed {
            if *content == comparable {
                return SaveState::Error(error.clone());
            }
        }
        match &self.last_saved {
            _ if !current.is_saved() => SaveState::UnsavedNew,
            None => SaveState::UnsavedNew,
            Some(saved) if *saved == comparable => SaveState::Saved,
            Some(_) => SaveState::Dirty,
        }
    }

    /// Something to save, and no two blocks share a name or a query.
    pub fn can_save(&self, current: &FilterSet) -> bool {
        self.state(current).can_save() && find_duplicate_blocks(&current.filter_blocks).is_empty()
    }

    /// Mark a save as started. Returns `false` if there is nothing to save,
    /// blocks are duplicated, or a save is already in flight.
    pub fn begin_save(&mut self, current: &FilterSet) -> bool {
        if !self.can_save(current) {
            return false;
        }
        self.in_flight = Some(current.comparable());
        self.failed = None;
        true
    }

    /// Record the outcome. On success the snapshot taken by `begin_save`
    /// becomes the last-saved content, so edits made during the request still
    /// count as unsaved.
    pub fn finish_save(&mut self, outcome: Result<(), ApiError>) {
        let Some(content) = self.in_flight.take() else {
            return;
        };
        match outcome {
            Ok(()) => self.last_saved = Some(content),
            Err(error) => self.failed = Some((content, error)),
        }
    }
}

/// Gates the "Create Preset" action: the FilterSet must be saved and clean,
/// and its content must differ from both the preset it was copied from and
/// the last preset created from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresetTracker {
    derived_from: Option<ComparableFilterSet>,
    last_created: Option<ComparableFilterSet>,
}

impl PresetTracker {
    pub fn new(derived_from: Option<&FilterSet>) -> Self {
        Self { derived_from: derived_from.map(|p| p.comparable()), last_created: None }
    }

    /// True when there is no origin preset or the content has moved away from it.
    /// Titles are ignored; renaming alone is not a divergence.
    pub fn diverged_from_preset(&self, current: &FilterSet) -> bool {
        match &self.derived_from {
            None => true,
            Some(preset) => preset.filter_blocks != current.filter_blocks || preset.flags != current.flags,
        }
    }

    pub fn can_create_preset(&self, current: &FilterSet, save_state: &SaveState) -> bool {
        if *save_state != SaveState::Saved {
            return false;
        }
        let comparable = current.comparable();
        self.diverged_from_preset(current) && self.last_created.as_ref() != Some(&comparable)
    }

    pub fn record_preset_created(&mut self, current: &FilterSet) {
        self.last_created = Some(current.comparable());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_set() -> FilterSet {
        let mut fs = FilterSet::blank(Some("GAPCA1"));
        fs.at_id = Some("/filter-sets/abc/".into());
        fs
    }

    #[test]
    fn blank_set_is_unsaved_new_and_saveable() {
        let fs = FilterSet::blank(None);
        let tracker = SaveTracker::for_loaded(&fs);
        assert_eq!(tracker.state(&fs), SaveState::UnsavedNew);
        assert!(tracker.state(&fs).can_save());
    }

    #[test]
    fn save_enabled_iff_comparable_fields_differ() {
        let mut fs = saved_set();
        let tracker = SaveTracker::for_loaded(&fs);
        assert_eq!(tracker.state(&fs), SaveState::Saved);
        assert!(!tracker.state(&fs).can_save());

        fs.status = Some("shared".into());
        assert!(!tracker.state(&fs).can_save());

        fs.title = "Renamed".into();
        assert_eq!(tracker.state(&fs), SaveState::Dirty);
        fs.title = "FilterSet for GAPCA1".into();
        assert_eq!(tracker.state(&fs), SaveState::Saved);
    }

    #[test]
    fn saves_are_serialized_and_snapshot_on_begin() {
        let mut fs = saved_set();
        let mut tracker = SaveTracker::for_loaded(&fs);
        fs.set_block_query(0, "impact=HIGH").unwrap();
        assert!(tracker.begin_save(&fs));
        assert!(!tracker.begin_save(&fs));
        assert_eq!(tracker.state(&fs), SaveState::Saving);

        fs.set_block_query(0, "impact=LOW").unwrap();
        tracker.finish_save(Ok(()));
        assert_eq!(tracker.state(&fs), SaveState::Dirty);
        fs.set_block_query(0, "impact=HIGH").unwrap();
        assert_eq!(tracker.state(&fs), SaveState::Saved);
    }

    #[test]
    fn failed_save_surfaces_until_content_changes() {
        let mut fs = saved_set();
        let mut tracker = SaveTracker::for_loaded(&fs);
        fs.title = "x".into();
        assert!(tracker.begin_save(&fs));
        let error = ApiError::Permission { message: "no".into() };
        tracker.finish_save(Err(error.clone()));
        assert_eq!(tracker.state(&fs), SaveState::Error(error));
        assert!(tracker.state(&fs).can_save());
        fs.title = "y".into();
        assert_eq!(tracker.state(&fs), SaveState::Dirty);
    }

    #[test]
    fn duplicate_blocks_block_saving() {
        let mut fs = saved_set();
        let mut tracker = SaveTracker::for_loaded(&fs);
        fs.rename_block(0, "A").unwrap();
        fs.set_block_query(0, "type=Gene").unwrap();
        fs.add_block("type=Gene");
        assert_eq!(tracker.state(&fs), SaveState::Dirty);
        assert!(!tracker.can_save(&fs));
        assert!(!tracker.begin_save(&fs));
        assert_eq!(tracker.state(&fs), SaveState::Dirty);

        fs.set_block_query(1, "type=Variant").unwrap();
        assert!(tracker.can_save(&fs));
        assert!(tracker.begin_save(&fs));
    }

    #[test]
    fn first_save_of_new_set() {
        let mut fs = FilterSet::blank(None);
        let mut tracker = SaveTracker::for_loaded(&fs);
        assert!(tracker.begin_save(&fs));
        tracker.finish_save(Ok(()));
        fs.at_id = Some("/filter-sets/new/".into());
        assert_eq!(tracker.state(&fs), SaveState::Saved);
    }

    #[test]
    fn preset_gate() {
        let mut preset = saved_set();
        preset.title = "Preset".into();
        let mut fs = FilterSet::from_preset(&preset, Some("GAPCA1"));
        fs.at_id = Some("/filter-sets/copy/".into());
        let mut presets = PresetTracker::new(Some(&preset));
        let tracker = SaveTracker::for_loaded(&fs);

        assert!(!presets.can_create_preset(&fs, &tracker.state(&fs)));

        fs.set_block_query(0, "impact=HIGH").unwrap();
        let tracker = SaveTracker::for_loaded(&fs);
        assert!(presets.can_create_preset(&fs, &tracker.state(&fs)));
        assert!(!presets.can_create_preset(&fs, &SaveState::Dirty));

        presets.record_preset_created(&fs);
        assert!(!presets.can_create_preset(&fs, &tracker.state(&fs)));
    }
}
