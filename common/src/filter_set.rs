//! FilterSet documents and in-memory editing operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{api_error::ApiError, filter_block::FilterBlock, portal_const::DEFAULT_SEARCH_TYPE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterSetFlag {
    pub name: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub at_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub filter_blocks: Vec<FilterBlock>,
    #[serde(default = "default_search_type")]
    pub search_type: String,
    #[serde(default)]
    pub flags: Vec<FilterSetFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from_preset_filterset: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preset_for_projects: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preset_for_users: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_for_projects: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_in_case_accession: Option<String>,
}

fn default_search_type() -> String {
    DEFAULT_SEARCH_TYPE.to_string()
}

/// The fields that decide whether a FilterSet has unsaved changes. Fields the
/// server fills in by itself are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ComparableFilterSet {
    pub filter_blocks: Vec<FilterBlock>,
    pub title: String,
    pub flags: Vec<FilterSetFlag>,
}

/// Result of a save. The stored document is always returned once it exists;
/// `link_error` is set when it could not be made the case's active FilterSet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilterSet {
    pub filter_set: FilterSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterSetEditError {
    #[error("Cannot remove the last filter block")]
    LastBlock,
    #[error("No filter block at index {0}")]
    NoSuchBlock(usize),
}

impl FilterSet {
    /// A new, unsaved FilterSet with one empty block.
    pub fn blank(case_accession: Option<&str>) -> Self {
        let title = match case_accession {
            Some(accession) => format!("FilterSet for {}", accession),
            None => "New FilterSet".to_string(),
        };
        Self {
            at_id: None,
            uuid: None,
            title,
            filter_blocks: vec![FilterBlock::new("Filter Block 1", "")],
            search_type: default_search_type(),
            flags: vec![],
            status: Some("draft".to_string()),
            derived_from_preset_filterset: None,
            preset_for_projects: vec![],
            preset_for_users: vec![],
            default_for_projects: vec![],
            created_in_case_accession: case_accession.map(|a| a.to_string()),
        }
    }

    /// A new, unsaved copy of a preset, remembering where it came from.
    pub fn from_preset(preset: &FilterSet, case_accession: Option<&str>) -> Self {
        let mut copy = Self::blank(case_accession);
        copy.title = preset.title.clone();
        copy.filter_blocks = preset.filter_blocks.clone();
        copy.flags = preset.flags.clone();
        copy.search_type = preset.search_type.clone();
        copy.derived_from_preset_filterset = preset.uuid.clone().or_else(|| preset.at_id.clone());
        copy
    }

    pub fn is_saved(&self) -> bool {
        self.at_id.is_some()
    }

    pub fn comparable(&self) -> ComparableFilterSet {
        ComparableFilterSet {
            filter_blocks: self.filter_blocks.clone(),
            title: self.title.clone(),
            flags: self.flags.clone(),
        }
    }

    /// First `Filter Block N` name not used by any block.
    pub fn next_block_name(&self) -> String {
        let mut n = self.filter_blocks.len() + 1;
        loop {
            let name = format!("Filter Block {}", n);
            if !self.filter_blocks.iter().any(|b| b.name == name) {
                return name;
            }
            n += 1;
        }
    }

    /// Append a block and return its index.
    pub fn add_block(&mut self, query: impl Into<String>) -> usize {
        let name = self.next_block_name();
        self.filter_blocks.push(FilterBlock::new(name, query));
        self.filter_blocks.len() - 1
    }

    pub fn duplicate_block(&mut self, index: usize) -> Result<usize, FilterSetEditError> {
        let source = self.filter_blocks.get(index).ok_or(FilterSetEditError::NoSuchBlock(index))?.clone();
        let name = self.next_block_name();
        self.filter_blocks.insert(index + 1, FilterBlock { name, ..source });
        Ok(index + 1)
    }

    pub fn remove_block(&mut self, index: usize) -> Result<FilterBlock, FilterSetEditError> {
        if index >= self.filter_blocks.len() {
            return Err(FilterSetEditError::NoSuchBlock(index));
        }
        if self.filter_blocks.len() == 1 {
            return Err(FilterSetEditError::LastBlock);
        }
        Ok(self.filter_blocks.remove(index))
    }

    pub fn rename_block(&mut self, index: usize, name: impl Into<String>) -> Result<(), FilterSetEditError> {
        let block = self.filter_blocks.get_mut(index).ok_or(FilterSetEditError::NoSuchBlock(index))?;
        block.name = name.into();
        Ok(())
    }

    pub fn set_block_query(&mut self, index: usize, query: impl Into<String>) -> Result<(), FilterSetEditError> {
        let block = self.filter_blocks.get_mut(index).ok_or(FilterSetEditError::NoSuchBlock(index))?;
        block.query = query.into();
        Ok(())
    }

    pub fn toggle_block_flag(&mut self, index: usize, flag_name: &str) -> Result<(), FilterSetEditError> {
        let block = self.filter_blocks.get_mut(index).ok_or(FilterSetEditError::NoSuchBlock(index))?;
        match block.flags_applied.iter().position(|f| f == flag_name) {
            Some(position) => {
                block.flags_applied.remove(position);
            }
            None => block.flags_applied.push(flag_name.to_string()),
        }
        Ok(())
    }

    /// Body for a POST creating this FilterSet.
    pub fn create_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "title": self.title,
            "filter_blocks": self.filter_blocks,
            "flags": self.flags,
            "search_type": self.search_type,
        });
        if let serde_json::Value::Object(map) = &mut payload {
            if let Some(status) = &self.status {
                map.insert("status".into(), status.clone().into());
            }
            if let Some(accession) = &self.created_in_case_accession {
                map.insert("created_in_case_accession".into(), accession.clone().into());
            }
            if let Some(preset) = &self.derived_from_preset_filterset {
                map.insert("derived_from_preset_filterset".into(), preset.clone().into());
            }
        }
        payload
    }

    /// Body for a POST creating a preset from this FilterSet's content.
    pub fn preset_payload(&self, title: &str, project: Option<&str>, user: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "filter_blocks": self.filter_blocks,
            "flags": self.flags,
            "search_type": self.search_type,
            "preset_for_projects": project.map(|p| vec![p.to_string()]).unwrap_or_default(),
            "preset_for_users": user.map(|u| vec![u.to_string()]).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_has_one_block() {
        let fs = FilterSet::blank(Some("GAPCAXYZ123"));
        assert_eq!(fs.filter_blocks.len(), 1);
        assert_eq!(fs.title, "FilterSet for GAPCAXYZ123");
        assert!(!fs.is_saved());
    }

    #[test]
    fn removing_the_only_block_is_refused() {
        let mut fs = FilterSet::blank(None);
        assert_eq!(fs.remove_block(0), Err(FilterSetEditError::LastBlock));
        assert_eq!(fs.filter_blocks.len(), 1);
        assert_eq!(fs.remove_block(3), Err(FilterSetEditError::NoSuchBlock(3)));
    }

    #[test]
    fn new_block_names_skip_taken_ones() {
        let mut fs = FilterSet::blank(None);
        fs.rename_block(0, "Filter Block 2").unwrap();
        let index = fs.add_block("type=VariantSample");
        assert_eq!(fs.filter_blocks[index].name, "Filter Block 3");
        let copy = fs.duplicate_block(0).unwrap();
        assert_eq!(copy, 1);
        assert_eq!(fs.filter_blocks[1].name, "Filter Block 4");
        assert_eq!(fs.filter_blocks[1].query, "");
    }

    #[test]
    fn comparable_ignores_server_fields() {
        let mut a = FilterSet::blank(None);
        let mut b = a.clone();
        b.at_id = Some("/filter-sets/abc/".into());
        b.status = Some("shared".into());
        assert_eq!(a.comparable(), b.comparable());
        a.toggle_block_flag(0, "case:GAPCA1").unwrap();
        assert_ne!(a.comparable(), b.comparable());
    }

    #[test]
    fn deserializes_server_document() {
        let fs: FilterSet = serde_json::from_value(serde_json::json!({
            "@id": "/filter-sets/1b5c7b1a/",
            "uuid": "1b5c7b1a",
            "title": "Case filters",
            "filter_blocks": [{"name": "Rare", "query": "variant.csq_gnomadg_af.to=0.01"}],
            "flags": [{"name": "case:GAPCA1", "query": "CALL_INFO=SAMPLE1"}],
            "date_created": "2021-01-01T00:00:00",
        }))
        .unwrap();
        assert!(fs.is_saved());
        assert_eq!(fs.search_type, DEFAULT_SEARCH_TYPE);
        assert!(fs.filter_blocks[0].flags_applied.is_empty());
    }

    #[test]
    fn preset_copy_remembers_origin() {
        let mut preset = FilterSet::blank(None);
        preset.uuid = Some("preset-uuid".into());
        preset.title = "Rare recessive".into();
        let copy = FilterSet::from_preset(&preset, Some("GAPCA1"));
        assert_eq!(copy.derived_from_preset_filterset.as_deref(), Some("preset-uuid"));
        assert_eq!(copy.title, "Rare recessive");
        assert!(copy.uuid.is_none());
    }
}
