//! VariantSampleList: user-curated result rows, each tagged with the filter
//! blocks that produced it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter_block::FilterBlock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SelectedBlock {
    pub name: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterBlocksUsed {
    pub filter_blocks: Vec<SelectedBlock>,
    pub intersect_selected_blocks: bool,
}

impl FilterBlocksUsed {
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a FilterBlock>, intersect: bool) -> Self {
        Self {
            filter_blocks: blocks.into_iter().map(|b| SelectedBlock { name: b.name.clone(), query: b.query.clone() }).collect(),
            intersect_selected_blocks: intersect,
        }
    }

    /// Only the blocks whose names matched the row.
    pub fn restricted_to(&self, matching_names: &[String]) -> Self {
        if matching_names.is_empty() {
            return self.clone();
        }
        Self {
            filter_blocks: self.filter_blocks.iter().filter(|b| matching_names.contains(&b.name)).cloned().collect(),
            intersect_selected_blocks: self.intersect_selected_blocks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSampleSelection {
    /// `@id` of the selected VariantSample.
    pub variant_sample_item: String,
    #[serde(default)]
    pub filter_blocks_used: FilterBlocksUsed,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_by: Option<String>,
    pub date_selected: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VariantSampleList {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub at_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_for_case: Option<String>,
    #[serde(default)]
    pub variant_samples: Vec<VariantSampleSelection>,
}

impl VariantSampleList {
    /// Existing entries followed by the new ones not already present. Existing
    /// entries are never altered or dropped. Returns the number appended.
    pub fn append(&mut self, selections: Vec<VariantSampleSelection>) -> usize {
        let mut present: BTreeSet<String> = self.variant_samples.iter().map(|s| s.variant_sample_item.clone()).collect();
        let mut appended = 0;
        for selection in selections {
            if present.insert(selection.variant_sample_item.clone()) {
                self.variant_samples.push(selection);
                appended += 1;
            }
        }
        appended
    }

    /// PATCH body replacing `variant_samples` with the full list.
    pub fn patch_payload(&self) -> serde_json::Value {
        serde_json::json!({ "variant_samples": self.variant_samples })
    }

    pub fn create_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({ "variant_samples": self.variant_samples });
        if let serde_json::Value::Object(map) = &mut payload {
            if let Some(case) = &self.created_for_case {
                map.insert("created_for_case".into(), case.clone().into());
            }
            if let Some(title) = &self.title {
                map.insert("title".into(), title.clone().into());
            }
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(item: &str) -> VariantSampleSelection {
        VariantSampleSelection {
            variant_sample_item: item.to_string(),
            filter_blocks_used: FilterBlocksUsed::default(),
            selected_by: None,
            date_selected: Utc::now(),
        }
    }

    #[test]
    fn append_keeps_existing_and_skips_duplicates() {
        let mut list = VariantSampleList::default();
        list.append(vec![selection("/variant-samples/a/")]);
        let original = list.variant_samples[0].clone();
        let appended = list.append(vec![selection("/variant-samples/a/"), selection("/variant-samples/b/"), selection("/variant-samples/b/")]);
        assert_eq!(appended, 1);
        assert_eq!(list.variant_samples.len(), 2);
        assert_eq!(list.variant_samples[0], original);
    }

    #[test]
    fn restricted_to_matching_block_names() {
        let blocks = vec![FilterBlock::new("A", "x=1"), FilterBlock::new("B", "y=2")];
        let used = FilterBlocksUsed::from_blocks(&blocks, false);
        let restricted = used.restricted_to(&["B".to_string()]);
        assert_eq!(restricted.filter_blocks, vec![SelectedBlock { name: "B".into(), query: "y=2".into() }]);
        assert_eq!(used.restricted_to(&[]), used);
    }

    #[test]
    fn parses_server_document() {
        let list: VariantSampleList = serde_json::from_value(serde_json::json!({
            "@id": "/variant-sample-lists/123/",
            "created_for_case": "GAPCA1",
            "variant_samples": [{
                "variant_sample_item": "/variant-samples/a/",
                "filter_blocks_used": {"filter_blocks": [{"name": "A", "query": "x=1"}], "intersect_selected_blocks": false},
                "date_selected": "2021-06-01T12:00:00Z"
            }]
        }))
        .unwrap();
        assert_eq!(list.variant_samples[0].variant_sample_item, "/variant-samples/a/");
        assert_eq!(list.created_for_case.as_deref(), Some("GAPCA1"));
    }
}
