//! Filter blocks and the URL-encoded queries they carry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A named query fragment inside a FilterSet. Identity is the position in the
/// owning FilterSet's block list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterBlock {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub flags_applied: Vec<String>,
}

impl FilterBlock {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self { name: name.into(), query: query.into(), flags_applied: vec![] }
    }

    pub fn parsed_query(&self) -> ParsedQuery {
        parse_query(&self.query)
    }
}

/// One field of a parsed query. `negated` is set for `field!=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryField {
    pub field: String,
    pub negated: bool,
    pub values: Vec<String>,
}

/// Field/value pairs of a query string, kept in first-seen field order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub fields: Vec<QueryField>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&QueryField> {
        self.fields.iter().find(|f| f.field == field && !f.negated)
    }

    pub fn push(&mut self, field: &str, negated: bool, value: String) {
        match self.fields.iter_mut().find(|f| f.field == field && f.negated == negated) {
            Some(existing) => {
                if !existing.values.contains(&value) {
                    existing.values.push(value);
                }
            }
            None => self.fields.push(QueryField { field: field.to_string(), negated, values: vec![value] }),
        }
    }

    /// Order-insensitive view used for equality: `(field, negated) -> {values}`.
    pub fn value_sets(&self) -> BTreeMap<(String, bool), BTreeSet<String>> {
        self.fields
            .iter()
            .map(|f| ((f.field.clone(), f.negated), f.values.iter().cloned().collect()))
            .collect()
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            let key = if field.negated { format!("{}!", field.field) } else { field.field.clone() };
            for value in &field.values {
                serializer.append_pair(&key, value);
            }
        }
        serializer.finish()
    }
}

impl PartialEq for ParsedQuery {
    fn eq(&self, other: &Self) -> bool {
        self.value_sets() == other.value_sets()
    }
}

impl Eq for ParsedQuery {}

/// Parse a URL-encoded query string (with or without a leading `?`).
pub fn parse_query(query: &str) -> ParsedQuery {
    let query = query.trim();
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut parsed = ParsedQuery::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        // `field!=value` arrives as key `field!`
        match key.strip_suffix('!') {
            Some(field) if !field.is_empty() => parsed.push(field, true, value.into_owned()),
            _ => parsed.push(&key, false, value.into_owned()),
        }
    }
    parsed
}
