//! Display model for the fields of one filter block's query.

use serde::{Deserialize, Serialize};

use crate::{facet_dictionary::FacetDictionary, filter_block::parse_query};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Terms { values: Vec<String>, negated: bool },
    Range { from: Option<String>, to: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBlock {
    pub field: String,
    pub title: String,
    pub value: FieldValue,
}

fn range_base(field: &str) -> Option<(&str, bool)> {
    if let Some(base) = field.strip_suffix(".from") {
        return Some((base, true));
    }
    field.strip_suffix(".to").map(|base| (base, false))
}

/// Group a query into display fields. Range facet bounds (`X.from` / `X.to`)
/// are merged into one entry on `X`. Entries are sorted by the facet's
/// declared order; fields without one keep their query order after the rest.
pub fn field_blocks(query: &str, dictionary: &FacetDictionary) -> Vec<FieldBlock> {
    let parsed = parse_query(query);
    let mut blocks: Vec<FieldBlock> = Vec::new();

    for field in parsed.fields {
        let range = if field.negated { None } else { range_base(&field.field) };
        match range {
            Some((base, is_from)) => {
                let bound = field.values.into_iter().next();
                let existing = blocks.iter().position(|b| b.field == base && matches!(b.value, FieldValue::Range { .. }));
                let index = match existing {
                    Some(index) => index,
                    None => {
                        blocks.push(FieldBlock {
                            field: base.to_string(),
                            title: dictionary.title_for(base).to_string(),
                            value: FieldValue::Range { from: None, to: None },
                        });
                        blocks.len() - 1
                    }
                };
                if let FieldValue::Range { from, to } = &mut blocks[index].value {
                    if is_from {
                        *from = bound;
                    } else {
                        *to = bound;
                    }
                }
            }
            None => blocks.push(FieldBlock {
                title: dictionary.title_for(&field.field).to_string(),
                field: field.field,
                value: FieldValue::Terms { values: field.values, negated: field.negated },
            }),
        }
    }

    // stable: ties and unordered fields keep insertion order
    blocks.sort_by_key(|b| match dictionary.order_for(&b.field) {
        Some(order) => (0, order),
        None => (1, 0),
    });
    blocks
}
