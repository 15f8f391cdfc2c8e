use common::{
    facet_dictionary::FacetDictionary,
    field_blocks::{FieldValue, field_blocks},
};
use dioxus::prelude::*;

use crate::components::filter_set_components::workbench::WorkbenchState;

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Terms { values, negated: false } => values.join(", "),
        FieldValue::Terms { values, negated: true } => format!("not {}", values.join(", ")),
        FieldValue::Range { from: Some(from), to: Some(to) } => format!("{} to {}", from, to),
        FieldValue::Range { from: Some(from), to: None } => format!("at least {}", from),
        FieldValue::Range { from: None, to: Some(to) } => format!("at most {}", to),
        FieldValue::Range { from: None, to: None } => "any".to_string(),
    }
}

/// The fields of one block's query as labelled chips. Titles come from the
/// facet dictionary once it has loaded.
#[component]
pub fn FieldBlocksView(query: ReadSignal<String>) -> Element {
    let workbench = use_context::<WorkbenchState>();
    let dictionary = workbench.facet_dictionary;
    let chips = use_memo(move || {
        let dictionary = dictionary.read();
        let empty = FacetDictionary::default();
        let dictionary = match dictionary.as_ref() {
            Some(Ok(d)) => d,
            _ => &empty,
        };
        field_blocks(&query.read(), dictionary)
    });

    if chips.read().is_empty() {
        return rsx! {
            div { style: "font-size: 13px; color: #6B7280;", "No filters (matches everything)" }
        };
    }

    rsx! {
        div {
            style: "display:flex; flex-direction:row; flex-wrap: wrap; gap: 6px;",
            for chip in chips.read().iter().cloned() {
                span {
                    key: "{chip.field}",
                    title: "{chip.field}",
                    style: "font-size: 13px; padding: 2px 8px; border-radius: 9999px; background: #EEF2FF; border: 1px solid #C7D2FE;",
                    b { "{chip.title}: " }
                    "{describe(&chip.value)}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_ranges_and_negations() {
        assert_eq!(describe(&FieldValue::Range { from: Some("0.1".into()), to: None }), "at least 0.1");
        assert_eq!(
            describe(&FieldValue::Terms { values: vec!["Gene".into(), "Variant".into()], negated: true }),
            "not Gene, Variant"
        );
    }
}
