//! The case's interpretation list, checked against the current filter blocks.

use common::selection::{SavedBlockCheck, SavedBlockStatus, check_saved_selection};
use dioxus::prelude::*;

use crate::{
    api::portal_api::api_error,
    components::{error_boundary::ApiErrorDisplay, filter_set_components::workbench::WorkbenchState, suspend_boundary::LoadingIndicator},
};

fn status_text(status: &SavedBlockStatus) -> (String, &'static str) {
    match status {
        SavedBlockStatus::Unchanged => ("unchanged".to_string(), "#15803D"),
        SavedBlockStatus::QueryChanged { current_query } => (format!("filters changed, now {}", current_query), "#B45309"),
        SavedBlockStatus::Missing => ("block no longer exists".to_string(), "#B91C1C"),
    }
}

#[component]
pub fn SavedSelections() -> Element {
    let workbench = use_context::<WorkbenchState>();
    let list = workbench.variant_sample_list.read();
    let list = match list.as_ref() {
        None => return rsx! { LoadingIndicator { label: "Loading interpretation list..." } },
        Some(Err(e)) => return rsx! { ApiErrorDisplay { error: api_error(e) } },
        Some(Ok(None)) => return rsx! {},
        Some(Ok(Some(list))) => list.clone(),
    };
    let filter_set = workbench.filter_set.read().clone();
    let entries: Vec<(String, String, bool, Vec<SavedBlockCheck>)> = list
        .variant_samples
        .iter()
        .map(|entry| {
            (
                entry.variant_sample_item.clone(),
                entry.date_selected.format("%Y-%m-%d").to_string(),
                entry.filter_blocks_used.intersect_selected_blocks,
                check_saved_selection(&entry.filter_blocks_used, &filter_set),
            )
        })
        .collect();

    rsx! {
        div {
            style: "display:flex; flex-direction:column; gap: 6px; margin-top: 16px;",
            h2 { style: "font-size: 18px; font-weight: 400; margin: 0;", "Interpretation list ({list.variant_samples.len()})" }
            for (item, date, intersect, checks) in entries.into_iter() {
                div {
                    key: "{item}",
                    style: "padding: 6px 8px; background: white; border: 1px solid #E5E7EB; border-radius: 6px; font-size: 13px;",
                    div {
                        "{item}"
                        span { style: "color: #6B7280;", " added {date}" }
                        if intersect {
                            span { style: "color: #6B7280;", " (intersection)" }
                        }
                    }
                    for check in checks.iter() {
                        SavedBlockLine { key: "{check.name}", name: check.name.clone(), status: check.status.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn SavedBlockLine(name: String, status: SavedBlockStatus) -> Element {
    let (text, color) = status_text(&status);
    rsx! {
        div {
            style: "padding-left: 12px;",
            "{name}: "
            span { style: "color: {color};", "{text}" }
        }
    }
}
