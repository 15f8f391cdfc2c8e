//! Results of the compound search over the selected blocks, with adding rows
//! to the case's VariantSampleList.

use std::collections::BTreeSet;

use chrono::Utc;
use common::{
    alerts::{Alert, AlertStyle},
    portal_const::PAGE_SIZE,
    search_result::SearchResultItem,
    variant_sample_list::VariantSampleSelection,
};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::{MdArrowBack, MdArrowForward}};

use crate::{
    api::portal_api::{self, api_error},
    components::{error_boundary::ApiErrorDisplay, filter_set_components::workbench::WorkbenchState, suspend_boundary::LoadingIndicator},
    data_definitions::app_context::use_app_context,
};

#[component]
pub fn CompoundResults() -> Element {
    let app = use_app_context();
    let workbench = use_context::<WorkbenchState>();
    let mut case = workbench.case;
    let mut variant_sample_list = workbench.variant_sample_list;
    let mut page = use_signal(|| 0_u64);
    let mut checked = use_signal(BTreeSet::<String>::new);

    let request = use_memo(move || {
        let addon = workbench.case.read().initial_search_href_filter_addon.clone();
        workbench.selection.read().to_compound_request(&workbench.filter_set.read(), addon).page(*page.read())
    });
    // a different query starts again from the first page
    use_effect(move || {
        let _ = workbench.selection.read();
        let _ = workbench.filter_set.read();
        page.set(0);
    });
    let results = use_resource(move || {
        let request = request();
        portal_api::compound_search(request)
    });
    use_effect(move || {
        let _ = results.read();
        checked.set(BTreeSet::new());
    });

    let in_list = use_memo(move || match &*variant_sample_list.read() {
        Some(Ok(Some(list))) => list.variant_samples.iter().map(|s| s.variant_sample_item.clone()).collect(),
        _ => BTreeSet::<String>::new(),
    });
    let must_save_first = use_memo(move || workbench.save_state.read().has_unsaved_changes());

    let add_checked = move |_: Event<MouseData>| {
        let rows: Vec<SearchResultItem> = match &*results.peek() {
            Some(Ok(response)) => response.graph.iter().filter(|row| checked.peek().contains(&row.at_id)).cloned().collect(),
            _ => return,
        };
        if rows.is_empty() {
            return;
        }
        let filter_set = workbench.filter_set.peek().clone();
        let used = workbench.selection.peek().blocks_used(&filter_set);
        let selected_by = app.state.peek().session.as_ref().map(|u| u.at_id.clone()).filter(|id| !id.is_empty());
        let selections: Vec<VariantSampleSelection> = rows
            .iter()
            .map(|row| VariantSampleSelection {
                variant_sample_item: row.at_id.clone(),
                filter_blocks_used: used.restricted_to(&row.matching_filter_block_names),
                selected_by: selected_by.clone(),
                date_selected: Utc::now(),
            })
            .collect();
        let count = selections.len();
        spawn(async move {
            let case_summary = case.peek().clone();
            match portal_api::add_to_variant_sample_list(case_summary, selections).await {
                Ok(list) => {
                    if case.peek().variant_sample_list_id.is_none() {
                        case.write().variant_sample_list_id = list.at_id.clone();
                    } else {
                        variant_sample_list.restart();
                    }
                    checked.set(BTreeSet::new());
                    app.queue_alert(Alert::new(
                        "Added to interpretation list",
                        vec![format!("{} variant sample(s) added", count)],
                        AlertStyle::Success,
                    ));
                }
                Err(e) => app.report(&api_error(&e)),
            }
        });
    };

    let results = results.read();
    let response = match results.as_ref() {
        None => return rsx! { LoadingIndicator { label: "Searching..." } },
        Some(Err(e)) => return rsx! { ApiErrorDisplay { error: api_error(e) } },
        Some(Ok(response)) => response.clone(),
    };
    let current_page = *page.read();
    let page_count = response.total.div_ceil(PAGE_SIZE);
    let page_label = format!("{} / {}", current_page + 1, page_count.max(1));
    let add_title = if must_save_first() { "Save the FilterSet first" } else { "Add checked rows to the case's interpretation list" };

    rsx! {
        div {
            style: "display:flex; flex-direction:column; gap: 8px;",
            div {
                style: "display:flex; flex-direction:row; align-items:center; gap: 10px;",
                h2 { style: "font-size: 18px; font-weight: 400; margin: 0; flex-grow: 1;", "{response.total} results" }
                button {
                    disabled: checked.read().is_empty() || must_save_first(),
                    title: add_title,
                    onclick: add_checked,
                    "Add {checked.read().len()} to list"
                }
                button {
                    title: "Previous page",
                    disabled: current_page == 0,
                    onclick: move |_| page.set(current_page.saturating_sub(1)),
                    Icon { icon: MdArrowBack, style: "width: 18px; height: 18px;" }
                }
                span { "{page_label}" }
                button {
                    title: "Next page",
                    disabled: current_page + 1 >= page_count,
                    onclick: move |_| page.set(current_page + 1),
                    Icon { icon: MdArrowForward, style: "width: 18px; height: 18px;" }
                }
            }
            ul {
                style: "list-style: none; padding: 0; margin: 0; display:flex; flex-direction:column; gap: 4px;",
                for row in response.graph.iter().cloned() {
                    ResultRow {
                        key: "{row.at_id}",
                        already_listed: in_list.read().contains(&row.at_id),
                        is_checked: checked.read().contains(&row.at_id),
                        on_toggle: move |item: String| {
                            let mut set = checked.write();
                            if !set.remove(&item) {
                                set.insert(item);
                            }
                        },
                        row: row.clone(),
                    }
                }
            }
        }
    }
}

#[component]
fn ResultRow(row: SearchResultItem, already_listed: bool, is_checked: bool, on_toggle: Callback<String>) -> Element {
    let item = row.at_id.clone();
    let matched = row.matching_filter_block_names.join(", ");
    rsx! {
        li {
            style: "display:flex; flex-direction:row; align-items:center; gap: 8px; padding: 6px 8px; background: white; border: 1px solid #E5E7EB; border-radius: 6px;",
            input {
                r#type: "checkbox",
                disabled: already_listed,
                checked: is_checked || already_listed,
                onchange: move |_| on_toggle.call(item.clone()),
            }
            div {
                style: "flex-grow: 1;",
                div { "{row.display_title}" }
                if !row.matching_filter_block_names.is_empty() {
                    div { style: "font-size: 12px; color: #6B7280;", "Matched: {matched}" }
                }
            }
            if already_listed {
                span { style: "font-size: 12px; color: #15803D;", "In list" }
            }
        }
    }
}
