//! Editable list of filter blocks with selection and duplicate warnings.

use common::filter_block::FilterBlock;
use dioxus::prelude::*;
use dioxus_free_icons::{
    Icon,
    icons::{
        md_action_icons::MdDelete,
        md_content_icons::{MdAdd, MdContentCopy},
        md_toggle_icons::{MdCheckBox, MdCheckBoxOutlineBlank},
    },
};

use crate::components::filter_set_components::{
    field_blocks_view::FieldBlocksView,
    workbench::{FilterSetEdit, WorkbenchState},
};

#[component]
pub fn FilterBlockList() -> Element {
    let workbench = use_context::<WorkbenchState>();
    let blocks = use_memo(move || workbench.filter_set.read().filter_blocks.clone());
    let selection = workbench.selection;
    let set_selection = workbench.set_selection;

    rsx! {
        div {
            id: "x-filter-block-list",
            style: "display:flex; flex-direction:column; gap: 8px;",
            div {
                style: "display:flex; flex-direction:row; align-items:center; gap: 10px;",
                h2 { style: "font-size: 18px; font-weight: 400; margin: 0; flex-grow: 1;", "Filter Blocks" }
                label {
                    style: "display:flex; align-items:center; gap: 4px; font-size: 14px;",
                    input {
                        r#type: "checkbox",
                        checked: selection.read().intersect,
                        onchange: move |e| {
                            let mut next = selection.peek().clone();
                            next.set_intersect(e.checked());
                            set_selection.call(next);
                        },
                    }
                    "Intersect selected blocks"
                }
                button {
                    disabled: selection.read().is_all(),
                    onclick: move |_| {
                        let mut next = selection.peek().clone();
                        next.select_all();
                        set_selection.call(next);
                    },
                    "Select all"
                }
                button {
                    title: "Add filter block",
                    onclick: move |_| workbench.edit.call(FilterSetEdit::AddBlock),
                    Icon { icon: MdAdd, style: "width: 18px; height: 18px;" }
                }
            }
            for (index, block) in blocks.read().iter().cloned().enumerate() {
                FilterBlockRow { key: "{index}-{block.name}", index, block, block_count: blocks.read().len() }
            }
        }
    }
}

#[component]
fn FilterBlockRow(index: usize, block: FilterBlock, block_count: usize) -> Element {
    let workbench = use_context::<WorkbenchState>();
    let selection = workbench.selection;
    let set_selection = workbench.set_selection;
    let selected = selection.read().is_selected(index);
    let duplicates = workbench.duplicates.read();
    let same_name = duplicates.duplicate_names.get(&index).map(|earlier| earlier + 1);
    let same_query = duplicates.duplicate_queries.get(&index).map(|earlier| earlier + 1);
    let flags: Vec<(String, bool)> = workbench
        .filter_set
        .read()
        .flags
        .iter()
        .map(|f| (f.name.clone(), block.flags_applied.contains(&f.name)))
        .collect();
    let select_title = if selected { "Deselect block" } else { "Select block" };
    let border = if same_name.is_some() || same_query.is_some() { "#FFB74D" } else { "#D1D5DB" };

    rsx! {
        div {
            style: "
                display:flex;
                flex-direction:column;
                gap: 6px;
                padding: 8px;
                border-radius: 8px;
                border: 1px solid {border};
                background: white;
            ",
            div {
                style: "display:flex; flex-direction:row; align-items:center; gap: 6px;",
                button {
                    title: select_title,
                    style: "background: transparent; border: none;",
                    onclick: move |_| {
                        let mut next = selection.peek().clone();
                        next.toggle(index, block_count);
                        set_selection.call(next);
                    },
                    if selected {
                        Icon { icon: MdCheckBox, style: "width: 20px; height: 20px;" }
                    } else {
                        Icon { icon: MdCheckBoxOutlineBlank, style: "width: 20px; height: 20px;" }
                    }
                }
                input {
                    r#type: "text",
                    style: "flex-grow: 1;",
                    value: "{block.name}",
                    onchange: move |e| workbench.edit.call(FilterSetEdit::RenameBlock(index, e.value())),
                }
                button {
                    title: "Search only this block",
                    onclick: move |_| {
                        let mut next = selection.peek().clone();
                        next.select_only(index, block_count);
                        set_selection.call(next);
                    },
                    "Only"
                }
                button {
                    title: "Duplicate block",
                    onclick: move |_| workbench.edit.call(FilterSetEdit::DuplicateBlock(index)),
                    Icon { icon: MdContentCopy, style: "width: 18px; height: 18px;" }
                }
                button {
                    title: "Remove block",
                    disabled: block_count <= 1,
                    onclick: move |_| workbench.edit.call(FilterSetEdit::RemoveBlock(index)),
                    Icon { icon: MdDelete, style: "width: 18px; height: 18px;" }
                }
            }
            if let Some(earlier) = same_name {
                div { style: "font-size: 13px; color: #B45309;", "Same name as block {earlier}" }
            }
            if let Some(earlier) = same_query {
                div { style: "font-size: 13px; color: #B45309;", "Same filters as block {earlier}" }
            }
            FieldBlocksView { query: block.query.clone() }
            input {
                r#type: "text",
                placeholder: "field=value&other_field=value",
                style: "font-family: monospace; font-size: 12px;",
                value: "{block.query}",
                onchange: move |e| workbench.edit.call(FilterSetEdit::SetBlockQuery(index, e.value())),
            }
            if !flags.is_empty() {
                div {
                    style: "display:flex; flex-direction:row; gap: 10px; font-size: 13px;",
                    for (name, flag, applied) in flags.into_iter().map(|(n, a)| (n.clone(), n, a)) {
                        label {
                            key: "{name}",
                            input {
                                r#type: "checkbox",
                                checked: applied,
                                onchange: move |_| workbench.edit.call(FilterSetEdit::ToggleBlockFlag(index, flag.clone())),
                            }
                            "{name}"
                        }
                    }
                }
            }
        }
    }
}
