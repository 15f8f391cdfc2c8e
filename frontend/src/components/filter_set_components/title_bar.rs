//! FilterSet title, save controls and unsaved-changes banner.

use common::{api_error::ApiError, save_state::SaveState};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_content_icons::MdSave, md_file_icons::MdFileDownload}};

use crate::components::filter_set_components::{
    preset_picker::PresetPicker,
    workbench::{FilterSetEdit, WorkbenchState},
};

fn save_label(state: &SaveState) -> &'static str {
    match state {
        SaveState::UnsavedNew => "Save",
        SaveState::Saved => "Saved",
        SaveState::Dirty => "Save changes",
        SaveState::Saving => "Saving...",
        SaveState::Error(_) => "Retry save",
    }
}

#[component]
pub fn FilterSetTitleBar() -> Element {
    let workbench = use_context::<WorkbenchState>();
    let save_state = workbench.save_state;
    let no_permission = use_memo(move || matches!(&*save_state.read(), SaveState::Error(e) if e.is_permission()));
    let duplicated = use_memo(move || !workbench.duplicates.read().is_empty());
    let save_disabled = use_memo(move || !save_state.read().can_save() || no_permission() || duplicated());
    let export_href = use_memo(move || {
        let fs = workbench.filter_set.read();
        fs.uuid.clone().or_else(|| fs.at_id.clone()).map(|id| format!("/_export_filter_set/{}", id.trim_matches('/').rsplit('/').next().unwrap_or_default()))
    });
    let save_title = if duplicated() { "Rename or change duplicated blocks before saving" } else { "" };

    rsx! {
        div {
            id: "x-filter-set-title-bar",
            style: "
                display: flex;
                flex-direction: row;
                align-items: center;
                gap: 12px;
                padding: 10px 16px;
                border-bottom: 1px solid rgb(164, 164, 164);
                flex-shrink: 0;
            ",
            input {
                r#type: "text",
                style: "font-size: 18px; min-width: 320px;",
                value: "{workbench.filter_set.read().title}",
                onchange: move |e| workbench.edit.call(FilterSetEdit::SetTitle(e.value())),
            }
            button {
                disabled: save_disabled(),
                title: save_title,
                style: "display:flex; align-items:center; gap: 4px; height: 34px; padding: 0 12px; border-radius: 8px; border: 1px solid #D1D5DB; background: white;",
                onclick: move |_| workbench.save.call(()),
                Icon { icon: MdSave, style: "width: 18px; height: 18px;" }
                "{save_label(&save_state.read())}"
            }
            if let Some(href) = export_href() {
                a {
                    href: "{href}",
                    title: "Download as JSON",
                    style: "display:flex; align-items:center; color: #111827;",
                    Icon { icon: MdFileDownload, style: "width: 22px; height: 22px;" }
                }
            }
            div { style: "flex-grow: 1;" }
            PresetPicker {}
        }
        SaveStatusBanner { no_permission, duplicated }
    }
}

#[component]
fn SaveStatusBanner(no_permission: ReadSignal<bool>, duplicated: ReadSignal<bool>) -> Element {
    let workbench = use_context::<WorkbenchState>();
    let state = workbench.save_state.read();
    let message = match &*state {
        SaveState::UnsavedNew | SaveState::Dirty | SaveState::Error(_) if duplicated() => {
            Some("Some filter blocks share a name or filters. Resolve the duplicates to save.".to_string())
        }
        SaveState::Error(ApiError::Permission { .. }) => Some("You do not have permission to edit this FilterSet. Changes cannot be saved.".to_string()),
        SaveState::Error(e) => Some(format!("Last save failed: {}. Your changes are not saved.", e)),
        SaveState::UnsavedNew => Some("This FilterSet has not been saved yet.".to_string()),
        SaveState::Dirty => Some("You have unsaved changes.".to_string()),
        SaveState::Saved | SaveState::Saving => None,
    };
    let background = if *no_permission.read() { "#FFF8E1" } else { "#E3F2FD" };

    rsx! {
        if let Some(message) = message {
            div {
                style: "padding: 6px 16px; font-size: 14px; background: {background};",
                "{message}"
            }
        }
    }
}
