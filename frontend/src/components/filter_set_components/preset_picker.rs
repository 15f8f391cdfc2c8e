//! Start from a preset, or save the current FilterSet as one.

use common::filter_set::FilterSet;
use dioxus::prelude::*;

use crate::{api::portal_api, components::filter_set_components::workbench::WorkbenchState};

#[component]
pub fn PresetPicker() -> Element {
    let workbench = use_context::<WorkbenchState>();
    let presets = use_resource(move || {
        let project = workbench.case.read().project.clone();
        let search_type = workbench.filter_set.read().search_type.clone();
        async move {
            match project {
                Some(project) => portal_api::list_presets(project, search_type).await,
                None => Ok(vec![]),
            }
        }
    });
    let mut preset_title = use_signal(String::new);
    let can_create = workbench.can_create_preset;

    let presets = presets.read();
    let preset_list: Vec<FilterSet> = match presets.as_ref() {
        Some(Ok(list)) => list.clone(),
        _ => vec![],
    };
    let choices = preset_list.clone();

    rsx! {
        div {
            style: "display:flex; flex-direction:row; align-items:center; gap: 8px;",
            select {
                disabled: preset_list.is_empty(),
                onchange: move |e| {
                    let chosen = e.value();
                    if let Some(preset) = choices.iter().find(|p| p.uuid.as_deref() == Some(chosen.as_str())) {
                        workbench.apply_preset.call(preset.clone());
                    }
                },
                option { value: "", "Start from preset..." }
                for preset in preset_list.iter() {
                    option {
                        key: "{preset.uuid.clone().unwrap_or_default()}",
                        value: "{preset.uuid.clone().unwrap_or_default()}",
                        "{preset.title}"
                    }
                }
            }
            input {
                r#type: "text",
                placeholder: "Preset title",
                disabled: !can_create(),
                value: "{preset_title}",
                oninput: move |e| preset_title.set(e.value()),
            }
            button {
                disabled: !can_create() || preset_title.read().trim().is_empty(),
                style: "height: 34px; padding: 0 12px; border-radius: 8px; border: 1px solid #D1D5DB; background: white;",
                onclick: move |_| {
                    let title = preset_title.read().trim().to_string();
                    workbench.create_preset.call(title);
                    preset_title.set(String::new());
                },
                "Create Preset"
            }
        }
    }
}
