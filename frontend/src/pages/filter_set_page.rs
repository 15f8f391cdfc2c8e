use common::selection::SelectionState;
use dioxus::prelude::*;

use crate::{components::{filter_set_components::workbench::FilterSetWorkbench, suspend_boundary::SuspendWrapper}, data_definitions::url_param::UrlParam};

/// FilterSet workbench for one case.
#[component]
pub fn FilterSetPage(case_id: String, selection: UrlParam<SelectionState>) -> Element {
    rsx! {
        SuspendWrapper {
            FilterSetWorkbench { case_id: case_id.clone(), selection: selection.0.clone() }
        }
    }
}
