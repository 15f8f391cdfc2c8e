//! The alert stack at the top of every page.

use common::{alerts::AlertStyle, app_state::AppAction};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::MdClose};

use crate::data_definitions::app_context::use_app_context;

fn style_class(style: AlertStyle) -> &'static str {
    match style {
        AlertStyle::Danger => "x-alert-danger",
        AlertStyle::Warning => "x-alert-warning",
        AlertStyle::Info => "x-alert-info",
        AlertStyle::Success => "x-alert-success",
    }
}

#[component]
pub fn AlertStack() -> Element {
    let app = use_app_context();
    let alerts = use_memo(move || app.state.read().alerts.alerts().to_vec());

    rsx! {
        div {
            id: "x-alert-stack",
            style: "display:flex; flex-direction:column; gap: 6px; padding: 0 16px;",
            for (title, alert) in alerts.read().iter().map(|a| (a.title.clone(), a.clone())) {
                div {
                    key: "{alert.title}",
                    class: style_class(alert.style),
                    style: "display:flex; flex-direction:row; gap: 10px; border: 1px solid; border-radius: 6px; padding: 8px 12px;",
                    div {
                        style: "flex-grow:1;",
                        h4 { style: "margin: 0 0 4px 0;", "{alert.title}" }
                        for (i, line) in alert.message.iter().enumerate() {
                            div { key: "{i}", "{line}" }
                        }
                    }
                    button {
                        title: "Dismiss",
                        style: "background: transparent; border: none; height: 24px;",
                        onclick: move |_| app.dispatch.call(AppAction::DismissAlert(title.clone())),
                        Icon { icon: MdClose, style: "width: 18px; height: 18px;" }
                    }
                }
            }
        }
    }
}
