use dioxus::prelude::*;

use crate::components::error_boundary::ComponentErrorBoundary;

#[component]
pub fn SuspendWrapper(children: Element) -> Element {
    rsx! {
        SuspenseBoundary {
            fallback: |_s: SuspenseContext| rsx! {
                div {
                    width: "100%",
                    height: "100%",
                    display: "flex",
                    align_items: "center",
                    justify_content: "center",
                    LoadingIndicator {}
                }
            },
            ComponentErrorBoundary {
                children
            }
        }
    }
}

#[component]
pub fn LoadingIndicator(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div {
            style: "color:black; font-size: 20px; border: 1px solid black; padding: 10px; border-radius: 5px; margin: 15px;",
            "{label}"
        }
    }
}
