//! Error boundaries and inline error displays.

use common::api_error::ApiError;
use dioxus::prelude::*;

use crate::routes::Route;

#[component]
pub fn GlobalErrorBoundary(boundary_name: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: move |_err: ErrorContext| {
                rsx! {
                    h1 {
                        style: "color:red; font-size: 40px; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 15px;",
                        "Something went wrong",
                    }
                    p {
                        style: "color:darkred; font-size: 20px; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 15px;",
                        "Boundary: {boundary_name}"
                    }
                    a {
                        href: Route::HomePage {}.to_string(),
                        style: "color:blue; font-size: 20px; border: 1px solid blue; padding: 10px; border-radius: 5px; margin: 15px;",
                        "Return to Home Page"
                    }
                    pre {
                        style: "color:black; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 15px; text-wrap: auto;",
                        "{_err:#?}"
                    }
                }
            },
            children
        }
    }
}

#[component]
pub fn ComponentErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: |_err: ErrorContext| {
                let error_txt = match _err.error() {
                    Some(err) => format!("{:#?}", err.0),
                    None => "Unknown error".to_string(),
                };
                rsx! {
                    ComponentErrorDisplay {
                        title: "Component Error".to_string(),
                        lines: vec![error_txt],
                        button {
                            style: "color:blue; font-size: 18px; border: 1px solid blue; padding: 8px; border-radius: 5px; margin: 10px;",
                            onclick: move |_| {
                                _err.clear_errors();
                            },
                            "Try Again"
                        }
                    }
                }
            },
            div {
                width: "100%",
                height: "100%",
                {children}
            }
        }
    }
}

/// A failed portal request, shown in place of the content it was loading.
#[component]
pub fn ApiErrorDisplay(error: ApiError, children: Element) -> Element {
    let alert = error.to_alert();
    rsx! {
        ComponentErrorDisplay { title: alert.title, lines: alert.message, {children} }
    }
}

#[component]
pub fn ComponentErrorDisplay(title: String, lines: Vec<String>, children: Element) -> Element {
    rsx! {
        div {
            width: "100%",
            height: "100%",
            display: "flex",
            flex_direction: "column",
            align_items: "center",
            justify_content: "center",

            h1 {
                style: "color:red; font-size: 28px; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 5px;",
                "{title}",
            }

            pre {
                style: "color:darkred; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 5px; text-wrap: auto; max-width: 600px; max-height: 400px; overflow-y: auto;",
                for line in lines.iter() {
                    "{line}\n"
                }
            }

            {children}
        }
    }
}
