use dioxus::prelude::*;
use dioxus_free_icons::icons::md_action_icons::MdSearch;
use dioxus_free_icons::icons::md_file_icons::MdCloudUpload;
use dioxus_free_icons::{Icon, IconShape};

use crate::data_definitions::app_context::use_app_context;
use crate::routes::Route;


/// Home page
#[component]
pub fn HomePage() -> Element {
    rsx! {
        div {
            id: "x-home-container",
            style: "
                display:flex;
                flex-direction: column;
                gap: 20px;
                width: 100%;
                height: 100%;
                padding: 36px 40px;
                background: #F5F6F8;
                box-sizing: border-box;
                overflow: auto;
            ",

            Greeting {}

            div {
                style: "
                    display:flex;
                    flex-direction: row;
                    gap: 20px;
                    flex-wrap: wrap;
                    align-items: stretch;
                    margin-top: 10px;
                ",
                GoToCard {
                    title: "Filter variants",
                    description: "Open a case by accession and build compound queries over its variant samples. Selected rows are added to the case's interpretation list.",
                    placeholder: "Case accession, e.g. GAPCAXXXXXXX",
                    icon: MdSearch,
                    target: GoTo::Case,
                }
                GoToCard {
                    title: "Submission status",
                    description: "Follow an ingestion submission until processing is done.",
                    placeholder: "Submission uuid",
                    icon: MdCloudUpload,
                    target: GoTo::Submission,
                }
            }
        }
    }
}

#[component]
fn Greeting() -> Element {
    let app = use_app_context();
    let name = use_memo(move || app.state.read().session.as_ref().map(|u| u.display_name()));

    rsx! {
        div {
            style: "
                color: #0F172A;
                font-size: 40px;
                font-weight: 500;
                letter-spacing: -0.02em;
            ",
            {match name() {
                Some(name) => rsx! { "Welcome back, {name}" },
                None => rsx! { "Welcome. Sign in to the portal to edit cases." },
            }}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GoTo {
    Case,
    Submission,
}

impl GoTo {
    fn route(self, id: String) -> Route {
        match self {
            GoTo::Case => Route::filter_set_page(id),
            GoTo::Submission => Route::SubmissionPage { submission_uuid: id },
        }
    }
}

#[component]
fn GoToCard<I: IconShape + Clone + PartialEq + 'static>(title: String, description: String, placeholder: String, icon: I, target: GoTo) -> Element {
    let nav = navigator();
    let mut value = use_signal(String::new);

    rsx! {
        div {
            style: "
                display:flex;
                flex-direction: column;
                gap: 14px;
                width: 480px;
                border-radius: 22px;
                padding: 22px;
                background: linear-gradient(135deg, #12303F 0%, #1F6F8B 100%);
                color: white;
                box-shadow: 0 8px 24px rgba(0,0,0,0.12);
            ",
            div { style: "font-size: 28px; font-weight: 500;", "{title}" }
            div { style: "font-size: 17px; line-height: 1.5; color: rgba(255,255,255,0.92);", "{description}" }
            div {
                style: "
                    display:flex;
                    align-items:center;
                    gap: 10px;
                    background-color: white;
                    border-radius: 9999px;
                    padding: 10px 14px;
                    height: 42px;
                    color: #111827;
                ",
                Icon { icon: icon, style: "width: 20px; height: 20px; color:#6B7280;" }
                input {
                    r#type: "text",
                    placeholder: "{placeholder}",
                    style: "flex:1; border: none; outline: none; background: transparent; color: #111827; font-size: 14px;",
                    oninput: move |e| value.set(e.value()),
                    onkeypress: move |e| {
                        let id = value.read().trim().to_string();
                        if e.key() == Key::Enter && !id.is_empty() {
                            e.prevent_default();
                            nav.push(target.route(id));
                        }
                    },
                }
            }
        }
    }
}
