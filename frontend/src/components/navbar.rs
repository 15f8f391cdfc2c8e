//! Sidebar navigation and the page header.

use common::page_titles::{PAGE_TITLES, context_types};
use common::portal_const::UNSAVED_CHANGES_WARNING;
use dioxus::prelude::*;
use dioxus_free_icons::icons::md_action_icons::MdHome;
use dioxus_free_icons::icons::md_communication_icons::MdVpnKey;
use dioxus_free_icons::icons::md_social_icons::MdPerson;
use dioxus_free_icons::{Icon, IconShape};

use crate::components::alerts::AlertStack;
use crate::components::error_boundary::GlobalErrorBoundary;
use crate::data_definitions::app_context::use_app_context;
use crate::data_definitions::navigation_controller::use_navigation_controller;
use crate::routes::Route;

/// Shared layout. Keeps the page context in sync with the current route.
#[component]
pub fn Navbar() -> Element {
    let route = use_route::<Route>();
    let navigation = use_navigation_controller();
    // selection changes replace the route but keep the same document
    let href = route.context_href();
    let local_context = route.local_context();
    use_effect(use_reactive!(|href, local_context| {
        navigation.navigate(href, local_context);
    }));

    rsx! {

        div {
            id:"x-nav-container",

            style:"
                display:flex;
                flex-direction: row;
                width: 100%;
                height: 100%;
            ",


            div {
                id:"x-nav-sidebar",
                style:"
                    display:flex;
                    flex-direction: column;
                    gap: 40px;
                    width: 70px;
                    height: 100%;
                    background-color: #12303F;
                    border: 1px solid #000000;
                    padding: 16px;
                ",

                NavbarTopIconLinks{},

                // empty space
                div {
                    style: "flex-grow:1;"
                }
                NavbarSessionIcon{},
            },

            div {
                id:"x-page-container",
                style: "flex-grow:1; min-width: 100px; display:flex; flex-direction:column; height: 100%;",
                PageHeader {}
                AlertStack {}
                div {
                    style: "flex-grow:1; min-height: 0;",
                    GlobalErrorBoundary {
                        boundary_name: "Navbar".to_string(),
                        Outlet::<Route> {}
                    }
                }
            }
        }

    }
}

#[component]
fn PageHeader() -> Element {
    let app = use_app_context();
    let route = use_route::<Route>();
    let state = app.state.read();
    let view = PAGE_TITLES.resolve(&context_types(&state.context), route.page_action());
    let title = view.text(&state.context);
    let status = if state.navigation.slow {
        Some("Still loading, the network seems slow...")
    } else if state.is_loading() {
        Some("Loading...")
    } else {
        None
    };

    rsx! {
        document::Title { "{title}" }
        div {
            id: "x-page-header",
            style: "
                display:flex;
                flex-direction: row;
                align-items: center;
                gap: 16px;
                height: 56px;
                padding: 0 16px;
                border-bottom: 1px solid rgb(164, 164, 164);
                background-color: #F8FCFF;
                flex-shrink: 0;
            ",
            h1 { style: "font-size: 22px; font-weight: 400; margin: 0;", "{title}" }
            if let Some(status) = status {
                span { style: "color: #6B7280; font-size: 14px;", "{status}" }
            }
        }
    }
}

#[component]
fn NavbarTopIconLinks() -> Element {
    rsx! {
        div {
            style: "
                display:flex;
                flex-direction: column;
                gap: 24px;
                width: 38px;
                align-items: center;
                justify-content: center;
            ",
            IconLink { to: Route::HomePage { }, icon: MdHome, label: "Home" }
            IconLink { to: Route::AccessKeysPage { }, icon: MdVpnKey, label: "Access Keys" }
        }
    }
}


#[component]
fn NavbarSessionIcon() -> Element {
    let app = use_app_context();
    let label = use_memo(move || match &app.state.read().session {
        Some(user) => user.display_name(),
        None => "Not signed in".to_string(),
    });

    rsx! {
        div {
            style: "
                display:flex;
                flex-direction: column;
                width: 38px;
                align-items: center;
                justify-content: center;
            ",
            span {
                title: "{label}",
                style: "color:white;",
                Icon { icon: MdPerson, style: "width: 26px; height: 26px;" }
            }
        }
    }
}

/// Ask before leaving a page with unsaved edits. Outside a browser there is
/// nobody to ask.
fn confirm_leave() -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(UNSAVED_CHANGES_WARNING).ok())
        .unwrap_or(true)
}

#[component]
fn IconLink<T: IconShape + Clone + PartialEq + 'static> (to: Route, icon: T, label: String) -> Element {
    let app = use_app_context();
    let nav = navigator();
    let href = to.to_string();

    rsx! {
        a {
            href: "{href}",
            onclick: move |evt: MouseEvent| {
                evt.prevent_default();
                if app.state.peek().must_confirm_leave() && !confirm_leave() {
                    return;
                }
                nav.push(to.clone());
            },
            span {
                title: "{label}",
                style: "color:white;",
                Icon { icon: icon, style: "width: 26px; height: 26px;" }
            }
        }
    }
}
