use common::app_state::AppAction;
use dioxus::prelude::*;

use crate::api::portal_api::{api_error, get_session_user};
use crate::components::error_boundary::GlobalErrorBoundary;
use crate::data_definitions::app_context::{read_initial_payload, use_app_context_provider};
use crate::data_definitions::navigation_controller::use_navigation_controller_provider;
use crate::routes::Route;
const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
pub fn App() -> Element {
    let app = use_app_context_provider();
    use_navigation_controller_provider(app);

    // seed from the server-rendered payload once, then ask for the session
    use_effect(move || {
        match read_initial_payload() {
            Ok(Some(payload)) => app.dispatch.call(AppAction::Hydrate(payload)),
            Ok(None) => {}
            Err(e) => dioxus::logger::tracing::error!("ignoring initial payload: {e:#}"),
        }
        spawn(async move {
            match get_session_user().await {
                Ok(user) => app.dispatch.call(AppAction::SetSession(user)),
                Err(e) => app.report(&api_error(&e)),
            }
        });
    });

    rsx! {
        document::Link { rel: "preconnect", href: "https://fonts.googleapis.com" }
        document::Link { rel: "preconnect", href: "https://fonts.gstatic.com" }
        document::Link { rel: "stylesheet", href: "https://fonts.googleapis.com/css2?family=Roboto:ital,wght@0,100..900;1,100..900&display=swap" }

        document::Link { rel: "stylesheet", href: MAIN_CSS }
        GlobalErrorBoundary {
            boundary_name: "App".to_string(),
            Router::<Route> {}
        }
    }
}
