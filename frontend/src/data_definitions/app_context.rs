//! Application state shared through the component tree. Every change goes
//! through [`common::app_state::reduce`].

use common::{
    alerts::Alert,
    api_error::ApiError,
    app_state::{AppAction, AppState, reduce},
    hydration::InitialPayload,
};
use dioxus::prelude::*;

#[derive(Clone, Copy)]
pub struct AppContext {
    pub state: ReadSignal<AppState>,
    pub dispatch: Callback<AppAction>,
}

impl AppContext {
    pub fn queue_alert(&self, alert: Alert) {
        self.dispatch.call(AppAction::QueueAlert(alert));
    }

    pub fn report(&self, error: &ApiError) {
        dioxus::logger::tracing::warn!("portal request failed: {}", error);
        self.queue_alert(error.to_alert());
    }
}

/// Create the state signal and provide the context. Call once, at the root.
pub fn use_app_context_provider() -> AppContext {
    let mut state = use_signal(AppState::default);
    let dispatch = Callback::new(move |action: AppAction| {
        let next = reduce(state.peek().clone(), action);
        state.set(next);
    });
    use_context_provider(move || AppContext { state: state.into(), dispatch })
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>()
}

/// Props embedded in the page by the portal's server renderer, if any.
pub fn read_initial_payload() -> anyhow::Result<Option<InitialPayload>> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Some(root) = window.document().and_then(|d| d.document_element()) else {
        return Ok(None);
    };
    let payload = InitialPayload::from_html(&root.outer_html())?;
    Ok(Some(payload))
}
