//! Single-flight loading of the page context for the current route.
//!
//! Starting a navigation cancels the task of the previous one. The reducer
//! also drops any result whose ticket is no longer the latest, so a request
//! that finishes after being superseded never reaches the page.

use common::{
    app_state::AppAction,
    portal_const::SLOW_NETWORK_THRESHOLD_MS,
};
use dioxus::prelude::*;
use dioxus::core::Task;
use futures_util::future::{Either, select};
use gloo_timers::future::TimeoutFuture;

use crate::{api::portal_api::{api_error, load_context}, data_definitions::app_context::AppContext};

#[derive(Clone, Copy)]
pub struct NavigationController {
    app: AppContext,
    current_task: Signal<Option<Task>>,
}

impl NavigationController {
    /// Load the context document at `href`, or use `local_context` as is
    /// when the page has no portal document behind it.
    pub fn navigate(&self, href: String, local_context: Option<serde_json::Value>) {
        let mut current_task = self.current_task;
        if let Some(task) = current_task.take() {
            dioxus::logger::tracing::debug!("aborting previous navigation");
            task.cancel();
        }

        let app = self.app;
        app.dispatch.call(AppAction::StartNavigation { href: href.clone() });
        let Some(ticket) = app.state.peek().navigation.in_flight else {
            return;
        };

        if let Some(context) = local_context {
            app.dispatch.call(AppAction::NavigationLoaded { ticket, href, context });
            return;
        }

        let task = spawn(async move {
            let request = Box::pin(load_context(href.clone()));
            let timer = Box::pin(TimeoutFuture::new(SLOW_NETWORK_THRESHOLD_MS as u32));
            let result = match select(request, timer).await {
                Either::Left((result, _)) => result,
                Either::Right((_, request)) => {
                    dioxus::logger::tracing::info!("slow network while loading {}", href);
                    app.dispatch.call(AppAction::SlowNetwork { ticket });
                    request.await
                }
            };
            match result {
                Ok(context) => app.dispatch.call(AppAction::NavigationLoaded { ticket, href, context }),
                Err(e) => app.dispatch.call(AppAction::NavigationFailed { ticket, error: api_error(&e) }),
            }
        });
        current_task.set(Some(task));
    }
}

pub fn use_navigation_controller_provider(app: AppContext) -> NavigationController {
    let current_task = use_signal(|| None);
    use_context_provider(move || NavigationController { app, current_task })
}

pub fn use_navigation_controller() -> NavigationController {
    use_context::<NavigationController>()
}
