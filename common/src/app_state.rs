//! Application state and the reducer that updates it.

use serde::{Deserialize, Serialize};

use crate::{
    alerts::{Alert, AlertQueue},
    api_error::ApiError,
    hydration::InitialPayload,
    navigation::{NavigationSequence, NavigationTicket},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionUser {
    #[serde(rename = "@id")]
    pub at_id: String,
    pub uuid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub groups: Vec<String>,
    pub project: Option<String>,
}

impl SessionUser {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() { self.email.clone() } else { name.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NavigationState {
    pub sequence: NavigationSequence,
    pub in_flight: Option<NavigationTicket>,
    pub pending_href: Option<String>,
    pub slow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppState {
    pub href: String,
    pub context: serde_json::Value,
    pub session: Option<SessionUser>,
    pub alerts: AlertQueue,
    pub navigation: NavigationState,
    /// The open page holds edits that leaving it would lose.
    pub unsaved_edits: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Seed state from the payload embedded in the server-rendered page.
    Hydrate(InitialPayload),
    /// Begin a navigation. The new ticket is left in `navigation.in_flight`.
    StartNavigation { href: String },
    NavigationLoaded { ticket: NavigationTicket, href: String, context: serde_json::Value },
    NavigationFailed { ticket: NavigationTicket, error: ApiError },
    SlowNetwork { ticket: NavigationTicket },
    SetSession(Option<SessionUser>),
    QueueAlert(Alert),
    DismissAlert(String),
    SetUnsavedEdits(bool),
}

impl AppState {
    /// In-app navigation away from the page has to be confirmed first.
    pub fn must_confirm_leave(&self) -> bool {
        self.unsaved_edits
    }

    pub fn is_loading(&self) -> bool {
        self.navigation.in_flight.is_some()
    }

    fn owns(&self, ticket: NavigationTicket) -> bool {
        self.navigation.sequence.is_current(ticket) && self.navigation.in_flight == Some(ticket)
    }
}

pub fn reduce(mut state: AppState, action: AppAction) -> AppState {
    match action {
        AppAction::Hydrate(payload) => {
            if let Some(href) = payload.href {
                state.href = href;
            }
            if let Some(context) = payload.context {
                state.context = context;
            }
            if payload.user_details.is_some() {
                state.session = payload.user_details;
            }
            for alert in payload.alerts {
                state.alerts.queue(alert);
            }
        }
        AppAction::StartNavigation { href } => {
            let ticket = state.navigation.sequence.start();
            state.navigation.in_flight = Some(ticket);
            state.navigation.pending_href = Some(href);
            state.navigation.slow = false;
        }
        AppAction::NavigationLoaded { ticket, href, context } => {
            if state.owns(ticket) {
                state.href = href;
                state.context = context;
                state.navigation.in_flight = None;
                state.navigation.pending_href = None;
                state.navigation.slow = false;
                state.alerts.clear_nav_dismissable();
            }
        }
        AppAction::NavigationFailed { ticket, error } => {
            if state.owns(ticket) {
                state.navigation.in_flight = None;
                state.navigation.pending_href = None;
                state.navigation.slow = false;
                state.alerts.queue(error.to_alert());
            }
        }
        AppAction::SlowNetwork { ticket } => {
            if state.owns(ticket) {
                state.navigation.slow = true;
            }
        }
        AppAction::SetSession(session) => state.session = session,
        AppAction::QueueAlert(alert) => state.alerts.queue(alert),
        AppAction::DismissAlert(title) => state.alerts.dismiss(&title),
        AppAction::SetUnsavedEdits(unsaved) => state.unsaved_edits = unsaved,
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertStyle;

    fn started(state: AppState, href: &str) -> (AppState, NavigationTicket) {
        let state = reduce(state, AppAction::StartNavigation { href: href.to_string() });
        let ticket = state.navigation.in_flight.unwrap();
        (state, ticket)
    }

    #[test]
    fn stale_navigation_results_are_ignored() {
        let (state, first) = started(AppState::default(), "/cases/A/");
        let (state, second) = started(state, "/cases/B/");

        let state = reduce(state, AppAction::NavigationLoaded {
            ticket: first,
            href: "/cases/A/".into(),
            context: serde_json::json!({"@id": "/cases/A/"}),
        });
        assert!(state.is_loading());
        assert_eq!(state.href, "");

        let state = reduce(state, AppAction::NavigationLoaded {
            ticket: second,
            href: "/cases/B/".into(),
            context: serde_json::json!({"@id": "/cases/B/"}),
        });
        assert!(!state.is_loading());
        assert_eq!(state.href, "/cases/B/");
    }

    #[test]
    fn failure_queues_alert_and_slow_flag_resets() {
        let (state, ticket) = started(AppState::default(), "/x/");
        let state = reduce(state, AppAction::SlowNetwork { ticket });
        assert!(state.navigation.slow);
        let state = reduce(state, AppAction::NavigationFailed { ticket, error: ApiError::Network { message: "offline".into() } });
        assert!(!state.navigation.slow);
        assert_eq!(state.alerts.alerts()[0].title, "Network Error");
    }

    #[test]
    fn successful_navigation_clears_dismissable_alerts() {
        let state = reduce(AppState::default(), AppAction::QueueAlert(Alert::new("Saved", vec![], AlertStyle::Success)));
        let (state, ticket) = started(state, "/y/");
        let state = reduce(state, AppAction::NavigationLoaded { ticket, href: "/y/".into(), context: serde_json::Value::Null });
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn hydrate_seeds_session_and_context() {
        let payload = InitialPayload {
            href: Some("/cases/A/".into()),
            context: Some(serde_json::json!({"@type": ["Case", "Item"]})),
            user_details: Some(SessionUser { email: "a@b.org".into(), ..Default::default() }),
            alerts: vec![],
        };
        let state = reduce(AppState::default(), AppAction::Hydrate(payload));
        assert_eq!(state.session.unwrap().display_name(), "a@b.org");
        assert_eq!(state.href, "/cases/A/");
    }

    #[test]
    fn unsaved_edits_survive_navigation_until_cleared() {
        let state = reduce(AppState::default(), AppAction::SetUnsavedEdits(true));
        assert!(state.must_confirm_leave());
        let (state, ticket) = started(state, "/cases/B/");
        let state = reduce(state, AppAction::NavigationLoaded { ticket, href: "/cases/B/".into(), context: serde_json::Value::Null });
        assert!(state.must_confirm_leave());
        let state = reduce(state, AppAction::SetUnsavedEdits(false));
        assert!(!state.must_confirm_leave());
    }
}
