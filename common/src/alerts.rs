//! Queued, dismissible alerts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertStyle {
    Danger,
    Warning,
    #[default]
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    #[serde(default)]
    pub message: Vec<String>,
    #[serde(default)]
    pub style: AlertStyle,
    /// Dismissed automatically on the next successful navigation.
    #[serde(default = "default_nav_dismissable")]
    pub nav_dismissable: bool,
}

fn default_nav_dismissable() -> bool {
    true
}

impl Alert {
    pub fn new(title: impl Into<String>, message: Vec<String>, style: AlertStyle) -> Self {
        Self { title: title.into(), message, style, nav_dismissable: true }
    }

    pub fn sticky(mut self) -> Self {
        self.nav_dismissable = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AlertQueue {
    alerts: Vec<Alert>,
}

impl AlertQueue {
    /// Add an alert; one with the same title is replaced in place.
    pub fn queue(&mut self, alert: Alert) {
        match self.alerts.iter_mut().find(|a| a.title == alert.title) {
            Some(existing) => *existing = alert,
            None => self.alerts.push(alert),
        }
    }

    pub fn dismiss(&mut self, title: &str) {
        self.alerts.retain(|a| a.title != title);
    }

    pub fn clear_nav_dismissable(&mut self) {
        self.alerts.retain(|a| !a.nav_dismissable);
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
