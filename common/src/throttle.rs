//! Leading-edge throttle for user actions such as Save.

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Throttle {
    window: TimeDelta,
    last_fired: Option<DateTime<Utc>>,
}

impl Throttle {
    pub fn new(window_ms: u64) -> Self {
        Self { window: TimeDelta::milliseconds(window_ms as i64), last_fired: None }
    }

    /// Whether an action at `now` should run. The first call in each window
    /// fires; the rest are dropped.
    pub fn try_fire(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(last) = self.last_fired {
            if now - last < self.window {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }
}
