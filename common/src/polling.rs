//! Bounded polling for server-side jobs to reach a terminal state.
//!
//! The timer is passed in so the same loop runs on tokio on the server and on
//! browser timers in the client. Dropping the returned future cancels it.

use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{api_error::ApiError, portal_const::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_ATTEMPTS}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS), max_attempts: DEFAULT_POLL_MAX_ATTEMPTS }
    }
}

/// Call `fetch` until `is_terminal` holds, sleeping `policy.interval` between
/// calls. At most `policy.max_attempts` calls are made; after that the result
/// is [`ApiError::Timeout`]. `NotFound` counts as "not ready yet" since newly
/// created items may not be visible immediately; other errors end the loop.
pub async fn poll_until<T, F, Fut, S, SFut>(
    policy: PollPolicy,
    mut fetch: F,
    is_terminal: impl Fn(&T) -> bool,
    mut sleep: S,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    for attempt in 1..=policy.max_attempts {
        match fetch().await {
            Ok(value) if is_terminal(&value) => return Ok(value),
            Ok(_) | Err(ApiError::NotFound { .. }) => {}
            Err(error) => return Err(error),
        }
        if attempt < policy.max_attempts {
            sleep(policy.interval).await;
        }
    }
    Err(ApiError::Timeout { attempts: policy.max_attempts })
}
