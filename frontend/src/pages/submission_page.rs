use std::time::Duration;

use common::{
    api_error::ApiError,
    ingestion::{IngestionSubmission, ProcessingState},
    polling::{PollPolicy, poll_until},
};
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

use crate::{
    api::portal_api::{api_error, get_poll_policy, get_submission},
    components::{error_boundary::ApiErrorDisplay, suspend_boundary::LoadingIndicator},
    data_definitions::app_context::use_app_context,
};

/// Follows an ingestion submission until it is done. Leaving the page drops
/// the polling future, which stops it.
#[component]
pub fn SubmissionPage(submission_uuid: ReadSignal<String>) -> Element {
    let app = use_app_context();
    let latest = use_signal(|| None::<IngestionSubmission>);

    let mut outcome = use_resource(move || {
        let uuid = submission_uuid.read().clone();
        async move {
            let mut latest = latest;
            latest.set(None);
            let policy = get_poll_policy().await.unwrap_or_else(|e| {
                dioxus::logger::tracing::warn!("using default poll policy: {}", e);
                PollPolicy::default()
            });
            let fetch = move || {
                let uuid = uuid.clone();
                async move {
                    let mut latest = latest;
                    let submission = get_submission(uuid).await.map_err(|e| api_error(&e))?;
                    latest.set(Some(submission.clone()));
                    Ok::<_, ApiError>(submission)
                }
            };
            let sleep = |interval: Duration| TimeoutFuture::new(interval.as_millis() as u32);
            let result = poll_until(policy, fetch, |s: &IngestionSubmission| s.is_terminal(), sleep).await;
            if let Err(e) = &result {
                app.report(e);
            }
            result
        }
    });

    let finished = outcome.read();
    let failure = match finished.as_ref() {
        Some(Err(e)) => Some(e.clone()),
        _ => None,
    };

    rsx! {
        div {
            style: "display:flex; flex-direction:column; gap: 16px; padding: 24px;",
            {match latest() {
                Some(submission) => rsx! { SubmissionStatus { submission } },
                None if failure.is_none() => rsx! { LoadingIndicator { label: "Checking submission..." } },
                None => rsx! {},
            }}
            if let Some(error) = failure {
                ApiErrorDisplay {
                    error,
                    button {
                        style: "font-size: 16px; padding: 6px 12px; border-radius: 6px;",
                        onclick: move |_| outcome.restart(),
                        "Check again"
                    }
                }
            }
        }
    }
}

#[component]
fn SubmissionStatus(submission: IngestionSubmission) -> Element {
    let status = &submission.processing_status;
    let state = match status.state {
        ProcessingState::Created => "created",
        ProcessingState::Submitted => "submitted",
        ProcessingState::Processing => "processing",
        ProcessingState::Done if submission.succeeded() => "done",
        ProcessingState::Done => "done, with problems",
    };
    let progress = status.progress.clone().unwrap_or_default();

    rsx! {
        div {
            style: "display:flex; flex-direction:column; gap: 8px; padding: 16px; background: white; border: 1px solid #E5E7EB; border-radius: 8px;",
            div { style: "font-size: 20px;", "Status: {state}" }
            if !progress.is_empty() {
                div { style: "color: #6B7280;", "{progress}" }
            }
            if let Some(kind) = submission.ingestion_type.clone() {
                div { "Type: {kind}" }
            }
            if !submission.errors.is_empty() {
                ul {
                    style: "color: #B91C1C;",
                    for (i, error) in submission.errors.iter().enumerate() {
                        li { key: "{i}", "{error}" }
                    }
                }
            }
        }
    }
}
