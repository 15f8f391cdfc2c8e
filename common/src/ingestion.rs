//! IngestionSubmission documents as polled by the submission status page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    #[default]
    Created,
    Submitted,
    Processing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingOutcome {
    #[default]
    Unknown,
    Success,
    Failure,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProcessingStatus {
    pub state: ProcessingState,
    pub outcome: ProcessingOutcome,
    pub progress: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestionSubmission {
    #[serde(rename = "@id")]
    pub at_id: String,
    pub uuid: String,
    pub ingestion_type: Option<String>,
    pub processing_status: ProcessingStatus,
    pub errors: Vec<String>,
    pub additional_data: serde_json::Value,
}

impl IngestionSubmission {
    pub fn is_terminal(&self) -> bool {
        self.processing_status.state == ProcessingState::Done
    }

    pub fn succeeded(&self) -> bool {
        self.is_terminal() && self.processing_status.outcome == ProcessingOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_only_when_done() {
        let mut submission: IngestionSubmission = serde_json::from_value(serde_json::json!({
            "@id": "/ingestion-submissions/abc/",
            "uuid": "abc",
            "processing_status": {"state": "processing", "outcome": "unknown", "progress": "12 of 40"}
        }))
        .unwrap();
        assert!(!submission.is_terminal());
        submission.processing_status.state = ProcessingState::Done;
        submission.processing_status.outcome = ProcessingOutcome::Failure;
        assert!(submission.is_terminal());
        assert!(!submission.succeeded());
    }
}
