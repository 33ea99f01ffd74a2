// ABOUTME: Per-step outcome records collected during a deployment.
// ABOUTME: Every discrete action (including cleanup) yields one ActionOutcome.

use serde::Serialize;
use std::fmt;

/// Outcome of one discrete deployment step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub description: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn succeeded(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            succeeded: true,
            error: None,
        }
    }

    pub fn failed(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            succeeded: false,
            error: Some(error.into()),
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "{}: ok", self.description),
            Some(e) => write!(f, "{}: {}", self.description, e),
        }
    }
}

/// Ordered list of step outcomes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ActionLog {
    outcomes: Vec<ActionOutcome>,
}

impl ActionLog {
    /// Record the result of a step and hand it back unchanged.
    pub fn record<T, E: fmt::Display>(
        &mut self,
        description: impl Into<String>,
        result: Result<T, E>,
    ) -> Result<T, E> {
        let description = description.into();
        match &result {
            Ok(_) => {
                tracing::info!("{} succeeded", description);
                self.outcomes.push(ActionOutcome::succeeded(description));
            }
            Err(e) => {
                tracing::error!("{} failed: {}", description, e);
                self.outcomes
                    .push(ActionOutcome::failed(description, e.to_string()));
            }
        }
        result
    }

    pub fn push(&mut self, outcome: ActionOutcome) {
        self.outcomes.push(outcome);
    }

    /// True when no recorded step failed. An empty log counts as success.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }

    pub fn outcomes(&self) -> &[ActionOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn into_outcomes(self) -> Vec<ActionOutcome> {
        self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_passes_result_through() {
        let mut log = ActionLog::default();

        let ok: Result<u32, String> = log.record("first", Ok(7));
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> = log.record("second", Err("boom".to_string()));
        assert_eq!(err, Err("boom".to_string()));

        assert_eq!(log.len(), 2);
        assert!(log.outcomes()[0].succeeded);
        assert_eq!(log.outcomes()[1].error.as_deref(), Some("boom"));
        assert!(!log.all_succeeded());
    }

    #[test]
    fn empty_log_is_successful() {
        assert!(ActionLog::default().all_succeeded());
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut log = ActionLog::default();
        log.push(ActionOutcome::succeeded("push"));
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "description": "push", "succeeded": true }])
        );
    }
}
