// ABOUTME: Terminal feedback for headless commands.
// ABOUTME: Normal mode narrates a deploy, quiet mode prints results only, JSON mode emits one event per line.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::{ActionOutcome, DeploymentReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Step-by-step narration.
    Normal,
    /// Final result and warnings only, for CI logs.
    Quiet,
    /// One JSON object per line on stdout (errors on stderr).
    Json,
}

/// Writes command feedback in the selected mode.
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    /// Start the clock reported alongside `success` and `error`.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    fn elapsed(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Narration line; only shown in normal mode.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed()) {
            (OutputMode::Json, duration_secs) => emit(&MessageEvent {
                event: "success",
                message,
                duration_secs,
            }),
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            _ => println!("{message}"),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => emit_err(&MessageEvent {
                event: "error",
                message,
                duration_secs: self.elapsed(),
            }),
            _ => eprintln!("Error: {message}"),
        }
    }

    /// Per-step outcome of a deployment, then its warnings.
    ///
    /// Quiet mode keeps the warnings (on stderr) because they name resources
    /// that may need manual cleanup.
    pub fn report(&self, report: &DeploymentReport) {
        match self.mode {
            OutputMode::Json => emit(&ReportEvent {
                event: "report",
                report,
            }),
            OutputMode::Normal => {
                for action in report.actions.iter().chain(&report.cleanup) {
                    println!("  {}", step_line(action));
                }
                if !report.succeeded {
                    println!("  stopped after: {}", report.reached);
                }
                for warning in &report.warnings {
                    println!("  ! {warning}");
                }
            }
            OutputMode::Quiet => {
                for warning in &report.warnings {
                    eprintln!("Warning: {warning}");
                }
            }
        }
    }
}

fn step_line(action: &ActionOutcome) -> String {
    let mark = if action.succeeded { "✓" } else { "✗" };
    match &action.error {
        Some(e) => format!("{mark} {}: {e}", action.description),
        None => format!("{mark} {}", action.description),
    }
}

#[derive(Serialize)]
struct MessageEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct ReportEvent<'a> {
    event: &'a str,
    #[serde(flatten)]
    report: &'a DeploymentReport,
}

fn emit(event: &impl Serialize) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn emit_err(event: &impl Serialize) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_step_line_includes_error() {
        let action = ActionOutcome::failed("Push to acme-web", "rejected");
        assert_eq!(step_line(&action), "✗ Push to acme-web: rejected");
    }

    #[test]
    fn message_event_omits_missing_duration() {
        let json = serde_json::to_value(MessageEvent {
            event: "success",
            message: "Deployed acme-web",
            duration_secs: None,
        })
        .unwrap();
        assert_eq!(json["event"], "success");
        assert!(json.get("duration_secs").is_none());
    }
}
