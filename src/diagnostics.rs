// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a key revocation warning.
    pub fn key_revocation(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::KeyRevocation,
            message: message.into(),
        }
    }

    /// Create a workspace removal warning.
    pub fn workspace_removal(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::WorkspaceRemoval,
            message: message.into(),
        }
    }

    /// Create a warning for a relay session that never reported an exit code.
    pub fn exit_status_unknown(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ExitStatusUnknown,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Deploy key could not be removed from the platform.
    KeyRevocation,
    /// Workspace directory could not be removed.
    WorkspaceRemoval,
    /// An attached command finished without reporting its exit code.
    ExitStatusUnknown,
}
