//! Request-cycle state machine shared by the orchestrators.
//!
//! # States
//!
//! - **Idle**: nothing attempted yet
//! - **Pending**: one request in flight; new triggers are rejected
//! - **Succeeded**: the last request returned a result
//! - **Failed**: the last attempt failed validation or the request failed

use serde::{Deserialize, Serialize};

use crate::error::{WorkflowError, WorkflowResult};

/// Phase of a request cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Pending => "pending",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase plus the single result slot and single error slot of one orchestrator.
#[derive(Debug, Clone)]
pub struct RequestSlot<T> {
    phase: Phase,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            error: None,
        }
    }
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with busy if a request is already pending.
    pub fn ensure_idle(&self, operation: &str) -> WorkflowResult<()> {
        if self.phase == Phase::Pending {
            return Err(WorkflowError::busy(operation));
        }
        Ok(())
    }

    /// Record a client-side validation failure. The previous result is kept.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.phase = Phase::Failed;
        self.error = Some(message.into());
    }

    /// Enter `Pending`, clearing the error and discarding the previous result.
    pub fn begin(&mut self, operation: &str) -> WorkflowResult<()> {
        self.ensure_idle(operation)?;
        self.phase = Phase::Pending;
        self.error = None;
        self.result = None;
        Ok(())
    }

    /// Replace the result wholesale.
    pub fn succeed(&mut self, result: T) {
        self.phase = Phase::Succeeded;
        self.result = Some(result);
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = Phase::Failed;
        self.error = Some(message.into());
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
