//! Script execution seam.
//!
//! Generated code is untrusted; nothing in this crate loads it into the
//! host process. Implementations materialize the code as an execution
//! unit, run it, and report one of the two terminal states.

use async_trait::async_trait;
use serde::Serialize;

pub mod subprocess;

pub use subprocess::SubprocessRunner;

/// Terminal state of one execution attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ExecutionOutcome {
    Succeeded {
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Failed {
        error: String,
    },
}

impl ExecutionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionOutcome::Failed { .. })
    }

    /// Panel-facing rendering of the outcome.
    pub fn render(&self) -> String {
        match self {
            ExecutionOutcome::Succeeded { detail: None } => {
                "Code executed successfully.".to_string()
            }
            ExecutionOutcome::Succeeded {
                detail: Some(detail),
            } => format!("Code executed successfully. Result: {}", detail),
            ExecutionOutcome::Failed { error } => error.clone(),
        }
    }
}

/// Sandboxed-execution interface: one attempt per submit, cleanup of any
/// materialized unit guaranteed on every exit path.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn submit(&self, code: &str) -> ExecutionOutcome;
}
