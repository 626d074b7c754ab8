//! Panel message handling.
//!
//! One inbound message is processed synchronously to completion:
//! prompt → model → extraction → validation → execution, with a single
//! bounded self-repair pass on recognized failures. All failures come
//! back as text in the reply, never as an error to the panel.

use crate::assistant::docs::DocsRetriever;
use crate::assistant::extract::extract_code;
use crate::assistant::history::HistoryBuffer;
use crate::assistant::prompt;
use crate::assistant::runner::{ExecutionOutcome, ScriptRunner};
use crate::assistant::validation::{has_blocking, validate_script, IssueSeverity};
use crate::infrastructure::ai::ModelGateway;
use crate::service::config::Settings;
use cadpilot_core_types::{PanelRequest, PanelResponse};
use log::{info, warn};

/// Command prefix that skips the model and runs code directly.
pub const EXECUTE_PREVIOUS_COMMAND: &str = "execute the previous code";

const SKIP_EXECUTION_MARKERS: [&str; 2] = ["don't execute", "do not execute"];

const NO_CODE_TO_EXECUTE: &str =
    "No code found to execute. Generate a script first or paste one with the command.";

/// Owned session state for one chat panel: history, docs, and the
/// gateway/runner seams. One instance per panel; no ambient globals.
pub struct ChatSession {
    gateway: Box<dyn ModelGateway>,
    runner: Box<dyn ScriptRunner>,
    docs: DocsRetriever,
    code_history: HistoryBuffer,
    error_history: HistoryBuffer,
    validate_before_execute: bool,
}

impl ChatSession {
    pub fn new(
        gateway: Box<dyn ModelGateway>,
        runner: Box<dyn ScriptRunner>,
        docs: DocsRetriever,
        settings: &Settings,
    ) -> Self {
        Self {
            gateway,
            runner,
            docs,
            code_history: HistoryBuffer::new(settings.history_capacity),
            error_history: HistoryBuffer::new(settings.history_capacity),
            validate_before_execute: settings.validate_before_execute,
        }
    }

    pub async fn handle_message(&mut self, request: PanelRequest) -> PanelResponse {
        let turn_id = uuid::Uuid::new_v4();
        info!(
            "turn {}: panel message received ({} chars)",
            turn_id,
            request.text.len()
        );
        PanelResponse::new(self.process(request).await)
    }

    async fn process(&mut self, request: PanelRequest) -> String {
        let message = request.text.trim();

        if message
            .to_lowercase()
            .starts_with(EXECUTE_PREVIOUS_COMMAND)
        {
            return self.execute_previous(request.code.as_deref()).await;
        }

        // A fix-intent message pulls recent failures into the prompt even
        // when this turn has no fresh execution error.
        let error_context = if prompt::has_fix_intent(message) {
            self.error_digest()
        } else {
            None
        };

        let system = prompt::build_system_instruction(self.docs.digest_for(message).as_deref());
        let user = prompt::build_user_instruction(message, error_context.as_deref());
        let mut reply = self.model_reply(&system, &user).await;

        let Some(code) = extract_code(&reply) else {
            // Conversational answer; nothing to run.
            return reply;
        };
        self.code_history.push(code.clone());

        let lowered = message.to_lowercase();
        if SKIP_EXECUTION_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            return reply;
        }

        let (result_text, failure) = self.run_with_validation(&code).await;
        reply.push_str(&format!(
            "\n\n**Execution Result:**\n```\n{}\n```",
            result_text
        ));

        if let Some(error) = failure {
            self.error_history.push(error.clone());

            match self.docs.remedy_for_failure(&error, &code) {
                Some(remedy) => {
                    reply.push_str(&format!("\n\n**Suggested Fix:** {}", remedy.solution));
                    reply.push_str(&self.self_repair(message, &error).await);
                }
                None => {
                    reply.push_str(
                        "\n\n**Tip:** If you'd like me to fix this error, just ask 'Please fix the error'.",
                    );
                }
            }
        }

        reply
    }

    /// Single bounded self-repair pass: one more model call, one more
    /// execution. A failure here is recorded and reported, never retried.
    async fn self_repair(&mut self, original_message: &str, failure: &str) -> String {
        info!("Recognized failure signature, submitting one automatic fix request");

        let system =
            prompt::build_system_instruction(self.docs.digest_for(original_message).as_deref());
        let user = prompt::build_user_instruction(original_message, Some(failure));
        let reply = self.model_reply(&system, &user).await;

        let Some(code) = extract_code(&reply) else {
            return format!(
                "\n\n**Improved Solution:**\n{}\n\nNo code found in the follow-up reply.",
                reply
            );
        };
        self.code_history.push(code.clone());

        let (result_text, repair_failure) = self.run_with_validation(&code).await;
        if let Some(error) = repair_failure {
            self.error_history.push(error);
        }

        format!(
            "\n\n**Improved Solution:**\n{}\n\n**Execution Result:**\n```\n{}\n```",
            reply, result_text
        )
    }

    async fn execute_previous(&mut self, pasted: Option<&str>) -> String {
        let code = pasted
            .and_then(|pasted| {
                extract_code(pasted).or_else(|| {
                    let trimmed = pasted.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
            })
            .or_else(|| self.code_history.latest().map(str::to_string));

        let Some(code) = code else {
            return NO_CODE_TO_EXECUTE.to_string();
        };

        let (result_text, failure) = self.run_with_validation(&code).await;
        if let Some(error) = failure {
            self.error_history.push(error);
        }
        format!("**Execution Result:**\n```\n{}\n```", result_text)
    }

    /// Validate, then execute. Returns the panel-facing result text plus
    /// the failure text when the attempt did not succeed.
    async fn run_with_validation(&self, code: &str) -> (String, Option<String>) {
        if self.validate_before_execute {
            let issues = validate_script(code);
            for issue in issues
                .iter()
                .filter(|issue| issue.severity == IssueSeverity::Advisory)
            {
                warn!("Validation advisory: {}", issue.message);
            }

            if has_blocking(&issues) {
                let listing = issues
                    .iter()
                    .filter(|issue| issue.severity == IssueSeverity::Blocking)
                    .map(|issue| format!("- {}", issue.message))
                    .collect::<Vec<_>>()
                    .join("\n");
                let text = format!("Validation failed; the script was not executed:\n{}", listing);
                return (text.clone(), Some(text));
            }
        }

        match self.runner.submit(code).await {
            ExecutionOutcome::Failed { error } => (error.clone(), Some(error)),
            outcome => (outcome.render(), None),
        }
    }

    /// Gateway policy: the chat layer always works with a string, never
    /// with a transport error.
    async fn model_reply(&self, system: &str, user: &str) -> String {
        match self.gateway.complete(system, user).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model call failed: {}", e);
                format!("Error communicating with the model: {}", e)
            }
        }
    }

    /// First-line summaries of recent failures, newest first.
    fn error_digest(&self) -> Option<String> {
        if self.error_history.is_empty() {
            return None;
        }
        let digest = self
            .error_history
            .iter()
            .enumerate()
            .map(|(i, error)| {
                let summary = error.lines().next().unwrap_or(error);
                format!("{}. {}", i + 1, summary)
            })
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("Recent errors to avoid:\n{}", digest))
    }
}
