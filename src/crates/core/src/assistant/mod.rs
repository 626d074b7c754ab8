//! Assistant layer - prompt construction, reply handling, and the script
//! execution workflow behind the chat panel.

pub mod chat;
pub mod docs;
pub mod extract;
pub mod history;
pub mod prompt;
pub mod runner;
pub mod validation;

pub use chat::{ChatSession, EXECUTE_PREVIOUS_COMMAND};
pub use docs::DocsRetriever;
pub use extract::extract_code;
pub use history::HistoryBuffer;
pub use runner::{ExecutionOutcome, ScriptRunner, SubprocessRunner};
pub use validation::{validate_script, IssueSeverity, ValidationIssue};
