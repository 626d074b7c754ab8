// CadPilot Core Library - host-agnostic copilot logic
// Layering: Util -> Infrastructure -> Service -> Assistant

pub mod assistant; // Assistant layer - chat workflow, runner, docs lookup
pub mod infrastructure; // Infrastructure layer - AI client, storage
pub mod service; // Service layer - configuration
pub mod util; // Utility layer - errors

// Export main types
pub use util::errors::{CadPilotError, CadPilotResult};

// Export service layer components
pub use service::config::{Config, Settings};

// Export infrastructure components
pub use infrastructure::ai::{AnthropicClient, ModelGateway};
pub use infrastructure::storage::SnapshotStore;

// Export assistant core types
pub use assistant::{
    ChatSession, DocsRetriever, ExecutionOutcome, HistoryBuffer, ScriptRunner, SubprocessRunner,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
