//! Low-level DTOs exchanged between the copilot core and the panel bridge.

use serde::{Deserialize, Serialize};

/// One inbound message posted by the embedded chat panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRequest {
    /// Free-form user message.
    pub text: String,
    /// Optional pasted code, consumed by the explicit execute command.
    #[serde(default)]
    pub code: Option<String>,
}

impl PanelRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }
}

/// The markdown reply rendered back into the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelResponse {
    pub text: String,
}

impl PanelResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
