//! AI provider access
//!
//! One-shot Messages API calls behind the `ModelGateway` seam.

pub mod client;
pub mod types;

pub use client::{AnthropicClient, ModelGateway, ANTHROPIC_VERSION};
