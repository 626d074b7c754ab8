//! Service layer.

pub mod config;

pub use config::{Config, Settings};
