//! Storage system
//!
//! Snapshot persistence for data rebuilt from built-in tables.

pub mod persistence;

pub use persistence::SnapshotStore;
