//! Platform-specific integrations.

pub mod clipboard;
