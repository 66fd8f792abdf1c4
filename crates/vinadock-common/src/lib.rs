//! vinadock-common — Shared error taxonomy and configuration used across all vinadock crates.

pub mod error;
pub mod config;

// Re-export commonly used types
pub use config::{Config, DockingSection, ToolsSection};
pub use error::{DockError, Result, Side};
