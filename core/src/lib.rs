//! Kiln Core - Foundational Types
//!
//! Error taxonomy and execution configuration shared by the Kiln crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{DriverConfig, FailurePolicy};
pub use error::{KilnError, Result};

/// Kiln version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
