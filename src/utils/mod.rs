//! Utility modules for common functionality
//!
//! Logging and progress reporting shared across the application.

pub mod logger;
pub mod progress;
