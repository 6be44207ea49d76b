//! digipod diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the digipod
//! crates: structured error codes, the [`DigipodError`] type and diagnostic
//! reporting.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for digipod operations
pub type Result<T> = std::result::Result<T, DigipodError>;
