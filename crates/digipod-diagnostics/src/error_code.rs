//! digipod error codes following a structured numbering system
//!
//! Error code ranges:
//! - DGP0001-DGP0099: Input errors (malformed values, unknown names)
//! - DGP0100-DGP0199: Wiring errors (combinator graph construction)
//! - DGP0200-DGP0299: Data errors (partition invariants)
//! - DGP0300-DGP0399: Provider errors (criterion result lookup)
//! - DGP0400-DGP0499: System errors (I/O)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is an input error (0001-0099)
    pub const fn is_input_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a wiring error (0100-0199)
    pub const fn is_wiring_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a data error (0200-0299)
    pub const fn is_data_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a provider error (0300-0399)
    pub const fn is_provider_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DGP{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Input errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid time value"));
    map.insert(2, ErrorInfo::new("Malformed input document"));
    map.insert(3, ErrorInfo::new("Unknown combine policy")
        .with_help("Known policies: combine-4-1, combine-4-3, max-count-or, and, or, not, population-intervention, indicator"));
    map.insert(4, ErrorInfo::new("Unknown recommendation"));
    map.insert(5, ErrorInfo::new("Invalid observation window")
        .with_help("The window start must lie strictly before its end"));

    // Wiring errors (0100-0199)
    map.insert(101, ErrorInfo::new("Operand count does not match combinator arity")
        .with_help("The combinator graph was wired with the wrong number of children"));
    map.insert(102, ErrorInfo::new("Expected operand not declared by combinator"));
    map.insert(103, ErrorInfo::new("Duplicate operand key"));
    map.insert(104, ErrorInfo::new("Combinator has no operands"));

    // Data errors (0200-0299)
    map.insert(201, ErrorInfo::new("Partition is not sorted by start time"));
    map.insert(202, ErrorInfo::new("Partition contains overlapping intervals"));
    map.insert(203, ErrorInfo::new("Interval is empty or inverted"));
    map.insert(204, ErrorInfo::new("Unexpected element in interval data"));

    // Provider errors (0300-0399)
    map.insert(301, ErrorInfo::new("Criterion result not found"));
    map.insert(302, ErrorInfo::new("Criterion result provider failed"));

    // System errors (0400-0499)
    map.insert(401, ErrorInfo::new("I/O error"));

    map
});

// Input errors
pub const DGP0001: ErrorCode = ErrorCode::new(1);
pub const DGP0002: ErrorCode = ErrorCode::new(2);
pub const DGP0003: ErrorCode = ErrorCode::new(3);
pub const DGP0004: ErrorCode = ErrorCode::new(4);
pub const DGP0005: ErrorCode = ErrorCode::new(5);

// Wiring errors
pub const DGP0101: ErrorCode = ErrorCode::new(101);
pub const DGP0102: ErrorCode = ErrorCode::new(102);
pub const DGP0103: ErrorCode = ErrorCode::new(103);
pub const DGP0104: ErrorCode = ErrorCode::new(104);

// Data errors
pub const DGP0201: ErrorCode = ErrorCode::new(201);
pub const DGP0202: ErrorCode = ErrorCode::new(202);
pub const DGP0203: ErrorCode = ErrorCode::new(203);
pub const DGP0204: ErrorCode = ErrorCode::new(204);

// Provider errors
pub const DGP0301: ErrorCode = ErrorCode::new(301);
pub const DGP0302: ErrorCode = ErrorCode::new(302);

// System errors
pub const DGP0401: ErrorCode = ErrorCode::new(401);
