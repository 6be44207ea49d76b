//! CLI functionality for the digipod tool
//!
//! This module contains all CLI-related functionality including:
//! - Recommendation evaluation
//! - Direct merging of result files
//! - Listing recommendations and criteria
//! - Result file resolution
//! - Output formatting

pub mod evaluate;
pub mod list;
pub mod merge;
pub mod output;
pub mod resolver;
