//! digipod type system
//!
//! This crate defines the values the interval engine works on:
//! - [`IntervalType`], the POSITIVE / NEGATIVE / NO_DATA / NOT_APPLICABLE lattice
//!   with its meet (`&`), join (`|`) and inversion (`!`) operators
//! - [`Interval`] and [`IntervalWithCount`], half-open `[start, end)` spans
//! - [`ObservationWindow`], the outer window every partition covers
//! - [`PersonIntervals`], per-subject partitions, plus their JSON reader

pub mod interval;
pub mod interval_type;
pub mod json;
pub mod person;

pub use interval::*;
pub use interval_type::IntervalType;
pub use json::{parse_person_intervals, person_intervals_from_str};
pub use person::*;
