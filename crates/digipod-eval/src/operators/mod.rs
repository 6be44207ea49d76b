//! Combining functions plugged into the rectangle sweep
//!
//! Every function here has the shape
//! `(start, end, slots) -> IntervalWithCount` and is pure. An absent slot
//! (`None`) is read as a NEGATIVE interval with count 0 unless the function
//! documents otherwise.

pub mod counting;
pub mod logical;

use crate::merge::Slot;
use digipod_types::IntervalType;

/// Classification of a slot, absent read as NEGATIVE
pub(crate) fn slot_type(slot: Slot<'_>) -> IntervalType {
    slot.map_or(IntervalType::Negative, |interval| interval.interval_type)
}

/// Count of a slot, absent or uncounted read as 0
pub(crate) fn slot_count(slot: Slot<'_>) -> f64 {
    slot.map_or(0.0, |interval| interval.count_or_zero())
}
