//! Logical combinators over interval types
//!
//! These carry no count; the result is always `count = None`.

use super::slot_type;
use crate::merge::Slot;
use digipod_types::{IntervalType, IntervalWithCount, Timestamp};

pub fn combine_and(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    let interval_type = slots
        .iter()
        .map(|slot| slot_type(*slot))
        .reduce(|acc, t| acc & t)
        .unwrap_or(IntervalType::Negative);
    uncounted(start, end, interval_type)
}

pub fn combine_or(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    let interval_type = slots
        .iter()
        .map(|slot| slot_type(*slot))
        .reduce(|acc, t| acc | t)
        .unwrap_or(IntervalType::Negative);
    uncounted(start, end, interval_type)
}

/// Invert the single operand; an absent operand becomes POSITIVE
pub fn combine_not(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    let operand = slots.first().copied().flatten();
    uncounted(start, end, !slot_type(operand))
}

/// Gate the intervention on the population
///
/// Where the population is POSITIVE the result carries the intervention's
/// type and count; everywhere else the recommendation does not apply.
pub fn combine_population_intervention(
    start: Timestamp,
    end: Timestamp,
    slots: &[Slot<'_>],
) -> IntervalWithCount {
    let population = slots.first().copied().flatten();
    let intervention = slots.get(1).copied().flatten();

    if slot_type(population) != IntervalType::Positive {
        return uncounted(start, end, IntervalType::NotApplicable);
    }

    match intervention {
        Some(interval) => IntervalWithCount {
            start,
            end,
            interval_type: interval.interval_type,
            count: interval.count,
        },
        None => IntervalWithCount {
            start,
            end,
            interval_type: IntervalType::Negative,
            count: Some(0.0),
        },
    }
}

fn uncounted(start: Timestamp, end: Timestamp, interval_type: IntervalType) -> IntervalWithCount {
    IntervalWithCount {
        start,
        end,
        interval_type,
        count: None,
    }
}
