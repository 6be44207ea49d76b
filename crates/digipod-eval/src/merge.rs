//! Rectangle sweep over aligned partitions
//!
//! Every input partition is a sorted, non-overlapping sequence of intervals
//! over the same observation window. The sweep cuts the window at every
//! boundary of every input, asks the combining function for one result per
//! cut, and coalesces neighbouring cuts that produced the same `(type, count)`.

use crate::policy::CombinePolicy;
use digipod_diagnostics::{DigipodError, Result};
use digipod_types::{
    IntervalWithCount, ObservationWindow, PersonId, PersonIntervals, Timestamp, validate_partition,
};
use indexmap::IndexSet;
use log::{debug, trace, warn};
use smallvec::SmallVec;

/// The interval of one input active over a cut, or `None` for a gap
pub type Slot<'a> = Option<&'a IntervalWithCount>;

/// One slot per input partition
pub type Slots<'a> = SmallVec<[Slot<'a>; 4]>;

/// Merge aligned partitions of one subject
///
/// `partitions[i]` is `None` when input `i` has nothing for this subject; it
/// then yields an absent slot over the whole window. `combine` receives the
/// cut `[lo, hi)` and one slot per input and returns the interval for that cut.
///
/// Each partition must be sorted and non-overlapping. The output is a total
/// partition of `window`.
pub fn merge_partitions<F>(
    window: &ObservationWindow,
    partitions: &[Option<&[IntervalWithCount]>],
    mut combine: F,
) -> Result<Vec<IntervalWithCount>>
where
    F: FnMut(Timestamp, Timestamp, &[Slot<'_>]) -> IntervalWithCount,
{
    let inputs: SmallVec<[&[IntervalWithCount]; 4]> =
        partitions.iter().map(|p| (*p).unwrap_or(&[])).collect();
    for partition in &inputs {
        validate_partition(partition)?;
    }

    let mut boundaries: Vec<Timestamp> = Vec::with_capacity(
        2 + inputs.iter().map(|p| p.len() * 2).sum::<usize>(),
    );
    boundaries.push(window.start);
    boundaries.push(window.end);

    for partition in &inputs {
        let mut clipped = false;
        for interval in partition.iter() {
            match window.clip(interval.start, interval.end) {
                Some((lo, hi)) => {
                    clipped |= lo != interval.start || hi != interval.end;
                    boundaries.push(lo);
                    boundaries.push(hi);
                }
                None => clipped = true,
            }
        }
        if clipped {
            warn!(
                "partition extends outside window [{}, {}), clipped",
                window.start.to_rfc3339(),
                window.end.to_rfc3339()
            );
        }
    }

    boundaries.sort_unstable();
    boundaries.dedup();

    let mut cursors: SmallVec<[usize; 4]> = SmallVec::from_elem(0, inputs.len());
    let mut merged: Vec<IntervalWithCount> = Vec::new();

    for cut in boundaries.windows(2) {
        let (lo, hi) = (cut[0], cut[1]);

        let slots: Slots<'_> = inputs
            .iter()
            .zip(cursors.iter_mut())
            .map(|(partition, cursor)| {
                while *cursor < partition.len() && partition[*cursor].end <= lo {
                    *cursor += 1;
                }
                partition
                    .get(*cursor)
                    .filter(|interval| interval.start <= lo)
            })
            .collect();

        let mut result = combine(lo, hi, slots.as_slice());
        result.start = lo;
        result.end = hi;
        trace!("cut [{}, {}) -> {}", lo.to_rfc3339(), hi.to_rfc3339(), result);

        push_coalesced(&mut merged, result);
    }

    Ok(merged)
}

/// Merge whole per-subject results with a policy
///
/// Subjects are the union of all inputs' subjects, in first-seen order.
pub fn merge_person_intervals(
    window: &ObservationWindow,
    inputs: &[&PersonIntervals<IntervalWithCount>],
    policy: &CombinePolicy,
) -> Result<PersonIntervals<IntervalWithCount>> {
    policy.arity().check(inputs.len(), policy.name())?;

    let persons: IndexSet<PersonId> = inputs
        .iter()
        .flat_map(|data| data.keys().copied())
        .collect();

    debug!(
        "merging {} inputs for {} persons with {}",
        inputs.len(),
        persons.len(),
        policy.name()
    );

    let mut result = PersonIntervals::with_capacity(persons.len());
    for person_id in persons {
        let partitions: SmallVec<[Option<&[IntervalWithCount]>; 4]> = inputs
            .iter()
            .map(|data| data.get(&person_id).map(Vec::as_slice))
            .collect();

        let merged = merge_partitions(window, &partitions, |lo, hi, slots| {
            policy.apply(lo, hi, slots)
        })
        .map_err(|e: DigipodError| e.for_person(person_id))?;

        result.insert(person_id, merged);
    }

    Ok(result)
}

fn push_coalesced(merged: &mut Vec<IntervalWithCount>, next: IntervalWithCount) {
    if let Some(last) = merged.last_mut() {
        if last.end == next.start && last.same_value(&next) {
            last.end = next.end;
            return;
        }
    }
    merged.push(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use digipod_types::{IntervalType, parse_timestamp};

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    fn iv(start: &str, end: &str, t: IntervalType, count: Option<f64>) -> IntervalWithCount {
        IntervalWithCount::new(ts(start), ts(end), t, count).unwrap()
    }

    fn window() -> ObservationWindow {
        ObservationWindow::parse("2024-01-01T00:00:00Z", "2024-01-05T00:00:00Z").unwrap()
    }

    #[test]
    fn test_single_input_passthrough() {
        let a = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z", IntervalType::Positive, None),
            iv("2024-01-03T00:00:00Z", "2024-01-05T00:00:00Z", IntervalType::Negative, None),
        ];
        let merged = merge_partitions(&window(), &[Some(a.as_slice())], |_, _, slots| {
            slots[0].cloned().unwrap()
        })
        .unwrap();
        assert_eq!(merged, a);
    }

    #[test]
    fn test_breakpoints_are_union() {
        let a = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive, None),
            iv("2024-01-02T00:00:00Z", "2024-01-05T00:00:00Z", IntervalType::Negative, None),
        ];
        let b = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-04T00:00:00Z", IntervalType::NoData, None),
            iv("2024-01-04T00:00:00Z", "2024-01-05T00:00:00Z", IntervalType::Positive, None),
        ];

        let mut cuts = Vec::new();
        merge_partitions(&window(), &[Some(a.as_slice()), Some(b.as_slice())], |lo, hi, slots| {
            cuts.push((lo, hi));
            let t = slots[0].unwrap().interval_type & slots[1].unwrap().interval_type;
            IntervalWithCount { start: lo, end: hi, interval_type: t, count: Some(cuts.len() as f64) }
        })
        .unwrap();

        assert_eq!(
            cuts,
            vec![
                (ts("2024-01-01T00:00:00Z"), ts("2024-01-02T00:00:00Z")),
                (ts("2024-01-02T00:00:00Z"), ts("2024-01-04T00:00:00Z")),
                (ts("2024-01-04T00:00:00Z"), ts("2024-01-05T00:00:00Z")),
            ]
        );
    }

    #[test]
    fn test_gap_yields_absent_slot() {
        let a = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive, None),
            iv("2024-01-03T00:00:00Z", "2024-01-05T00:00:00Z", IntervalType::Positive, None),
        ];
        let mut absent = Vec::new();
        merge_partitions(&window(), &[Some(a.as_slice())], |lo, hi, slots| {
            if slots[0].is_none() {
                absent.push(lo);
            }
            IntervalWithCount { start: lo, end: hi, interval_type: IntervalType::Negative, count: None }
        })
        .unwrap();
        assert_eq!(absent, vec![ts("2024-01-02T00:00:00Z")]);
    }

    #[test]
    fn test_equal_neighbours_coalesce() {
        let a = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive, None),
            iv("2024-01-02T00:00:00Z", "2024-01-03T00:00:00Z", IntervalType::NoData, None),
            iv("2024-01-03T00:00:00Z", "2024-01-05T00:00:00Z", IntervalType::Positive, None),
        ];
        let merged = merge_partitions(&window(), &[Some(a.as_slice())], |lo, hi, _| IntervalWithCount {
            start: lo,
            end: hi,
            interval_type: IntervalType::Positive,
            count: Some(1.0),
        })
        .unwrap();
        assert_eq!(
            merged,
            vec![iv("2024-01-01T00:00:00Z", "2024-01-05T00:00:00Z", IntervalType::Positive, Some(1.0))]
        );
    }

    #[test]
    fn test_intervals_clipped_to_window() {
        let a = vec![
            iv("2023-12-30T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive, None),
            iv("2024-01-02T00:00:00Z", "2024-01-09T00:00:00Z", IntervalType::Negative, None),
        ];
        let merged = merge_partitions(&window(), &[Some(a.as_slice())], |_, _, slots| {
            slots[0].cloned().unwrap()
        })
        .unwrap();
        assert_eq!(merged[0].start, window().start);
        assert_eq!(merged[1].end, window().end);
    }

    #[test]
    fn test_missing_partition_is_absent_everywhere() {
        let merged = merge_partitions(&window(), &[None], |lo, hi, slots| {
            assert!(slots[0].is_none());
            IntervalWithCount { start: lo, end: hi, interval_type: IntervalType::Negative, count: Some(0.0) }
        })
        .unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start, window().start);
        assert_eq!(merged[0].end, window().end);
    }
}
