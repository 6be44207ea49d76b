//! Per-subject partitions

use crate::{Interval, IntervalWithCount, ObservationWindow, TimeRange};
use digipod_diagnostics::{DGP0201, DGP0202, DGP0203, DigipodError, Result};
use indexmap::IndexMap;

/// OMOP `person_id`
pub type PersonId = i64;

/// Mapping from subject to its partition, in first-seen order
pub type PersonIntervals<T = Interval> = IndexMap<PersonId, Vec<T>>;

/// Check that a partition is sorted, non-empty per interval and non-overlapping
///
/// Gaps are allowed here; the merge reports them as absent slots.
pub fn validate_partition<T: TimeRange>(intervals: &[T]) -> Result<()> {
    for interval in intervals {
        if interval.start() >= interval.end() {
            return Err(DigipodError::data(
                DGP0203,
                format!(
                    "interval [{}, {}) is empty",
                    interval.start().to_rfc3339(),
                    interval.end().to_rfc3339()
                ),
            ));
        }
    }

    for pair in intervals.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start() < prev.start() {
            return Err(DigipodError::data(
                DGP0201,
                format!(
                    "interval starting {} follows one starting {}",
                    next.start().to_rfc3339(),
                    prev.start().to_rfc3339()
                ),
            ));
        }
        if next.start() < prev.end() {
            return Err(DigipodError::data(
                DGP0202,
                format!(
                    "interval starting {} overlaps one ending {}",
                    next.start().to_rfc3339(),
                    prev.end().to_rfc3339()
                ),
            ));
        }
    }

    Ok(())
}

/// Whether `intervals` are disjoint and their union is exactly the window
pub fn covers_window<T: TimeRange>(window: &ObservationWindow, intervals: &[T]) -> bool {
    let Some(first) = intervals.first() else {
        return false;
    };
    if first.start() != window.start {
        return false;
    }
    let contiguous = intervals
        .windows(2)
        .all(|pair| pair[0].end() == pair[1].start() && pair[0].start() < pair[0].end());
    contiguous
        && intervals
            .last()
            .is_some_and(|last| last.start() < last.end() && last.end() == window.end)
}

/// Lift plain intervals into the counted form (`count = None`)
pub fn lift_counts(data: &PersonIntervals<Interval>) -> PersonIntervals<IntervalWithCount> {
    data.iter()
        .map(|(person_id, intervals)| {
            (*person_id, intervals.iter().map(Interval::uncounted).collect())
        })
        .collect()
}

/// Drop counts from counted intervals
pub fn strip_counts(data: &PersonIntervals<IntervalWithCount>) -> PersonIntervals<Interval> {
    data.iter()
        .map(|(person_id, intervals)| {
            (
                *person_id,
                intervals.iter().map(IntervalWithCount::to_interval).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntervalType, parse_timestamp};

    fn iv(start: &str, end: &str, t: IntervalType) -> Interval {
        Interval::new(
            parse_timestamp(start).unwrap(),
            parse_timestamp(end).unwrap(),
            t,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_accepts_gaps() {
        let partition = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive),
            iv("2024-01-03T00:00:00Z", "2024-01-04T00:00:00Z", IntervalType::Negative),
        ];
        assert!(validate_partition(&partition).is_ok());
    }

    #[test]
    fn test_validate_rejects_unsorted() {
        let partition = vec![
            iv("2024-01-03T00:00:00Z", "2024-01-04T00:00:00Z", IntervalType::Negative),
            iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive),
        ];
        let err = validate_partition(&partition).unwrap_err();
        assert_eq!(err.code(), DGP0201);
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let partition = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-02T12:00:00Z", IntervalType::Positive),
            iv("2024-01-02T00:00:00Z", "2024-01-04T00:00:00Z", IntervalType::Negative),
        ];
        let err = validate_partition(&partition).unwrap_err().for_person(9);
        assert_eq!(err.code(), DGP0202);
        assert!(err.to_diagnostic().message.contains("person 9"));
    }

    #[test]
    fn test_covers_window() {
        let window = ObservationWindow::parse("2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z").unwrap();
        let full = vec![
            iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::Positive),
            iv("2024-01-02T00:00:00Z", "2024-01-03T00:00:00Z", IntervalType::Negative),
        ];
        assert!(covers_window(&window, &full));
        assert!(!covers_window(&window, &full[..1]));
        assert!(!covers_window::<Interval>(&window, &[]));
    }

    #[test]
    fn test_lift_and_strip() {
        let mut data = PersonIntervals::new();
        data.insert(
            3,
            vec![iv("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", IntervalType::NoData)],
        );
        let lifted = lift_counts(&data);
        assert_eq!(lifted[&3][0].count, None);
        assert_eq!(strip_counts(&lifted), data);
    }
}
