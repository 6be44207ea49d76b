//! Counting combinators
//!
//! Implements: weighted two-way combine (screening + optimization),
//! priority-max combine (MaxCountOr), equal-weighted N-way mean (bundles),
//! pass/fail indicator

use super::{slot_count, slot_type};
use crate::merge::Slot;
use digipod_types::{IntervalType, IntervalWithCount, Timestamp};

/// Weighted two-way combine over `[primary, secondary]`
///
/// A NOT_APPLICABLE secondary takes no part: the primary is passed through
/// with its own type and count. Otherwise the type is `primary & secondary`
/// and the count is the mean of the two pass/fail signals.
pub fn combine_weighted_pair(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    let primary = slots.first().copied().flatten();
    let secondary = slots.get(1).copied().flatten();

    if slot_type(secondary) == IntervalType::NotApplicable {
        return match primary {
            Some(primary) => IntervalWithCount {
                start,
                end,
                interval_type: primary.interval_type,
                count: primary.count,
            },
            None => IntervalWithCount {
                start,
                end,
                interval_type: IntervalType::Negative,
                count: Some(0.0),
            },
        };
    }

    let primary_type = slot_type(primary);
    let secondary_type = slot_type(secondary);

    IntervalWithCount {
        start,
        end,
        interval_type: primary_type & secondary_type,
        count: Some((passed(primary_type) + passed(secondary_type)) / 2.0),
    }
}

/// Priority-max combine over alternative satisfaction paths
///
/// Picks the highest-priority type among the candidates
/// (POSITIVE > NO_DATA > NEGATIVE > NOT_APPLICABLE) and the largest count
/// among candidates of that type. A POSITIVE with count 0.3 beats a NO_DATA
/// with count 0.9.
pub fn combine_max_count_or(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    let mut result_type: Option<IntervalType> = None;
    let mut result_count = 0.0_f64;

    for slot in slots {
        let candidate_type = slot_type(*slot);

        if promotes(candidate_type, result_type) {
            result_type = Some(candidate_type);
            result_count = 0.0;
        }
        if result_type == Some(candidate_type) {
            result_count = result_count.max(slot_count(*slot));
        }
    }

    IntervalWithCount {
        start,
        end,
        interval_type: result_type.unwrap_or(IntervalType::Negative),
        count: Some(result_count),
    }
}

/// Equal-weighted mean over N components
///
/// The count is the arithmetic mean of the component counts (absent = 0) and
/// the type is the meet of all component types (absent = NEGATIVE).
pub fn combine_equal_weight_mean(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    if slots.is_empty() {
        return IntervalWithCount {
            start,
            end,
            interval_type: IntervalType::Negative,
            count: Some(0.0),
        };
    }

    let total: f64 = slots.iter().map(|slot| slot_count(*slot)).sum();
    let interval_type = slots
        .iter()
        .map(|slot| slot_type(*slot))
        .reduce(|acc, t| acc & t)
        .unwrap_or(IntervalType::Negative);

    IntervalWithCount {
        start,
        end,
        interval_type,
        count: Some(total / slots.len() as f64),
    }
}

/// Count a single operand as 1 where it is POSITIVE and 0 elsewhere
///
/// The type passes through unchanged; an absent operand is NEGATIVE.
pub fn combine_indicator(start: Timestamp, end: Timestamp, slots: &[Slot<'_>]) -> IntervalWithCount {
    let interval_type = slot_type(slots.first().copied().flatten());
    IntervalWithCount {
        start,
        end,
        interval_type,
        count: Some(passed(interval_type)),
    }
}

fn passed(t: IntervalType) -> f64 {
    if t == IntervalType::Positive { 1.0 } else { 0.0 }
}

/// Whether `candidate` replaces the running result type
fn promotes(candidate: IntervalType, current: Option<IntervalType>) -> bool {
    use IntervalType::*;

    match candidate {
        Positive => current != Some(Positive),
        NoData => !matches!(current, Some(Positive) | Some(NoData)),
        Negative => matches!(current, None | Some(NotApplicable)),
        NotApplicable => current.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digipod_types::parse_timestamp;
    use IntervalType::*;

    fn ts(s: &str) -> Timestamp {
        parse_timestamp(s).unwrap()
    }

    fn cut() -> (Timestamp, Timestamp) {
        (ts("2024-01-01T00:00:00Z"), ts("2024-01-02T00:00:00Z"))
    }

    fn slot(t: IntervalType, count: Option<f64>) -> IntervalWithCount {
        let (start, end) = cut();
        IntervalWithCount { start, end, interval_type: t, count }
    }

    #[test]
    fn test_weighted_pair_both_positive() {
        let (s, e) = cut();
        let (a, b) = (slot(Positive, None), slot(Positive, None));
        let r = combine_weighted_pair(s, e, &[Some(&a), Some(&b)]);
        assert_eq!(r.interval_type, Positive);
        assert_eq!(r.count, Some(1.0));
    }

    #[test]
    fn test_weighted_pair_half() {
        let (s, e) = cut();
        let (a, b) = (slot(Positive, None), slot(Negative, None));
        let r = combine_weighted_pair(s, e, &[Some(&a), Some(&b)]);
        assert_eq!(r.interval_type, Negative);
        assert_eq!(r.count, Some(0.5));
    }

    #[test]
    fn test_weighted_pair_secondary_not_applicable_passes_primary() {
        let (s, e) = cut();
        let (a, b) = (slot(NoData, Some(0.25)), slot(NotApplicable, Some(1.0)));
        let r = combine_weighted_pair(s, e, &[Some(&a), Some(&b)]);
        assert_eq!(r.interval_type, NoData);
        assert_eq!(r.count, Some(0.25));
    }

    #[test]
    fn test_weighted_pair_absent_secondary_is_negative() {
        let (s, e) = cut();
        let a = slot(Positive, None);
        let r = combine_weighted_pair(s, e, &[Some(&a), None]);
        assert_eq!(r.interval_type, Negative);
        assert_eq!(r.count, Some(0.5));
    }

    #[test]
    fn test_max_count_or_positive_beats_no_data() {
        let (s, e) = cut();
        let (a, b) = (slot(Positive, Some(0.3)), slot(NoData, Some(0.9)));
        for slots in [[Some(&a), Some(&b)], [Some(&b), Some(&a)]] {
            let r = combine_max_count_or(s, e, &slots);
            assert_eq!(r.interval_type, Positive);
            assert_eq!(r.count, Some(0.3));
        }
    }

    #[test]
    fn test_max_count_or_max_within_type() {
        let (s, e) = cut();
        let (a, b, c) = (slot(Positive, Some(0.5)), slot(Positive, Some(0.75)), slot(Negative, Some(1.0)));
        let r = combine_max_count_or(s, e, &[Some(&a), Some(&c), Some(&b)]);
        assert_eq!(r.interval_type, Positive);
        assert_eq!(r.count, Some(0.75));
    }

    #[test]
    fn test_max_count_or_absent_is_negative_zero() {
        let (s, e) = cut();
        let a = slot(NotApplicable, Some(0.4));
        let r = combine_max_count_or(s, e, &[Some(&a), None]);
        assert_eq!(r.interval_type, Negative);
        assert_eq!(r.count, Some(0.0));
    }

    #[test]
    fn test_max_count_or_only_not_applicable() {
        let (s, e) = cut();
        let a = slot(NotApplicable, None);
        let r = combine_max_count_or(s, e, &[Some(&a)]);
        assert_eq!(r.interval_type, NotApplicable);
        assert_eq!(r.count, Some(0.0));
    }

    #[test]
    fn test_equal_weight_mean() {
        let (s, e) = cut();
        let (a, b, c) = (slot(Positive, Some(1.0)), slot(Positive, Some(0.5)), slot(Positive, Some(0.5)));
        let r = combine_equal_weight_mean(s, e, &[Some(&a), Some(&b), Some(&c), None]);
        assert_eq!(r.count, Some(0.5));
        assert_eq!(r.interval_type, Negative);
    }

    #[test]
    fn test_indicator() {
        let (s, e) = cut();
        let (p, n) = (slot(Positive, None), slot(NoData, Some(0.5)));
        assert_eq!(combine_indicator(s, e, &[Some(&p)]).count, Some(1.0));
        let r = combine_indicator(s, e, &[Some(&n)]);
        assert_eq!((r.interval_type, r.count), (NoData, Some(0.0)));
        assert_eq!(combine_indicator(s, e, &[None]).interval_type, Negative);
    }

    #[test]
    fn test_equal_weight_mean_not_applicable_is_neutral_for_type() {
        let (s, e) = cut();
        let (a, b) = (slot(Positive, Some(1.0)), slot(NotApplicable, None));
        let r = combine_equal_weight_mean(s, e, &[Some(&a), Some(&b)]);
        assert_eq!(r.interval_type, Positive);
        assert_eq!(r.count, Some(0.5));
    }
}
