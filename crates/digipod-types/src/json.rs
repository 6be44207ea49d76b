//! Reading per-subject partitions from JSON
//!
//! The document is an object keyed by person id, each value an array of
//! `{ "start": ..., "end": ..., "type": ... }` objects. A `null` element is an
//! explicit absent placeholder and leaves a gap; any other non-object element
//! is rejected.

use crate::{Interval, PersonId, PersonIntervals, validate_partition};
use digipod_diagnostics::{DGP0002, DGP0204, DigipodError, Result};
use serde_json::Value;

/// Parse a JSON string into validated partitions
pub fn person_intervals_from_str(content: &str) -> Result<PersonIntervals<Interval>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| DigipodError::input(DGP0002, format!("invalid JSON: {}", e)))?;
    parse_person_intervals(&value)
}

/// Convert a JSON value into validated partitions
pub fn parse_person_intervals(value: &Value) -> Result<PersonIntervals<Interval>> {
    let Value::Object(persons) = value else {
        return Err(DigipodError::input(
            DGP0002,
            format!("expected an object keyed by person id, found {}", kind(value)),
        ));
    };

    let mut result = PersonIntervals::with_capacity(persons.len());
    for (key, partition) in persons {
        let person_id: PersonId = key.trim().parse().map_err(|_| {
            DigipodError::input(DGP0002, format!("person id '{}' is not an integer", key))
        })?;

        let Value::Array(elements) = partition else {
            return Err(DigipodError::data(
                DGP0204,
                format!("expected an array of intervals, found {}", kind(partition)),
            )
            .for_person(person_id));
        };

        let mut intervals = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                Value::Null => continue,
                Value::Object(_) => {
                    let interval: Interval = serde_json::from_value(element.clone()).map_err(|e| {
                        DigipodError::input(DGP0002, format!("person {}: {}", person_id, e))
                    })?;
                    intervals.push(interval);
                }
                other => {
                    return Err(DigipodError::data(
                        DGP0204,
                        format!("expected an interval object or null, found {}", kind(other)),
                    )
                    .for_person(person_id));
                }
            }
        }

        validate_partition(&intervals).map_err(|e| e.for_person(person_id))?;
        result.insert(person_id, intervals);
    }

    Ok(result)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
