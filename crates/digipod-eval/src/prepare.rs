//! Reordering predecessor data into a policy's operand order
//!
//! Combinator inputs arrive in the order the node's operands were declared.
//! Policies such as the weighted pair care which input is which, so the data
//! is permuted into the policy's canonical key order before merging.

use crate::expression::OperandKey;
use digipod_diagnostics::{DGP0101, DGP0102, DGP0103, DigipodError, Result};

/// Permute `data` from `declared` key order into `canonical` key order
///
/// `data[i]` belongs to `declared[i]`. Elements are moved, not copied.
pub fn prepare_data<T>(
    declared: &[OperandKey],
    data: Vec<T>,
    canonical: &[OperandKey],
) -> Result<Vec<T>> {
    if data.len() != declared.len() {
        return Err(DigipodError::wiring(
            DGP0101,
            format!(
                "received {} inputs for {} declared operands",
                data.len(),
                declared.len()
            ),
        ));
    }
    if canonical.len() != declared.len() {
        return Err(DigipodError::wiring(
            DGP0101,
            format!(
                "{} declared operands, expected {} ({})",
                declared.len(),
                canonical.len(),
                join_keys(canonical)
            ),
        ));
    }

    for (i, key) in declared.iter().enumerate() {
        if declared[..i].contains(key) {
            return Err(DigipodError::wiring(
                DGP0103,
                format!("operand '{}' declared more than once", key),
            ));
        }
    }

    let mut slots: Vec<Option<T>> = data.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());

    for key in canonical {
        let position = declared.iter().position(|k| k == key).ok_or_else(|| {
            DigipodError::wiring(
                DGP0102,
                format!("expected operand '{}' is not declared", key),
            )
            .with_context(format!("declared operands: {}", join_keys(declared)))
        })?;
        let value = slots[position].take().ok_or_else(|| {
            DigipodError::wiring(
                DGP0103,
                format!("operand '{}' requested more than once", key),
            )
        })?;
        ordered.push(value);
    }

    Ok(ordered)
}

fn join_keys(keys: &[OperandKey]) -> String {
    keys.iter().map(OperandKey::as_str).collect::<Vec<_>>().join(", ")
}
