//! Splitting positional tokens between positional actions.
//!
//! This only answers "how many tokens does each positional get". Converting
//! the tokens happens later, in the matcher.

use crate::ArityMode;

/// Distributes `available` tokens over `arities`, in declaration order.
///
/// Every positional is greedy up to its maximum, but leaves behind enough
/// tokens to cover the minimums of the positionals after it. Returns the
/// per-positional counts, or the index of the first positional whose minimum
/// can't be met. Counts may sum to less than `available`; the rest is left
/// unclaimed.
pub fn partition_positionals(arities: &[ArityMode], available: usize) -> Result<Vec<usize>, usize> {
    let mut reserved = vec![0; arities.len() + 1];
    for (i, arity) in arities.iter().enumerate().rev() {
        reserved[i] = reserved[i + 1] + arity.min();
    }

    let mut remaining = available;
    let mut counts = Vec::with_capacity(arities.len());
    for (i, arity) in arities.iter().enumerate() {
        let min = arity.min();
        if remaining < min {
            return Err(i);
        }
        let spare = remaining.saturating_sub(reserved[i + 1]);
        let count = match arity.max() {
            Some(max) => spare.clamp(min, max),
            None => spare.max(min),
        };
        remaining -= count;
        counts.push(count);
    }
    log::trace!("partitioned {available} positional tokens as {counts:?}");
    Ok(counts)
}
