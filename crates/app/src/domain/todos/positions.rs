//! Position keys for ordered todo lists.
//!
//! A user's list is sorted by a decimal key. Moving an item computes a fresh
//! key strictly between its new neighbours, so a move rewrites exactly one
//! row. Keys carry at most [`MAX_SCALE`] fractional digits; once two
//! neighbours are adjacent at that precision the caller renumbers the list
//! with [`renumbered`] and tries again.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Distance between consecutive keys for appends and renumbering.
pub const STEP: i64 = 1024;

/// Key given to the first item of an empty list.
pub const FIRST: i64 = STEP;

/// Maximum number of fractional digits a key may carry.
pub const MAX_SCALE: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The lower neighbour does not sort before the upper one.
    #[error("neighbour keys are out of order")]
    OutOfOrder,

    /// No key fits between the neighbours at the supported precision.
    #[error("no room left between neighbour keys")]
    Exhausted,
}

/// Key for an item placed after `last`, or the first key of an empty list.
///
/// # Errors
///
/// Returns [`PositionError::Exhausted`] if the key would overflow.
pub fn append(last: Option<Decimal>) -> Result<Decimal, PositionError> {
    between(last, None)
}

/// Compute a key strictly between `prev` and `next`.
///
/// `None` stands for the start (`prev`) or end (`next`) of the list. Keys at
/// the ends of the list are whole multiples away from their neighbour;
/// interior keys are the shortest decimal inside the gap.
///
/// # Errors
///
/// Returns [`PositionError::OutOfOrder`] when `prev >= next` and
/// [`PositionError::Exhausted`] when no key with at most [`MAX_SCALE`]
/// fractional digits fits.
pub fn between(prev: Option<Decimal>, next: Option<Decimal>) -> Result<Decimal, PositionError> {
    let step = Decimal::from(STEP);

    match (prev, next) {
        (None, None) => Ok(Decimal::from(FIRST)),
        (Some(prev), None) => prev
            .floor()
            .checked_add(step)
            .ok_or(PositionError::Exhausted),
        (None, Some(next)) => next
            .ceil()
            .checked_sub(step)
            .ok_or(PositionError::Exhausted),
        (Some(prev), Some(next)) => midpoint(prev, next),
    }
}

fn midpoint(prev: Decimal, next: Decimal) -> Result<Decimal, PositionError> {
    if prev >= next {
        return Err(PositionError::OutOfOrder);
    }

    let mid = prev
        .checked_add(next)
        .and_then(|sum| sum.checked_div(Decimal::TWO))
        .ok_or(PositionError::Exhausted)?;

    (0..=MAX_SCALE)
        .map(|scale| mid.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven))
        .find(|candidate| prev < *candidate && *candidate < next)
        .map(|candidate| candidate.normalize())
        .ok_or(PositionError::Exhausted)
}

/// Fresh evenly spaced keys for a list of `len` items, in list order.
pub fn renumbered(len: usize) -> impl Iterator<Item = Decimal> {
    (1..=len).map(|rank| Decimal::from(rank) * Decimal::from(STEP))
}
