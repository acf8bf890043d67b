//! Range queries over ordered collections
//!
//! Rank and index ranges are half-open `[start, end)` with negative indexes
//! counted from the end of the collection, like Python slices. Score ranges
//! are inclusive.

use crate::error::SdkError;

/// Maximum number of elements a single ranked read or leaderboard request may
/// cover.
pub const MAX_RANGE_WINDOW: i64 = 8192;

/// Normalize a half-open range against a collection of `size` elements.
///
/// Returns `(start, end)` with `start <= end <= size`; an inverted range
/// resolves to an empty one.
pub fn resolve_range(size: usize, start: Option<i32>, end: Option<i32>) -> (usize, usize) {
    let clamp = |index: i32| -> usize {
        if index < 0 {
            size.saturating_sub(index.unsigned_abs() as usize)
        } else {
            (index as usize).min(size)
        }
    };
    let start = start.map_or(0, clamp);
    let end = end.map_or(size, clamp);
    (start, end.max(start))
}

/// Both bounds are comparable without knowing the collection size.
fn same_sign(start: i32, end: i32) -> bool {
    (start >= 0 && end >= 0) || (start < 0 && end < 0)
}

/// List slice bounds: when both are given and comparable, `start < end`.
pub fn validate_list_slice(start: Option<i32>, end: Option<i32>) -> Result<(), SdkError> {
    if let (Some(start), Some(end)) = (start, end) {
        if same_sign(start, end) && start >= end {
            return Err(SdkError::invalid_argument(
                "endIndex (exclusive) must be larger than startIndex (inclusive)",
            ));
        }
    }
    Ok(())
}

/// Sorted-set rank bounds: when comparable, non-empty and at most
/// [`MAX_RANGE_WINDOW`] wide.
pub fn validate_rank_range(start: Option<i32>, end: Option<i32>) -> Result<(), SdkError> {
    if let (Some(start), Some(end)) = (start, end) {
        if same_sign(start, end) {
            if start >= end {
                return Err(SdkError::invalid_argument(
                    "start rank must be less than end rank",
                ));
            }
            if i64::from(end) - i64::from(start) > MAX_RANGE_WINDOW {
                return Err(SdkError::invalid_argument(format!(
                    "end rank - start rank must be less than or equal to {MAX_RANGE_WINDOW}"
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_score_range(min_score: Option<f64>, max_score: Option<f64>) -> Result<(), SdkError> {
    for score in [min_score, max_score].into_iter().flatten() {
        if score.is_nan() {
            return Err(SdkError::invalid_argument("score must not be NaN"));
        }
    }
    if let (Some(min), Some(max)) = (min_score, max_score) {
        if min > max {
            return Err(SdkError::invalid_argument(
                "minScore must be less than or equal to maxScore",
            ));
        }
    }
    Ok(())
}

pub fn validate_offset(offset: Option<i32>) -> Result<Option<u32>, SdkError> {
    match offset {
        Some(n) if n < 0 => Err(SdkError::invalid_argument("offset must be non-negative (>= 0)")),
        other => Ok(other.map(|n| n as u32)),
    }
}

pub fn validate_count(count: Option<i32>) -> Result<Option<u32>, SdkError> {
    match count {
        Some(n) if n <= 0 => Err(SdkError::invalid_argument("count must be strictly positive (> 0)")),
        other => Ok(other.map(|n| n as u32)),
    }
}

/// Inclusive score filter; absent bounds are unbounded.
pub fn score_in_range(score: f64, min_score: Option<f64>, max_score: Option<f64>) -> bool {
    min_score.map_or(true, |min| score >= min) && max_score.map_or(true, |max| score <= max)
}
