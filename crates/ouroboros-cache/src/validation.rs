//! Local argument checks performed before any remote call

use crate::error::SdkError;
use crate::range::MAX_RANGE_WINDOW;
use crate::types::ByteLike;

fn validate_name(kind: &str, name: &str) -> Result<(), SdkError> {
    if name.trim().is_empty() {
        return Err(SdkError::invalid_argument(format!("{kind} name must not be empty")));
    }
    Ok(())
}

pub fn validate_cache_name(name: &str) -> Result<(), SdkError> {
    validate_name("Cache", name)
}

pub fn validate_store_name(name: &str) -> Result<(), SdkError> {
    validate_name("Store", name)
}

pub fn validate_index_name(name: &str) -> Result<(), SdkError> {
    validate_name("Index", name)
}

pub fn validate_leaderboard_name(name: &str) -> Result<(), SdkError> {
    validate_name("Leaderboard", name)
}

pub fn validate_webhook_name(name: &str) -> Result<(), SdkError> {
    validate_name("Webhook", name)
}

pub fn validate_topic_name(name: &str) -> Result<(), SdkError> {
    validate_name("Topic", name)
}

/// Collection names (list, dictionary, set, sorted set) and keys.
pub fn validate_collection_name(kind: &str, name: &ByteLike) -> Result<(), SdkError> {
    if name.is_blank() {
        return Err(SdkError::invalid_argument(format!("{kind} name must not be empty")));
    }
    Ok(())
}

pub fn validate_key(key: &ByteLike) -> Result<(), SdkError> {
    if key.is_empty() {
        return Err(SdkError::invalid_argument("key must not be empty"));
    }
    Ok(())
}

pub fn validate_keys(keys: &[ByteLike]) -> Result<(), SdkError> {
    keys.iter().try_for_each(validate_key)
}

pub fn validate_truncate_size(size: Option<u32>) -> Result<(), SdkError> {
    if size == Some(0) {
        return Err(SdkError::invalid_argument(
            "truncate size must be strictly positive (> 0)",
        ));
    }
    Ok(())
}

pub fn validate_sample_limit(limit: i32) -> Result<u32, SdkError> {
    if limit < 0 {
        return Err(SdkError::invalid_argument("limit must be non-negative (>= 0)"));
    }
    Ok(limit as u32)
}

pub fn validate_score(score: f64) -> Result<(), SdkError> {
    if score.is_nan() {
        return Err(SdkError::invalid_argument("score must not be NaN"));
    }
    Ok(())
}

/// Increment amounts must be finite so the stored score never becomes NaN.
pub fn validate_score_increment(amount: f64) -> Result<(), SdkError> {
    if !amount.is_finite() {
        return Err(SdkError::invalid_argument("increment amount must be finite"));
    }
    Ok(())
}

/// Leaderboard requests carry at most [`MAX_RANGE_WINDOW`] elements.
pub fn validate_leaderboard_batch(len: usize) -> Result<(), SdkError> {
    if len as i64 > MAX_RANGE_WINDOW {
        return Err(SdkError::invalid_argument(format!(
            "leaderboard requests are limited to {MAX_RANGE_WINDOW} elements"
        )));
    }
    Ok(())
}

pub fn validate_top_k(top_k: u32) -> Result<(), SdkError> {
    if top_k == 0 {
        return Err(SdkError::invalid_argument("topK must be greater than zero"));
    }
    Ok(())
}

pub fn validate_num_dimensions(num_dimensions: u32) -> Result<(), SdkError> {
    if num_dimensions == 0 {
        return Err(SdkError::invalid_argument(
            "numDimensions must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cache_name() {
        let err = validate_cache_name("  ").unwrap_err();
        assert_eq!(err.message(), "Cache name must not be empty");
        assert!(validate_cache_name("cache").is_ok());
    }

    #[test]
    fn test_score_increment_must_be_finite() {
        for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = validate_score_increment(amount).unwrap_err();
            assert_eq!(err.code(), crate::error::ErrorCode::InvalidArgument);
        }
        assert!(validate_score_increment(-2.5).is_ok());
    }

    #[test]
    fn test_collection_names() {
        assert!(validate_collection_name("List", &ByteLike::from("")).is_err());
        assert!(validate_collection_name("List", &ByteLike::from(b"l")).is_ok());
        let err = validate_collection_name("Sorted set", &ByteLike::from(" ")).unwrap_err();
        assert_eq!(err.message(), "Sorted set name must not be empty");
    }

    #[test]
    fn test_keys() {
        assert!(validate_key(&ByteLike::from("k")).is_ok());
        assert!(validate_key(&ByteLike::from(Vec::new())).is_err());
        assert!(validate_keys(&["a".into(), "".into()]).is_err());
    }

    #[test]
    fn test_limits() {
        assert!(validate_truncate_size(None).is_ok());
        assert!(validate_truncate_size(Some(0)).is_err());
        assert_eq!(validate_sample_limit(0).unwrap(), 0);
        assert!(validate_sample_limit(-1).is_err());
        assert!(validate_leaderboard_batch(8192).is_ok());
        assert!(validate_leaderboard_batch(8193).is_err());
        assert!(validate_top_k(0).is_err());
        assert!(validate_num_dimensions(0).is_err());
        assert!(validate_score(f64::NAN).is_err());
    }
}
