//! Logged assertion helpers.
//!
//! Each helper logs its inputs at debug level before asserting, so a failing
//! CI run shows the values without a rerun.

#![allow(dead_code)]

use std::fmt::Debug;

/// Assert equality with detailed logging.
#[track_caller]
pub fn assert_eq_logged<T: PartialEq + Debug>(context: &str, actual: T, expected: T) {
    tracing::debug!(
        context = context,
        expected = ?expected,
        actual = ?actual,
        "asserting equality"
    );

    if actual != expected {
        tracing::error!(
            context = context,
            expected = ?expected,
            actual = ?actual,
            "assertion failed: values not equal"
        );
    }

    assert_eq!(
        actual, expected,
        "{context}: expected {expected:?}, got {actual:?}"
    );
}

/// Assert that a value is true with logging.
#[track_caller]
pub fn assert_true_logged(context: &str, value: bool) {
    tracing::debug!(context = context, value = value, "asserting true");

    if !value {
        tracing::error!(context = context, "assertion failed: expected true");
    }

    assert!(value, "{context}: expected true, got false");
}

/// Assert that a result is `Ok` and return the value.
#[track_caller]
pub fn assert_ok_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> T {
    tracing::debug!(context = context, result = ?result, "asserting Ok");

    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(context = context, error = ?err, "assertion failed: expected Ok");
            panic!("{context}: expected Ok, got Err({err:?})");
        }
    }
}

/// Assert that a result is `Err` and return the error.
#[track_caller]
pub fn assert_err_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> E {
    tracing::debug!(context = context, result = ?result, "asserting Err");

    match result {
        Err(err) => err,
        Ok(value) => {
            tracing::error!(context = context, value = ?value, "assertion failed: expected Err");
            panic!("{context}: expected Err, got Ok({value:?})");
        }
    }
}

/// Assert two floats are within `epsilon` of each other.
#[track_caller]
pub fn assert_approx_eq_logged(context: &str, actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    tracing::debug!(
        context = context,
        actual = actual,
        expected = expected,
        diff = diff,
        epsilon = epsilon,
        "asserting approximate equality"
    );

    if diff > epsilon {
        tracing::error!(
            context = context,
            actual = actual,
            expected = expected,
            diff = diff,
            "assertion failed: values differ by more than epsilon"
        );
    }

    assert!(
        diff <= epsilon,
        "{context}: expected {expected} ± {epsilon}, got {actual} (diff {diff})"
    );
}
