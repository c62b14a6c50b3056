//! Check macros for case bodies
//!
//! A failed check returns `Err(CaseFailure::Assertion(..))` from the
//! enclosing case body; it never panics.

/// Fail the case unless `cond` holds
///
/// ```ignore
/// check!(response.success, "Expected a successful response.");
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return Err($crate::lifecycle::CaseFailure::Assertion(format!(
                "check failed: {}",
                stringify!($cond)
            )));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::lifecycle::CaseFailure::Assertion(format!($($arg)+)));
        }
    };
}

/// Fail the case unless `actual == expected`
#[macro_export]
macro_rules! check_eq {
    ($actual:expr, $expected:expr $(,)?) => {
        $crate::check_eq!($actual, $expected, "values differ")
    };
    ($actual:expr, $expected:expr, $($arg:tt)+) => {
        match (&$actual, &$expected) {
            (actual, expected) => {
                if !(*actual == *expected) {
                    return Err($crate::lifecycle::CaseFailure::Assertion(format!(
                        "{}\n  Expected: {:?}\n  But was:  {:?}",
                        format!($($arg)+),
                        expected,
                        actual
                    )));
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::lifecycle::{CaseFailure, CaseResult};

    fn status_is(actual: u16, expected: u16) -> CaseResult {
        check_eq!(actual, expected, "Expected HTTP {} for CreatePost", expected);
        Ok(())
    }

    fn non_empty(items: &[&str]) -> CaseResult {
        check!(!items.is_empty(), "Expected headings in 'Ways You Benefit' section.");
        Ok(())
    }

    #[test]
    fn test_check_eq_passes_and_fails() {
        assert!(status_is(201, 201).is_ok());
        match status_is(500, 201) {
            Err(CaseFailure::Assertion(msg)) => {
                assert!(msg.starts_with("Expected HTTP 201 for CreatePost"));
                assert!(msg.contains("But was:  500"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_check_message() {
        assert!(non_empty(&["a"]).is_ok());
        match non_empty(&[]) {
            Err(CaseFailure::Assertion(msg)) => {
                assert_eq!(msg, "Expected headings in 'Ways You Benefit' section.")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
