//! Retry accounting
//!
//! Pure decision logic: given how many attempts a record has consumed and
//! the configured limit, is another attempt allowed or is the failure
//! terminal? Stateless; the batch processor owns all side effects.

/// Verdict for a failed processing attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The record may be claimed again
    Retry,
    /// Retries are exhausted; the record is permanently failed
    Terminal,
}

/// Stateless retry decision function
pub struct RetryAccountant;

impl RetryAccountant {
    /// Decide whether a failed attempt is retryable.
    ///
    /// `attempts` counts attempts already started, including the one that
    /// just failed. A record is retryable while `attempts <= retry_limit`,
    /// so it consumes at most `retry_limit + 1` attempts before going
    /// terminal.
    pub fn decide(attempts: u32, retry_limit: u32) -> RetryDecision {
        if attempts <= retry_limit {
            RetryDecision::Retry
        } else {
            RetryDecision::Terminal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_retry_while_within_limit() {
        assert_eq!(RetryAccountant::decide(1, 3), RetryDecision::Retry);
        assert_eq!(RetryAccountant::decide(2, 3), RetryDecision::Retry);
        assert_eq!(RetryAccountant::decide(3, 3), RetryDecision::Retry);
    }

    #[test]
    fn test_terminal_once_limit_exceeded() {
        assert_eq!(RetryAccountant::decide(4, 3), RetryDecision::Terminal);
        assert_eq!(RetryAccountant::decide(100, 3), RetryDecision::Terminal);
    }

    #[test]
    fn test_zero_retry_limit_is_terminal_after_first_failure() {
        assert_eq!(RetryAccountant::decide(0, 0), RetryDecision::Retry);
        assert_eq!(RetryAccountant::decide(1, 0), RetryDecision::Terminal);
    }
}
