//! Error types for the reminder engine
//!
//! Only structural failures are errors. An empty queue is reported as `None`
//! and out-of-range base levels are clamped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    /// The heap would have to grow past its configured ceiling. Not transient.
    #[error("reminder queue is full: capacity is capped at {max_capacity} entries")]
    CapacityExceeded { max_capacity: usize },
}

pub type ReminderResult<T> = std::result::Result<T, ReminderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_message() {
        let err = ReminderError::CapacityExceeded {
            max_capacity: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "reminder queue is full: capacity is capped at 10000 entries"
        );
    }
}
