//! # Core Module
//!
//! Shared configuration, error types, and clock sources for the reminder engine.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod clock;
pub mod config;
pub mod error;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, SchedulerConfig};
pub use error::{ReminderError, ReminderResult};
