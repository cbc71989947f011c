//! # Reminders Feature
//!
//! Priority-scheduled reminders whose urgency rises as their due time approaches.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Time-decaying max-heap engine with injectable clock
//! - 1.0.0: Initial release with scheduled reminder delivery

pub mod heap;
pub mod item;
pub mod priority;
pub mod scheduler;

pub use heap::BinaryHeap;
pub use item::{Item, ItemId};
pub use priority::{clamp_level, effective_rank, time_multiplier, Prioritized, Rank};
pub use scheduler::{ReminderScheduler, ReminderView};
