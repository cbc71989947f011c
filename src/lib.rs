// Core layer - shared config, errors and clocks
pub mod core;

// Features layer - reminder scheduling engine
pub mod features;

// Re-export core items
pub use crate::core::{
    Clock, Config, ManualClock, ReminderError, ReminderResult, SchedulerConfig, SystemClock,
};

// Re-export feature items
pub use crate::features::{
    BinaryHeap, Item, ItemId, Prioritized, Rank, ReminderScheduler, ReminderView,
};
