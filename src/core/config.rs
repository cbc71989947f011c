//! # Configuration
//!
//! Environment-driven application config plus the YAML-loadable scheduler section.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Starting slot count of a fresh reminder heap
pub const DEFAULT_INITIAL_CAPACITY: usize = 25;
/// Absolute ceiling; growth past this fails with `CapacityExceeded`
pub const DEFAULT_MAX_CAPACITY: usize = 10_000;
/// Window used by `due_soon` (4 hours, the widest non-trivial time bucket)
pub const DEFAULT_DUE_SOON_MINUTES: i64 = 240;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub scheduler: SchedulerConfig,
    /// Optional YAML file overriding the scheduler section
    pub scheduler_config_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so parsing can be tested without
    /// touching the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let initial_capacity =
            parse_var(&lookup, "REMINDER_INITIAL_CAPACITY", DEFAULT_INITIAL_CAPACITY)?;
        let max_capacity = parse_var(&lookup, "REMINDER_MAX_CAPACITY", DEFAULT_MAX_CAPACITY)?;
        let due_soon_minutes =
            parse_var(&lookup, "REMINDER_DUE_SOON_MINUTES", DEFAULT_DUE_SOON_MINUTES)?;

        let scheduler = SchedulerConfig {
            initial_capacity,
            max_capacity,
            due_soon_minutes,
        };
        scheduler.validate()?;

        let scheduler_config_path = lookup("REMINDERS_CONFIG_PATH")
            .unwrap_or_else(|| "reminders.yaml".to_string());

        Ok(Config {
            log_level,
            scheduler,
            scheduler_config_path,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}

/// Sizing and listing parameters for a `ReminderScheduler`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,

    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,

    /// Default look-ahead for `due_soon`, in minutes
    #[serde(default = "default_due_soon_minutes")]
    pub due_soon_minutes: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
            due_soon_minutes: DEFAULT_DUE_SOON_MINUTES,
        }
    }
}

impl SchedulerConfig {
    /// Load scheduler configuration from a YAML file
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SchedulerConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(anyhow::anyhow!("initial_capacity must be at least 1"));
        }

        if self.initial_capacity > self.max_capacity {
            return Err(anyhow::anyhow!(
                "initial_capacity ({}) exceeds max_capacity ({})",
                self.initial_capacity,
                self.max_capacity
            ));
        }

        if self.due_soon_minutes < 0 {
            return Err(anyhow::anyhow!(
                "due_soon_minutes must not be negative: {}",
                self.due_soon_minutes
            ));
        }

        Ok(())
    }
}

// Default value functions
fn default_initial_capacity() -> usize {
    DEFAULT_INITIAL_CAPACITY
}

fn default_max_capacity() -> usize {
    DEFAULT_MAX_CAPACITY
}

fn default_due_soon_minutes() -> i64 {
    DEFAULT_DUE_SOON_MINUTES
}
