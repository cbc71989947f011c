//! Reminder scheduler
//!
//! Sole owner and writer of the reminder heap. Callers schedule payloads,
//! acknowledge the most urgent one, and list what is coming due.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use super::heap::BinaryHeap;
use super::item::{Item, ItemId};
use super::priority::Prioritized;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::SchedulerConfig;
use crate::core::error::ReminderResult;

/// One dashboard row: a reminder's state as of a single instant
#[derive(Debug, Serialize)]
pub struct ReminderView<'a, P> {
    pub id: ItemId,
    pub due_at: DateTime<Utc>,
    pub base_level: u8,
    /// Numeric rank; consumed items show the `u32::MAX` sentinel
    pub rank: u32,
    pub minutes_until_due: i64,
    pub overdue: bool,
    pub consumed: bool,
    pub payload: &'a P,
}

pub struct ReminderScheduler<P, C = SystemClock> {
    heap: BinaryHeap<Item<P>, C>,
    due_soon_minutes: i64,
}

impl<P, C: Clock> ReminderScheduler<P, C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(&SchedulerConfig::default(), clock)
    }

    pub fn with_config(config: &SchedulerConfig, clock: C) -> Self {
        Self {
            heap: BinaryHeap::from_config(config, clock),
            due_soon_minutes: config.due_soon_minutes,
        }
    }

    /// Queue a payload. `base_level` is clamped into `[1, 5]`.
    pub fn schedule(
        &mut self,
        payload: P,
        due_at: DateTime<Utc>,
        base_level: i64,
    ) -> ReminderResult<ItemId> {
        let item = Item::new(payload, due_at, base_level);
        let id = item.id();
        let level = item.base_level();

        self.heap.insert(item)?;

        info!(
            "Scheduled reminder {} due {} at level {} ({} pending)",
            id,
            due_at.format("%Y-%m-%d %H:%M:%S"),
            level,
            self.heap.len()
        );
        Ok(id)
    }

    /// Remove the most urgent reminder and hand its payload back
    pub fn acknowledge_highest(&mut self) -> Option<P> {
        let mut item = self.heap.extract_max()?;
        item.mark_consumed();
        info!(
            "Acknowledged reminder {} ({} pending)",
            item.id(),
            self.heap.len()
        );
        Some(item.into_payload())
    }

    /// Mark one reminder consumed in place. It stays queued below every
    /// active reminder until purged or extracted.
    ///
    /// Returns `false` if the id is unknown or was already acknowledged.
    pub fn acknowledge(&mut self, id: ItemId) -> bool {
        let flipped = self
            .heap
            .update_where(|item| item.id() == id, Item::mark_consumed)
            .unwrap_or(false);
        if flipped {
            info!("Acknowledged reminder {id}");
        }
        flipped
    }

    /// Drop a reminder outright and return its payload
    pub fn cancel(&mut self, id: ItemId) -> Option<P> {
        let item = self.heap.remove_where(|item| item.id() == id)?;
        info!("Cancelled reminder {} ({} pending)", id, self.heap.len());
        Some(item.into_payload())
    }

    pub fn reschedule(&mut self, id: ItemId, due_at: DateTime<Utc>) -> bool {
        let found = self
            .heap
            .update_where(|item| item.id() == id, |item| item.reschedule(due_at))
            .is_some();
        if found {
            info!(
                "Rescheduled reminder {} to {}",
                id,
                due_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        found
    }

    /// Change a reminder's base level (clamped)
    pub fn set_base_level(&mut self, id: ItemId, level: i64) -> bool {
        let found = self
            .heap
            .update_where(|item| item.id() == id, |item| item.set_base_level(level))
            .is_some();
        if found {
            info!("Re-levelled reminder {id} to {level}");
        }
        found
    }

    /// Remove every consumed reminder. Returns how many were dropped.
    pub fn purge_consumed(&mut self) -> usize {
        let purged = self.heap.retain(|item| !item.is_consumed());
        if purged > 0 {
            debug!("Purged {purged} consumed reminders");
        }
        purged
    }

    /// Payloads due within `window_minutes` (overdue included), most urgent first.
    /// Consumed reminders are skipped.
    pub fn due_within(&self, window_minutes: i64) -> Vec<&P> {
        let now = self.heap.clock().now();
        self.heap
            .snapshot_sorted_at(now)
            .into_iter()
            .filter(|item| !item.is_consumed() && item.minutes_until_due(now) <= window_minutes)
            .map(Item::payload)
            .collect()
    }

    /// `due_within` using the configured window
    pub fn due_soon(&self) -> Vec<&P> {
        self.due_within(self.due_soon_minutes)
    }

    /// Every reminder, most urgent first
    pub fn snapshot(&self) -> Vec<&Item<P>> {
        self.heap.snapshot_sorted()
    }

    /// Dashboard rows, most urgent first
    pub fn listing(&self) -> Vec<ReminderView<'_, P>> {
        let now = self.heap.clock().now();
        self.heap
            .snapshot_sorted_at(now)
            .into_iter()
            .map(|item| {
                let rank = item.effective_rank(now);
                ReminderView {
                    id: item.id(),
                    due_at: item.due_at(),
                    base_level: item.base_level(),
                    rank: rank.value(),
                    minutes_until_due: item.minutes_until_due(now),
                    overdue: item.is_overdue(now),
                    consumed: rank.is_consumed(),
                    payload: item.payload(),
                }
            })
            .collect()
    }

    /// Current heap root; may be stale if time moved since the last mutation
    pub fn peek(&self) -> Option<&Item<P>> {
        self.heap.peek()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item<P>> {
        self.heap.find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn overdue_count(&self) -> usize {
        let now = self.heap.clock().now();
        self.heap.iter().filter(|item| item.is_overdue(now)).count()
    }

    /// Re-sort the heap against the current instant
    pub fn refresh(&mut self) {
        self.heap.refresh();
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn clock(&self) -> &C {
        self.heap.clock()
    }
}
