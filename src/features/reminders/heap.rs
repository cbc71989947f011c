//! # Reminder Heap
//!
//! Array-backed binary max-heap ordered by a time-dependent rank.
//!
//! Ranks are recomputed from the clock on every comparison and never stored
//! in the slots. The parent-outranks-child invariant therefore holds at the
//! instant an insert or extract finishes its sift; as time passes the array
//! can go logically stale without being touched. `snapshot_sorted` and
//! `refresh` rebuild against the current instant when a fresh total order is
//! needed.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: In-place update, arbitrary removal, retain and refresh
//! - 1.0.0: Initial release with insert, extract, peek and sorted snapshot

use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::priority::Prioritized;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::{SchedulerConfig, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY};
use crate::core::error::{ReminderError, ReminderResult};

/// Clock frozen at one instant, for scratch heaps
struct At(DateTime<Utc>);

impl Clock for At {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct BinaryHeap<T, C = SystemClock> {
    /// 0-indexed: children of `i` live at `2i + 1` and `2i + 2`
    slots: Vec<T>,
    /// Logical capacity; doubles when full, never shrinks
    capacity: usize,
    max_capacity: usize,
    clock: C,
}

impl<T: Prioritized, C: Clock> BinaryHeap<T, C> {
    /// Empty heap with the default sizing (25 slots, ceiling of 10000)
    pub fn new(clock: C) -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY, clock)
    }

    /// Empty heap with explicit sizing. `initial` is capped at `max_capacity`.
    pub fn with_capacity(initial: usize, max_capacity: usize, clock: C) -> Self {
        let capacity = initial.min(max_capacity);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            max_capacity,
            clock,
        }
    }

    pub fn from_config(config: &SchedulerConfig, clock: C) -> Self {
        Self::with_capacity(config.initial_capacity, config.max_capacity, clock)
    }

    /// Add an item and sift it up from the new leaf.
    ///
    /// Fails only when the heap is already at its absolute ceiling.
    pub fn insert(&mut self, item: T) -> ReminderResult<()> {
        self.ensure_capacity()?;
        self.slots.push(item);
        self.sift_up(self.slots.len() - 1);
        Ok(())
    }

    /// Remove and return the root, then sift the moved leaf down.
    ///
    /// Returns `None` on an empty heap.
    pub fn extract_max(&mut self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }

        let last = self.slots.len() - 1;
        self.slots.swap(0, last);
        let top = self.slots.pop();
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        top
    }

    /// Current root. Not guaranteed to still be the maximum once time moves on.
    pub fn peek(&self) -> Option<&T> {
        self.slots.first()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Items in array order (not rank order)
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.slots.iter()
    }

    /// Drop every item. Capacity is kept.
    pub fn clear(&mut self) {
        let dropped = self.slots.len();
        self.slots.clear();
        debug!("Cleared {dropped} items from reminder heap");
    }

    /// All items in descending rank as of this call, leaving the heap untouched.
    pub fn snapshot_sorted(&self) -> Vec<&T> {
        self.snapshot_sorted_at(self.clock.now())
    }

    /// All items in descending rank at `now`, leaving the heap untouched.
    ///
    /// Borrows every slot into a scratch heap pinned to `now`, rebuilds it,
    /// and drains it. Every comparison sees the same instant.
    pub fn snapshot_sorted_at(&self, now: DateTime<Utc>) -> Vec<&T> {
        let mut scratch = BinaryHeap {
            slots: self.slots.iter().collect::<Vec<&T>>(),
            capacity: self.slots.len(),
            max_capacity: self.max_capacity,
            clock: At(now),
        };
        scratch.rebuild();

        let mut ordered = Vec::with_capacity(scratch.len());
        while let Some(item) = scratch.extract_max() {
            ordered.push(item);
        }
        ordered
    }

    /// Re-establish heap order against the current instant. O(n).
    pub fn refresh(&mut self) {
        self.rebuild();
    }

    /// First item matching `pred`, in array order
    pub fn find<F>(&self, pred: F) -> Option<&T>
    where
        F: FnMut(&&T) -> bool,
    {
        self.slots.iter().find(pred)
    }

    /// Mutate the first matching item in place and repair order around it.
    ///
    /// Returns the closure's result, or `None` if nothing matched.
    pub fn update_where<F, G, R>(&mut self, pred: F, update: G) -> Option<R>
    where
        F: FnMut(&T) -> bool,
        G: FnOnce(&mut T) -> R,
    {
        let index = self.slots.iter().position(pred)?;
        let result = update(&mut self.slots[index]);
        self.restore(index);
        Some(result)
    }

    /// Remove the first matching item, wherever it sits.
    pub fn remove_where<F>(&mut self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let index = self.slots.iter().position(pred)?;
        let last = self.slots.len() - 1;
        self.slots.swap(index, last);
        let removed = self.slots.pop();
        if index < self.slots.len() {
            self.restore(index);
        }
        removed
    }

    /// Keep only items matching `keep`, then rebuild. Returns how many were dropped.
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.slots.len();
        self.slots.retain(keep);
        self.rebuild();
        before - self.slots.len()
    }

    /// Whether every parent outranks or ties its children right now
    pub fn is_ordered(&self) -> bool {
        let now = self.clock.now();
        (1..self.slots.len()).all(|child| {
            let parent = (child - 1) / 2;
            self.slots[parent].effective_rank(now) >= self.slots[child].effective_rank(now)
        })
    }

    fn ensure_capacity(&mut self) -> ReminderResult<()> {
        if self.slots.len() < self.capacity {
            return Ok(());
        }

        if self.capacity >= self.max_capacity {
            warn!(
                "Reminder heap refused insert: at capacity ceiling of {}",
                self.max_capacity
            );
            return Err(ReminderError::CapacityExceeded {
                max_capacity: self.max_capacity,
            });
        }

        let grown = self
            .capacity
            .saturating_mul(2)
            .max(1)
            .min(self.max_capacity);
        self.slots.reserve_exact(grown - self.slots.len());
        debug!("Reminder heap grew from {} to {} slots", self.capacity, grown);
        self.capacity = grown;
        Ok(())
    }

    /// Rank comparison at the instant of the call
    fn outranks(&self, a: usize, b: usize) -> bool {
        let now = self.clock.now();
        self.slots[a].effective_rank(now) > self.slots[b].effective_rank(now)
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.outranks(index, parent) {
                break;
            }
            self.slots.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let larger = if right < len && self.outranks(right, left) {
                right
            } else {
                left
            };

            if !self.outranks(larger, index) {
                break;
            }
            self.slots.swap(index, larger);
            index = larger;
        }
    }

    /// Repair after the item at `index` changed rank in either direction
    fn restore(&mut self, index: usize) {
        let settled = self.sift_up(index);
        self.sift_down(settled);
    }

    fn rebuild(&mut self) {
        for index in (0..self.slots.len() / 2).rev() {
            self.sift_down(index);
        }
    }
}

impl<T: Prioritized> Default for BinaryHeap<T, SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for BinaryHeap<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("len", &self.slots.len())
            .field("capacity", &self.capacity)
            .field("max_capacity", &self.max_capacity)
            .field("slots", &self.slots)
            .finish()
    }
}
