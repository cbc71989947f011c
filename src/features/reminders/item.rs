//! Reminder items
//!
//! An `Item` wraps a caller-owned payload with the scheduling state the heap
//! ranks on. The payload is moved in once and handed back on removal; the
//! engine never clones, serializes, or mutates it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::priority::{clamp_level, effective_rank, Prioritized, Rank};

/// Opaque, immutable reminder identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        ItemId(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "REM-{}", self.0)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

#[derive(Debug)]
pub struct Item<P> {
    id: ItemId,
    payload: P,
    due_at: DateTime<Utc>,
    /// Always within `[1, 5]`
    base_level: u8,
    consumed: bool,
}

impl<P> Item<P> {
    /// Create an unconsumed item. `base_level` is clamped into `[1, 5]`.
    pub fn new(payload: P, due_at: DateTime<Utc>, base_level: i64) -> Self {
        Item {
            id: ItemId::new(),
            payload,
            due_at,
            base_level: clamp_level(base_level),
            consumed: false,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub fn base_level(&self) -> u8 {
        self.base_level
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn reschedule(&mut self, due_at: DateTime<Utc>) {
        self.due_at = due_at;
    }

    pub fn set_base_level(&mut self, level: i64) {
        self.base_level = clamp_level(level);
    }

    /// Flag the item as handled. Returns `false` if it already was.
    pub fn mark_consumed(&mut self) -> bool {
        if self.consumed {
            return false;
        }
        self.consumed = true;
        true
    }

    /// Whole minutes until due, truncated toward zero; negative once overdue
    pub fn minutes_until_due(&self, now: DateTime<Utc>) -> i64 {
        self.due_at.signed_duration_since(now).num_minutes()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && now > self.due_at
    }
}

impl<P> Prioritized for Item<P> {
    fn effective_rank(&self, now: DateTime<Utc>) -> Rank {
        effective_rank(
            i64::from(self.base_level),
            self.minutes_until_due(now),
            self.consumed,
        )
    }
}

/// Identity is the id alone; due time and level may change.
impl<P> PartialEq for Item<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for Item<P> {}

impl<P> std::hash::Hash for Item<P> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<P> std::fmt::Display for Item<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - Due: {} - Priority: {}",
            self.id,
            self.due_at.format("%Y-%m-%d %H:%M"),
            self.base_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_item_defaults() {
        let now = Utc::now();
        let item = Item::new("Lisinopril", now + Duration::hours(1), 3);

        assert_eq!(*item.payload(), "Lisinopril");
        assert_eq!(item.base_level(), 3);
        assert!(!item.is_consumed());
        assert!(item.id().to_string().starts_with("REM-"));
    }

    #[test]
    fn test_ids_are_unique() {
        let now = Utc::now();
        let a = Item::new((), now, 1);
        let b = Item::new((), now, 1);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_base_level_clamped_on_create_and_update() {
        let now = Utc::now();
        let mut item = Item::new((), now, 0);
        assert_eq!(item.base_level(), 1);

        item.set_base_level(9);
        assert_eq!(item.base_level(), 5);

        item.set_base_level(2);
        assert_eq!(item.base_level(), 2);
    }

    #[test]
    fn test_mark_consumed_once() {
        let mut item = Item::new((), Utc::now(), 3);
        assert!(item.mark_consumed());
        assert!(!item.mark_consumed());
        assert!(item.is_consumed());
    }

    #[test]
    fn test_minutes_until_due_truncates() {
        let now = Utc::now();
        let item = Item::new((), now + Duration::seconds(29 * 60 + 59), 3);
        assert_eq!(item.minutes_until_due(now), 29);

        let late = Item::new((), now - Duration::seconds(30), 3);
        assert_eq!(late.minutes_until_due(now), 0);

        let overdue = Item::new((), now - Duration::minutes(5), 3);
        assert_eq!(overdue.minutes_until_due(now), -5);
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let mut item = Item::new((), now - Duration::minutes(1), 3);
        assert!(item.is_overdue(now));

        item.mark_consumed();
        assert!(!item.is_overdue(now));

        let upcoming = Item::new((), now + Duration::minutes(1), 3);
        assert!(!upcoming.is_overdue(now));
    }

    #[test]
    fn test_rank_follows_clock() {
        let now = Utc::now();
        let item = Item::new((), now + Duration::minutes(61), 3);

        assert_eq!(item.effective_rank(now), Rank::Active(30));
        assert_eq!(item.effective_rank(now + Duration::minutes(2)), Rank::Active(60));
        assert_eq!(item.effective_rank(now + Duration::minutes(32)), Rank::Active(150));
        assert_eq!(item.effective_rank(now + Duration::minutes(62)), Rank::Active(300));
    }

    #[test]
    fn test_rank_after_reschedule_and_consume() {
        let now = Utc::now();
        let mut item = Item::new((), now + Duration::hours(5), 1);
        assert_eq!(item.effective_rank(now), Rank::Active(5));

        item.reschedule(now - Duration::minutes(1));
        assert_eq!(item.effective_rank(now), Rank::Active(500));

        item.mark_consumed();
        assert_eq!(item.effective_rank(now), Rank::Consumed);
    }

    #[test]
    fn test_display() {
        let due = DateTime::parse_from_rfc3339("2026-03-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let item = Item::new((), due, 4);
        let text = item.to_string();
        assert!(text.ends_with(" - Due: 2026-03-01 08:30 - Priority: 4"));
    }
}
