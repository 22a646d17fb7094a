use chrono::{DateTime, Days, NaiveDate, Utc};
use shared_types::BlockStats;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::date_range;
use crate::schedule::TimeSlot;
use crate::slot::{parse_slot_time, same_slot, SlotError};

/// Dashboard window for the "upcoming" counter.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("blocked date `{0}` not found")]
    NotFound(String),
    #[error("blocked date `{0}` already exists")]
    DuplicateId(String),
    #[error("blocked date `{0}` blocks the whole day; it has no individual slots")]
    NotPartial(String),
    #[error("slot `{slot}` is not blocked by `{id}`")]
    SlotNotBlocked { id: String, slot: String },
    #[error("a partial block needs at least one time slot")]
    EmptySlotSelection,
    #[error(transparent)]
    InvalidSlot(#[from] SlotError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedDateRecord {
    pub id: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub is_active: bool,
    pub is_full_day_blocked: bool,
    /// Only meaningful when the record is not a full-day block.
    pub blocked_time_slots: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl BlockedDateRecord {
    pub fn full_day(date: NaiveDate, reason: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            reason,
            is_active: true,
            is_full_day_blocked: true,
            blocked_time_slots: Vec::new(),
            created_at: now,
        }
    }

    pub fn partial(
        date: NaiveDate,
        reason: Option<String>,
        slots: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            reason,
            is_active: true,
            is_full_day_blocked: false,
            blocked_time_slots: slots,
            created_at: now,
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.is_full_day_blocked
    }

    pub fn blocks_slot(&self, slot: &TimeSlot) -> bool {
        self.is_full_day_blocked || self.blocked_time_slots.iter().any(|label| slot.matches(label))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    FullDay,
    Slots(Vec<String>),
}

/// Count records the way the blocked-dates screen summarises them.
pub fn block_stats(records: &[BlockedDateRecord], today: NaiveDate, window_days: u32) -> BlockStats {
    let window_end = today
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX);
    records.iter().fold(BlockStats::default(), |mut stats, record| {
        stats.total += 1;
        if record.is_active {
            stats.active += 1;
            if record.date >= today && record.date <= window_end {
                stats.upcoming += 1;
            }
        } else {
            stats.inactive += 1;
        }
        if record.is_full_day_blocked {
            stats.full_day += 1;
        } else {
            stats.partial += 1;
        }
        stats
    })
}

/// In-memory set of blocked-date records and the admin actions on them.
#[derive(Debug, Clone, Default)]
pub struct BlockedDateRegistry {
    records: Vec<BlockedDateRecord>,
}

impl BlockedDateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<BlockedDateRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BlockedDateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BlockedDateRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn insert(&mut self, record: BlockedDateRecord) -> Result<(), RegistryError> {
        if self.get(&record.id).is_some() {
            return Err(RegistryError::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn block_date(
        &mut self,
        date: NaiveDate,
        reason: Option<String>,
        kind: BlockKind,
        now: DateTime<Utc>,
    ) -> Result<&BlockedDateRecord, RegistryError> {
        let record = match kind {
            BlockKind::FullDay => BlockedDateRecord::full_day(date, reason, now),
            BlockKind::Slots(labels) => {
                let mut slots: Vec<String> = Vec::with_capacity(labels.len());
                for label in labels {
                    parse_slot_time(&label)?;
                    if !slots.iter().any(|existing| same_slot(existing, &label)) {
                        slots.push(label);
                    }
                }
                if slots.is_empty() {
                    return Err(RegistryError::EmptySlotSelection);
                }
                BlockedDateRecord::partial(date, reason, slots, now)
            }
        };

        info!(
            id = %record.id,
            %date,
            full_day = record.is_full_day_blocked,
            slots = record.blocked_time_slots.len(),
            "blocked date created"
        );
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Block every date from `start` through `end` for the whole day.
    /// A reversed range creates nothing.
    pub fn block_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Vec<BlockedDateRecord> {
        let created: Vec<BlockedDateRecord> = date_range::expand(start, end)
            .into_iter()
            .map(|date| BlockedDateRecord::full_day(date, reason.clone(), now))
            .collect();

        info!(%start, %end, count = created.len(), "blocked date range");
        self.records.extend(created.iter().cloned());
        created
    }

    pub fn set_active(&mut self, id: &str, is_active: bool) -> Result<(), RegistryError> {
        let record = self.get_mut(id)?;
        record.is_active = is_active;
        info!(id, is_active, "blocked date toggled");
        Ok(())
    }

    /// Flip `isActive` and return the new value.
    pub fn toggle_active(&mut self, id: &str) -> Result<bool, RegistryError> {
        let is_active = !self.get_mut(id)?.is_active;
        self.set_active(id, is_active)?;
        Ok(is_active)
    }

    /// Remove one slot from a partial block. A block left with no slots
    /// stays in place and blocks nothing.
    pub fn remove_slot(&mut self, id: &str, slot: &str) -> Result<(), RegistryError> {
        let record = self.get_mut(id)?;
        if record.is_full_day_blocked {
            return Err(RegistryError::NotPartial(id.to_string()));
        }
        let position = record
            .blocked_time_slots
            .iter()
            .position(|label| same_slot(label, slot))
            .ok_or_else(|| RegistryError::SlotNotBlocked {
                id: id.to_string(),
                slot: slot.to_string(),
            })?;
        record.blocked_time_slots.remove(position);
        info!(id, slot, remaining = record.blocked_time_slots.len(), "blocked slot removed");
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<BlockedDateRecord, RegistryError> {
        let position = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        info!(id, "blocked date deleted");
        Ok(self.records.remove(position))
    }

    pub fn for_date(&self, date: NaiveDate) -> impl Iterator<Item = &BlockedDateRecord> {
        self.records.iter().filter(move |record| record.date == date)
    }

    pub fn active_on(&self, date: NaiveDate) -> impl Iterator<Item = &BlockedDateRecord> {
        self.for_date(date).filter(|record| record.is_active)
    }

    pub fn stats(&self, today: NaiveDate, window_days: u32) -> BlockStats {
        block_stats(&self.records, today, window_days)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut BlockedDateRecord, RegistryError> {
        self.records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }
}
