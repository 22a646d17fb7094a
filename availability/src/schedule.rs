use chrono::{NaiveTime, Weekday};
use thiserror::Error;

use crate::slot::{parse_slot_time, SlotError};

/// Weekdays in table order, Sunday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    InvalidSlot(#[from] SlotError),
    #[error("time slot `{0}` is listed more than once")]
    DuplicateSlot(String),
}

/// Lowercase weekday name used as the schedule key on the wire.
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

pub fn weekday_from_key(key: &str) -> Option<Weekday> {
    WEEKDAYS.into_iter().find(|day| weekday_key(*day) == key)
}

/// A configured slot: the label as the admin typed it, plus its time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    label: String,
    time: NaiveTime,
}

impl TimeSlot {
    pub fn parse(label: impl Into<String>) -> Result<Self, SlotError> {
        let label = label.into();
        let time = parse_slot_time(&label)?;
        Ok(Self { label, time })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Whether a label from a block or booking refers to this slot.
    pub fn matches(&self, label: &str) -> bool {
        self.label == label || parse_slot_time(label).is_ok_and(|time| time == self.time)
    }
}

/// One weekday of the schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    is_working: bool,
    slots: Vec<TimeSlot>,
}

impl DaySchedule {
    /// Validate every label and refuse duplicates. Slots keep the order given.
    pub fn new<I, S>(is_working: bool, labels: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots: Vec<TimeSlot> = Vec::new();
        for label in labels {
            let slot = TimeSlot::parse(label)?;
            if slots.iter().any(|existing| existing.time == slot.time) {
                return Err(ScheduleError::DuplicateSlot(slot.label));
            }
            slots.push(slot);
        }
        Ok(Self { is_working, slots })
    }

    pub fn closed() -> Self {
        Self::default()
    }

    pub fn is_working(&self) -> bool {
        self.is_working
    }

    /// Configured slots, including those of a non-working day.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Slots that can be offered at all: none on a non-working day.
    pub fn working_slots(&self) -> &[TimeSlot] {
        if self.is_working {
            &self.slots
        } else {
            &[]
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.label.clone()).collect()
    }

    /// A copy of this day with one more slot, placed before the first
    /// configured slot that starts later.
    pub fn with_slot(&self, label: impl Into<String>) -> Result<Self, ScheduleError> {
        let slot = TimeSlot::parse(label)?;
        if self.slots.iter().any(|existing| existing.time == slot.time) {
            return Err(ScheduleError::DuplicateSlot(slot.label));
        }
        let mut slots = self.slots.clone();
        let position = slots
            .iter()
            .position(|existing| existing.time > slot.time)
            .unwrap_or(slots.len());
        slots.insert(position, slot);
        Ok(Self {
            is_working: self.is_working,
            slots,
        })
    }

    pub fn with_working(&self, is_working: bool) -> Self {
        Self {
            is_working,
            slots: self.slots.clone(),
        }
    }
}

/// Seven day entries, indexed Sunday = 0 through Saturday = 6.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [DaySchedule; 7],
}

impl WeeklySchedule {
    /// Days in Sunday-first order.
    pub fn new(days: [DaySchedule; 7]) -> Self {
        Self { days }
    }

    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    /// Replace a whole day. This is the only way the schedule changes.
    pub fn set_day(&mut self, weekday: Weekday, day: DaySchedule) {
        self.days[weekday.num_days_from_sunday() as usize] = day;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        WEEKDAYS.into_iter().zip(self.days.iter())
    }

    pub fn working_days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.iter()
            .filter(|(_, day)| day.is_working())
            .map(|(weekday, _)| weekday)
    }
}
