use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resolver::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    /// Any status this crate does not know about. It still holds the slot.
    #[serde(other)]
    Other,
}

impl BookingStatus {
    pub fn parse(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other,
        }
    }

    pub fn occupies_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// The part of a booking that matters for availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub date: NaiveDate,
    pub time: String,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new(date: NaiveDate, time: impl Into<String>, status: BookingStatus) -> Self {
        Self {
            date,
            time: time.into(),
            status,
        }
    }

    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.date == date && self.status.occupies_slot()
    }
}

/// Reason a requested slot cannot be booked.
#[derive(Debug, Error)]
pub enum BookingRejection {
    #[error("the business is closed on {0}")]
    Closed(NaiveDate),
    #[error("{0} is blocked for the whole day")]
    BlockedFullDay(NaiveDate),
    #[error("slot {time} on {date} is blocked")]
    SlotBlocked { date: NaiveDate, time: String },
    #[error("slot {time} on {date} is already booked")]
    AlreadyBooked { date: NaiveDate, time: String },
    #[error("slot {time} on {date} starts before the booking cutoff {cutoff}")]
    InsideNoticeWindow {
        date: NaiveDate,
        time: String,
        cutoff: DateTime<Utc>,
    },
    #[error("{time} is not a scheduled slot on {date}")]
    NotOffered { date: NaiveDate, time: String },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl BookingRejection {
    /// Stable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Closed(_) => "CLOSED",
            Self::BlockedFullDay(_) => "BLOCKED_FULL_DAY",
            Self::SlotBlocked { .. } => "SLOT_BLOCKED",
            Self::AlreadyBooked { .. } => "ALREADY_BOOKED",
            Self::InsideNoticeWindow { .. } => "INSIDE_NOTICE_WINDOW",
            Self::NotOffered { .. } => "NOT_OFFERED",
            Self::Resolve(_) => "UNRESOLVABLE_SLOT",
        }
    }
}
