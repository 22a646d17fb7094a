use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A blocked-date record as stored and returned by the backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDateDto {
    #[serde(rename = "_id")]
    pub id: String,
    /// `YYYY-MM-DD` or a full ISO datetime; only the date part is meaningful.
    pub date: String,
    #[serde(default)]
    pub reason: String,
    pub is_active: bool,
    pub is_full_day_blocked: bool,
    #[serde(default)]
    pub blocked_time_slots: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleDto {
    pub is_working: bool,
    pub time_slots: Vec<String>,
}

/// Keyed by lowercase weekday name (`"sunday"` .. `"saturday"`).
pub type WeeklyScheduleDto = BTreeMap<String, DayScheduleDto>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSettingsDto {
    pub weekly_schedule: WeeklyScheduleDto,
    /// Hours of notice required before a slot.
    pub min_advance_booking: u32,
    /// Days; stored but not enforced.
    #[serde(default)]
    pub max_advance_booking: u32,
    #[serde(default = "default_booking_enabled")]
    pub is_booking_enabled: bool,
}

fn default_booking_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingDto {
    pub date: String,
    pub time: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Open,
    PartiallyBlocked,
    FullyBooked,
    BlockedFull,
    Closed,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Open => "open",
            AvailabilityStatus::PartiallyBlocked => "partially_blocked",
            AvailabilityStatus::FullyBooked => "fully_booked",
            AvailabilityStatus::BlockedFull => "blocked_full",
            AvailabilityStatus::Closed => "closed",
        }
    }
}

/// Why a scheduled slot is or is not offered.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    Bookable,
    Blocked,
    Booked,
    InsideNoticeWindow,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SlotAvailabilityDto {
    pub time: String,
    pub state: SlotState,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResultDto {
    pub date: String,
    pub status: AvailabilityStatus,
    pub bookable_slots: Vec<String>,
    pub slots: Vec<SlotAvailabilityDto>,
}

/// Dashboard counters over a set of blocked-date records.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub full_day: usize,
    pub partial: usize,
    /// Active records dated from today through the end of the window.
    pub upcoming: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthDto {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub cells: Vec<Option<u32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequestDto {
    pub date: String,
    pub settings: BookingSettingsDto,
    #[serde(default)]
    pub blocked_dates: Vec<BlockedDateDto>,
    #[serde(default)]
    pub bookings: Vec<BookingDto>,
    /// Defaults to the server clock.
    #[serde(default)]
    pub now: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckBookingRequestDto {
    pub date: String,
    pub time: String,
    pub settings: BookingSettingsDto,
    #[serde(default)]
    pub blocked_dates: Vec<BlockedDateDto>,
    #[serde(default)]
    pub bookings: Vec<BookingDto>,
    #[serde(default)]
    pub now: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CheckBookingResponseDto {
    pub accepted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockRangeRequestDto {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockRangeResponseDto {
    pub day_count: u64,
    pub blocked_dates: Vec<BlockedDateDto>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatsRequestDto {
    pub blocked_dates: Vec<BlockedDateDto>,
    #[serde(default)]
    pub today: Option<String>,
    #[serde(default)]
    pub window_days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
}
