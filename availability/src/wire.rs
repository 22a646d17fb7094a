//! Conversions between the backend's JSON shapes and the domain types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use shared_types::{
    AvailabilityResultDto, BlockedDateDto, BookingDto, BookingSettingsDto, CalendarMonthDto,
    DayScheduleDto, SlotAvailabilityDto, WeeklyScheduleDto,
};
use thiserror::Error;

use crate::blocked::BlockedDateRecord;
use crate::booking::{Booking, BookingStatus};
use crate::calendar::{month_name, MonthGrid};
use crate::policy::{AdvancePolicy, BookingSettings};
use crate::resolver::AvailabilityResult;
use crate::schedule::{weekday_from_key, weekday_key, DaySchedule, ScheduleError, WeeklySchedule, WEEKDAYS};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("`{0}` is not a date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("`{0}` is not an ISO-8601 timestamp")]
    InvalidTimestamp(String),
    #[error("weekly schedule is missing `{0}`")]
    MissingDay(String),
    #[error("weekly schedule has unknown key `{0}`")]
    UnknownDay(String),
    #[error("weekly schedule `{day}`: {source}")]
    Day {
        day: String,
        #[source]
        source: ScheduleError,
    },
}

/// Accepts `YYYY-MM-DD` or any string starting with it followed by a time
/// part (`T` or space). The time part is ignored.
pub fn parse_date(value: &str) -> Result<NaiveDate, WireError> {
    let invalid = || WireError::InvalidDate(value.to_string());
    let trimmed = value.trim();
    let date_part = match trimmed.get(10..11) {
        None => trimmed,
        Some("T") | Some(" ") => &trimmed[..10],
        Some(_) => return Err(invalid()),
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` read as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, WireError> {
    let trimmed = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| WireError::InvalidTimestamp(value.to_string()))
}

pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl TryFrom<&BlockedDateDto> for BlockedDateRecord {
    type Error = WireError;

    fn try_from(dto: &BlockedDateDto) -> Result<Self, Self::Error> {
        let reason = dto.reason.trim();
        Ok(Self {
            id: dto.id.clone(),
            date: parse_date(&dto.date)?,
            reason: (!reason.is_empty()).then(|| reason.to_string()),
            is_active: dto.is_active,
            is_full_day_blocked: dto.is_full_day_blocked,
            blocked_time_slots: dto.blocked_time_slots.clone(),
            created_at: parse_timestamp(&dto.created_at)?,
        })
    }
}

impl From<&BlockedDateRecord> for BlockedDateDto {
    fn from(record: &BlockedDateRecord) -> Self {
        Self {
            id: record.id.clone(),
            date: format_date(record.date),
            reason: record.reason.clone().unwrap_or_default(),
            is_active: record.is_active,
            is_full_day_blocked: record.is_full_day_blocked,
            blocked_time_slots: record.blocked_time_slots.clone(),
            created_at: format_timestamp(record.created_at),
        }
    }
}

pub fn blocked_dates_from_dtos(dtos: &[BlockedDateDto]) -> Result<Vec<BlockedDateRecord>, WireError> {
    dtos.iter().map(BlockedDateRecord::try_from).collect()
}

impl TryFrom<&BookingDto> for Booking {
    type Error = WireError;

    fn try_from(dto: &BookingDto) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&dto.date)?,
            time: dto.time.clone(),
            status: BookingStatus::parse(&dto.status),
        })
    }
}

pub fn bookings_from_dtos(dtos: &[BookingDto]) -> Result<Vec<Booking>, WireError> {
    dtos.iter().map(Booking::try_from).collect()
}

/// Every weekday key must be present and every label valid. The first
/// problem found is reported with the key it was found under.
pub fn schedule_from_dto(dto: &WeeklyScheduleDto) -> Result<WeeklySchedule, WireError> {
    if let Some(unknown) = dto.keys().find(|key| weekday_from_key(key).is_none()) {
        return Err(WireError::UnknownDay(unknown.clone()));
    }

    let mut schedule = WeeklySchedule::default();
    for weekday in WEEKDAYS {
        let key = weekday_key(weekday);
        let day = dto
            .get(key)
            .ok_or_else(|| WireError::MissingDay(key.to_string()))?;
        let day = DaySchedule::new(day.is_working, day.time_slots.iter().cloned()).map_err(|source| {
            WireError::Day {
                day: key.to_string(),
                source,
            }
        })?;
        schedule.set_day(weekday, day);
    }
    Ok(schedule)
}

pub fn schedule_to_dto(schedule: &WeeklySchedule) -> WeeklyScheduleDto {
    schedule
        .iter()
        .map(|(weekday, day)| {
            (
                weekday_key(weekday).to_string(),
                DayScheduleDto {
                    is_working: day.is_working(),
                    time_slots: day.labels(),
                },
            )
        })
        .collect()
}

pub fn settings_from_dto(dto: &BookingSettingsDto, time_zone: Tz) -> Result<BookingSettings, WireError> {
    Ok(BookingSettings {
        schedule: schedule_from_dto(&dto.weekly_schedule)?,
        policy: AdvancePolicy {
            min_advance_booking_hours: dto.min_advance_booking,
            max_advance_booking_days: dto.max_advance_booking,
        },
        is_booking_enabled: dto.is_booking_enabled,
        time_zone,
    })
}

pub fn settings_to_dto(settings: &BookingSettings) -> BookingSettingsDto {
    BookingSettingsDto {
        weekly_schedule: schedule_to_dto(&settings.schedule),
        min_advance_booking: settings.policy.min_advance_booking_hours,
        max_advance_booking: settings.policy.max_advance_booking_days,
        is_booking_enabled: settings.is_booking_enabled,
    }
}

impl From<&AvailabilityResult> for AvailabilityResultDto {
    fn from(result: &AvailabilityResult) -> Self {
        Self {
            date: format_date(result.date),
            status: result.status,
            bookable_slots: result.bookable_slots.clone(),
            slots: result
                .slots
                .iter()
                .map(|slot| SlotAvailabilityDto {
                    time: slot.time.clone(),
                    state: slot.state,
                })
                .collect(),
        }
    }
}

impl From<&MonthGrid> for CalendarMonthDto {
    fn from(grid: &MonthGrid) -> Self {
        Self {
            year: grid.year,
            month: grid.month,
            month_name: month_name(grid.month).unwrap_or_default().to_string(),
            cells: grid.cells().to_vec(),
        }
    }
}
