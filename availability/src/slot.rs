//! Slot labels and their time of day.
//!
//! Labels are free-form strings on the wire. Before a label is used for
//! time arithmetic it has to read unambiguously: either 24-hour `HH:MM`
//! with a two-digit hour, or a 12-hour clock with an explicit AM/PM
//! suffix. A bare one-digit hour such as `"1:30"` is refused, since the
//! dashboard historically read those as afternoon slots.

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("time slot label is empty")]
    Empty,
    #[error("time slot `{0}` is ambiguous; use 24-hour HH:MM or add AM/PM")]
    Ambiguous(String),
    #[error("time slot `{0}` is not a valid time of day")]
    Malformed(String),
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Parse a slot label into a time of day.
pub fn parse_slot_time(label: &str) -> Result<NaiveTime, SlotError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(SlotError::Empty);
    }

    let malformed = || SlotError::Malformed(label.to_string());
    let lower = trimmed.to_ascii_lowercase();

    let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else {
        (lower.as_str(), None)
    };

    let (hour_str, minute_str) = match clock.split_once(':') {
        Some((hour, minute)) => (hour, Some(minute)),
        None => (clock, None),
    };

    if hour_str.is_empty() || hour_str.len() > 2 || !hour_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let hour: u32 = hour_str.parse().map_err(|_| malformed())?;

    let minute: u32 = match minute_str {
        Some(m) if m.len() == 2 && m.bytes().all(|b| b.is_ascii_digit()) => {
            m.parse().map_err(|_| malformed())?
        }
        Some(_) => return Err(malformed()),
        None => 0,
    };

    let hour_24 = match meridiem {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return Err(malformed());
            }
            match (meridiem, hour) {
                (Meridiem::Am, 12) => 0,
                (Meridiem::Am, h) => h,
                (Meridiem::Pm, 12) => 12,
                (Meridiem::Pm, h) => h + 12,
            }
        }
        None => {
            // A bare "10" carries no minutes and no convention.
            if minute_str.is_none() {
                return Err(malformed());
            }
            if hour_str.len() != 2 {
                return Err(SlotError::Ambiguous(label.to_string()));
            }
            hour
        }
    };

    NaiveTime::from_hms_opt(hour_24, minute, 0).ok_or_else(malformed)
}

/// Canonical 24-hour label for a time of day.
pub fn canonical_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Two labels name the same slot when they are identical or both parse to
/// the same time of day.
pub fn same_slot(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (parse_slot_time(a), parse_slot_time(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

/// Sort labels chronologically. Unparseable labels keep their relative
/// order at the end.
pub fn sort_slots(labels: &mut [String]) {
    labels.sort_by_key(|label| {
        let parsed = parse_slot_time(label).ok();
        (parsed.is_none(), parsed)
    });
}
