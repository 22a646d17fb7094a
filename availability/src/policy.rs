use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::resolver::AvailabilityResolver;
use crate::schedule::WeeklySchedule;

/// Lead time required between now and a bookable slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancePolicy {
    pub min_advance_booking_hours: u32,
    /// Stored with the settings; nothing enforces it.
    pub max_advance_booking_days: u32,
}

impl AdvancePolicy {
    pub fn new(min_advance_booking_hours: u32) -> Self {
        Self {
            min_advance_booking_hours,
            max_advance_booking_days: 0,
        }
    }

    /// Earliest instant a slot may start at to still be bookable.
    /// Saturates at the latest representable instant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(Duration::hours(i64::from(self.min_advance_booking_hours)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Everything the business configures about bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingSettings {
    pub schedule: WeeklySchedule,
    pub policy: AdvancePolicy,
    /// Global kill switch. Callers check it before resolving.
    pub is_booking_enabled: bool,
    pub time_zone: Tz,
}

impl BookingSettings {
    pub fn new(schedule: WeeklySchedule, policy: AdvancePolicy, time_zone: Tz) -> Self {
        Self {
            schedule,
            policy,
            is_booking_enabled: true,
            time_zone,
        }
    }

    pub fn resolver(&self) -> AvailabilityResolver<'_> {
        AvailabilityResolver::new(&self.schedule, self.policy, self.time_zone)
    }
}
