use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use shared_types::{AvailabilityStatus, SlotState};
use thiserror::Error;
use tracing::debug;

use crate::blocked::BlockedDateRecord;
use crate::booking::{Booking, BookingRejection};
use crate::policy::AdvancePolicy;
use crate::schedule::{weekday_key, TimeSlot, WeeklySchedule};
use crate::slot::same_slot;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("slot {slot} on {date} has no instant in time zone {zone}")]
    UnrepresentableSlot {
        date: NaiveDate,
        slot: String,
        zone: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub time: String,
    pub state: SlotState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityResult {
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    pub bookable_slots: Vec<String>,
    /// Every scheduled slot in configured order, with the reason it is or
    /// is not offered. Empty for a closed day.
    pub slots: Vec<SlotAvailability>,
}

/// Decides which slots of a date can be booked.
///
/// Holds only borrowed configuration, so one resolver can serve any number
/// of concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityResolver<'a> {
    schedule: &'a WeeklySchedule,
    policy: AdvancePolicy,
    time_zone: Tz,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(schedule: &'a WeeklySchedule, policy: AdvancePolicy, time_zone: Tz) -> Self {
        Self {
            schedule,
            policy,
            time_zone,
        }
    }

    /// Resolve the bookable slots of `date`.
    ///
    /// `blocked` and `bookings` may hold entries for other dates; they are
    /// ignored. Precedence: non-working day, then an active full-day block,
    /// then partial blocks, existing bookings and the notice cutoff.
    pub fn resolve(
        &self,
        date: NaiveDate,
        blocked: &[BlockedDateRecord],
        bookings: &[Booking],
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResult, ResolveError> {
        let weekday = date.weekday();
        let day = self.schedule.day(weekday);

        if !day.is_working() {
            debug!(%date, weekday = weekday_key(weekday), "closed: not a working day");
            return Ok(AvailabilityResult {
                date,
                status: AvailabilityStatus::Closed,
                bookable_slots: Vec::new(),
                slots: Vec::new(),
            });
        }

        let active: Vec<&BlockedDateRecord> = blocked
            .iter()
            .filter(|record| record.is_active && record.date == date)
            .collect();

        if active.iter().any(|record| record.is_full_day_blocked) {
            debug!(%date, "blocked for the whole day");
            return Ok(AvailabilityResult {
                date,
                status: AvailabilityStatus::BlockedFull,
                bookable_slots: Vec::new(),
                slots: day
                    .slots()
                    .iter()
                    .map(|slot| SlotAvailability {
                        time: slot.label().to_string(),
                        state: SlotState::Blocked,
                    })
                    .collect(),
            });
        }

        let cutoff = self.policy.cutoff(now);
        let mut slots = Vec::with_capacity(day.slots().len());
        for slot in day.slots() {
            let state = if active.iter().any(|record| record.blocks_slot(slot)) {
                SlotState::Blocked
            } else if bookings
                .iter()
                .any(|booking| booking.occupies(date) && slot.matches(&booking.time))
            {
                SlotState::Booked
            } else if self.slot_instant(date, slot)? < cutoff {
                SlotState::InsideNoticeWindow
            } else {
                SlotState::Bookable
            };
            slots.push(SlotAvailability {
                time: slot.label().to_string(),
                state,
            });
        }

        let bookable_slots: Vec<String> = slots
            .iter()
            .filter(|slot| slot.state == SlotState::Bookable)
            .map(|slot| slot.time.clone())
            .collect();

        let status = if bookable_slots.is_empty() {
            AvailabilityStatus::FullyBooked
        } else if bookable_slots.len() == slots.len() {
            AvailabilityStatus::Open
        } else {
            AvailabilityStatus::PartiallyBlocked
        };

        debug!(
            %date,
            status = status.as_str(),
            scheduled = slots.len(),
            bookable = bookable_slots.len(),
            "resolved availability"
        );

        Ok(AvailabilityResult {
            date,
            status,
            bookable_slots,
            slots,
        })
    }

    /// Re-check a requested slot before a booking is accepted.
    pub fn check_booking(
        &self,
        date: NaiveDate,
        time: &str,
        blocked: &[BlockedDateRecord],
        bookings: &[Booking],
        now: DateTime<Utc>,
    ) -> Result<(), BookingRejection> {
        let result = self.resolve(date, blocked, bookings, now)?;
        match result.status {
            AvailabilityStatus::Closed => return Err(BookingRejection::Closed(date)),
            AvailabilityStatus::BlockedFull => return Err(BookingRejection::BlockedFullDay(date)),
            _ => {}
        }

        let entry = result
            .slots
            .iter()
            .find(|slot| same_slot(&slot.time, time))
            .ok_or_else(|| BookingRejection::NotOffered {
                date,
                time: time.to_string(),
            })?;

        let time = entry.time.clone();
        match entry.state {
            SlotState::Bookable => Ok(()),
            SlotState::Blocked => Err(BookingRejection::SlotBlocked { date, time }),
            SlotState::Booked => Err(BookingRejection::AlreadyBooked { date, time }),
            SlotState::InsideNoticeWindow => Err(BookingRejection::InsideNoticeWindow {
                date,
                time,
                cutoff: self.policy.cutoff(now),
            }),
        }
    }

    /// The instant a slot starts at, read in the business time zone.
    fn slot_instant(&self, date: NaiveDate, slot: &TimeSlot) -> Result<DateTime<Utc>, ResolveError> {
        let local = date.and_time(slot.time());
        let instant = match self.time_zone.from_local_datetime(&local) {
            LocalResult::Single(instant) => Some(instant),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            // Skipped by a forward transition. Read with the offset in force
            // before it, which is the same instant as one hour later on the
            // new offset.
            LocalResult::None => self
                .time_zone
                .from_local_datetime(&(local + Duration::hours(1)))
                .earliest(),
        };

        instant
            .map(|instant| instant.with_timezone(&Utc))
            .ok_or_else(|| ResolveError::UnrepresentableSlot {
                date,
                slot: slot.label().to_string(),
                zone: self.time_zone.name().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStatus;
    use crate::schedule::DaySchedule;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn schedule_with(weekday: Weekday, working: bool, slots: &[&str]) -> WeeklySchedule {
        let mut schedule = WeeklySchedule::default();
        schedule.set_day(weekday, DaySchedule::new(working, slots.iter().copied()).unwrap());
        schedule
    }

    fn partial(date: NaiveDate, slots: &[&str]) -> BlockedDateRecord {
        BlockedDateRecord::partial(
            date,
            None,
            slots.iter().map(|s| s.to_string()).collect(),
            at(2024, 1, 1, 0, 0),
        )
    }

    fn full(date: NaiveDate) -> BlockedDateRecord {
        BlockedDateRecord::full_day(date, None, at(2024, 1, 1, 0, 0))
    }

    // 2024-03-04 is a Monday.
    const MONDAY: (i32, u32, u32) = (2024, 3, 4);

    fn monday() -> NaiveDate {
        date(MONDAY.0, MONDAY.1, MONDAY.2)
    }

    fn long_ago() -> DateTime<Utc> {
        at(2024, 1, 1, 0, 0)
    }

    #[test]
    fn open_day_offers_every_slot() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00", "11:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let result = resolver.resolve(monday(), &[], &[], long_ago()).unwrap();
        assert_eq!(result.status, AvailabilityStatus::Open);
        assert_eq!(result.bookable_slots, vec!["10:00", "11:00"]);
        assert!(result.slots.iter().all(|s| s.state == SlotState::Bookable));
    }

    #[test]
    fn full_day_block_reports_every_slot_blocked() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00", "11:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let result = resolver
            .resolve(monday(), &[full(monday())], &[], long_ago())
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::BlockedFull);
        assert!(result.bookable_slots.is_empty());
        assert_eq!(result.slots.len(), 2);
        assert!(result.slots.iter().all(|s| s.state == SlotState::Blocked));
    }

    #[test]
    fn full_day_block_applies_to_empty_working_day() {
        let schedule = schedule_with(Weekday::Mon, true, &[]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let result = resolver
            .resolve(monday(), &[full(monday())], &[], long_ago())
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::BlockedFull);
    }

    #[test]
    fn records_for_other_dates_are_ignored() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let next_monday = date(2024, 3, 11);
        let bookings = [Booking::new(next_monday, "10:00", BookingStatus::Confirmed)];
        let result = resolver
            .resolve(monday(), &[full(next_monday)], &bookings, long_ago())
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::Open);
    }

    #[test]
    fn union_of_partial_blocks() {
        let schedule = schedule_with(Weekday::Mon, true, &["09:00", "10:00", "11:00", "12:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let blocks = [partial(monday(), &["09:00"]), partial(monday(), &["11:00", "12:00"])];
        let result = resolver.resolve(monday(), &blocks, &[], long_ago()).unwrap();
        assert_eq!(result.status, AvailabilityStatus::PartiallyBlocked);
        assert_eq!(result.bookable_slots, vec!["10:00"]);
    }

    #[test]
    fn cancelled_bookings_free_their_slot() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00", "11:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let bookings = [
            Booking::new(monday(), "10:00", BookingStatus::Cancelled),
            Booking::new(monday(), "11:00", BookingStatus::Pending),
        ];
        let result = resolver.resolve(monday(), &[], &bookings, long_ago()).unwrap();
        assert_eq!(result.bookable_slots, vec!["10:00"]);
        assert_eq!(result.slots[1].state, SlotState::Booked);
    }

    #[test]
    fn booking_labels_match_equivalent_spellings() {
        let schedule = schedule_with(Weekday::Mon, true, &["14:00", "15:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let bookings = [Booking::new(monday(), "2 PM", BookingStatus::Confirmed)];
        let result = resolver.resolve(monday(), &[], &bookings, long_ago()).unwrap();
        assert_eq!(result.bookable_slots, vec!["15:00"]);
    }

    #[test]
    fn everything_removed_is_fully_booked() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00", "11:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let bookings = [Booking::new(monday(), "11:00", BookingStatus::Confirmed)];
        let result = resolver
            .resolve(monday(), &[partial(monday(), &["10:00"])], &bookings, long_ago())
            .unwrap();
        assert_eq!(result.status, AvailabilityStatus::FullyBooked);
        assert_eq!(
            result.slots.iter().map(|s| s.state).collect::<Vec<_>>(),
            vec![SlotState::Blocked, SlotState::Booked]
        );
    }

    #[test]
    fn unbounded_notice_closes_every_slot() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00", "11:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(u32::MAX), Tz::UTC);
        let result = resolver.resolve(monday(), &[], &[], long_ago()).unwrap();
        assert_eq!(result.status, AvailabilityStatus::FullyBooked);
        assert!(result
            .slots
            .iter()
            .all(|slot| slot.state == SlotState::InsideNoticeWindow));
    }

    #[test]
    fn blocked_wins_over_booked_in_breakdown() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let bookings = [Booking::new(monday(), "10:00", BookingStatus::Confirmed)];
        let result = resolver
            .resolve(monday(), &[partial(monday(), &["10:00"])], &bookings, long_ago())
            .unwrap();
        assert_eq!(result.slots[0].state, SlotState::Blocked);
    }

    #[test]
    fn past_slots_fall_inside_zero_hour_window() {
        let schedule = schedule_with(Weekday::Mon, true, &["09:00", "10:00", "11:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let result = resolver
            .resolve(monday(), &[], &[], at(2024, 3, 4, 10, 0))
            .unwrap();
        // 10:00 sits exactly on the cutoff and stays bookable.
        assert_eq!(result.bookable_slots, vec!["10:00", "11:00"]);
        assert_eq!(result.slots[0].state, SlotState::InsideNoticeWindow);
    }

    #[test]
    fn cutoff_uses_business_time_zone() {
        let schedule = schedule_with(Weekday::Mon, true, &["09:00", "12:00"]);
        let resolver =
            AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), chrono_tz::Europe::Berlin);
        // 09:00 in Berlin on 4 March is 08:00 UTC.
        let result = resolver
            .resolve(monday(), &[], &[], at(2024, 3, 4, 8, 30))
            .unwrap();
        assert_eq!(result.bookable_slots, vec!["12:00"]);

        let result = resolver
            .resolve(monday(), &[], &[], at(2024, 3, 4, 7, 59))
            .unwrap();
        assert_eq!(result.bookable_slots, vec!["09:00", "12:00"]);
    }

    #[test]
    fn slot_in_dst_gap_uses_pre_transition_offset() {
        // Clocks in Berlin jumped from 02:00 to 03:00 on 31 March 2024 (a Sunday).
        let sunday = date(2024, 3, 31);
        let schedule = schedule_with(Weekday::Sun, true, &["02:30"]);
        let resolver =
            AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), chrono_tz::Europe::Berlin);
        let slot = TimeSlot::parse("02:30").unwrap();
        assert_eq!(resolver.slot_instant(sunday, &slot), Ok(at(2024, 3, 31, 1, 30)));
    }

    #[test]
    fn ambiguous_wall_clock_uses_earliest_instant() {
        // 02:30 happened twice in Berlin on 27 October 2024.
        let sunday = date(2024, 10, 27);
        let schedule = schedule_with(Weekday::Sun, true, &["02:30"]);
        let resolver =
            AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), chrono_tz::Europe::Berlin);
        let slot = TimeSlot::parse("02:30").unwrap();
        assert_eq!(resolver.slot_instant(sunday, &slot), Ok(at(2024, 10, 27, 0, 30)));
    }

    #[test]
    fn check_booking_reports_reasons() {
        let schedule = schedule_with(Weekday::Mon, true, &["09:00", "10:00", "11:00", "12:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(2), Tz::UTC);
        let blocks = [partial(monday(), &["10:00"])];
        let bookings = [Booking::new(monday(), "11:00", BookingStatus::Confirmed)];
        let now = at(2024, 3, 4, 8, 0);

        let check = |time: &str| resolver.check_booking(monday(), time, &blocks, &bookings, now);

        assert!(check("12:00").is_ok());
        assert!(check("12 PM").is_ok());
        assert!(matches!(check("09:00"), Err(BookingRejection::InsideNoticeWindow { cutoff, .. }) if cutoff == at(2024, 3, 4, 10, 0)));
        assert!(matches!(check("10:00"), Err(BookingRejection::SlotBlocked { .. })));
        assert!(matches!(check("11:00"), Err(BookingRejection::AlreadyBooked { .. })));
        assert!(matches!(check("13:00"), Err(BookingRejection::NotOffered { .. })));
    }

    #[test]
    fn check_booking_on_closed_and_blocked_days() {
        let schedule = schedule_with(Weekday::Mon, true, &["10:00"]);
        let resolver = AvailabilityResolver::new(&schedule, AdvancePolicy::new(0), Tz::UTC);
        let tuesday = date(2024, 3, 5);
        assert!(matches!(
            resolver.check_booking(tuesday, "10:00", &[], &[], long_ago()),
            Err(BookingRejection::Closed(d)) if d == tuesday
        ));
        assert!(matches!(
            resolver.check_booking(monday(), "10:00", &[full(monday())], &[], long_ago()),
            Err(BookingRejection::BlockedFullDay(_))
        ));
    }
}
