//! Booking availability for a weekly schedule with blocked dates.
//!
//! Everything here is synchronous and free of I/O. Callers pass the
//! settings, blocked-date records, bookings and the current instant
//! explicitly.

pub mod blocked;
pub mod booking;
pub mod calendar;
pub mod date_range;
pub mod policy;
pub mod resolver;
pub mod schedule;
pub mod slot;
pub mod wire;

pub use blocked::{block_stats, BlockKind, BlockedDateRecord, BlockedDateRegistry, RegistryError};
pub use booking::{Booking, BookingRejection, BookingStatus};
pub use calendar::{build_month_grid, CalendarError, MonthGrid};
pub use policy::{AdvancePolicy, BookingSettings};
pub use resolver::{AvailabilityResolver, AvailabilityResult, ResolveError, SlotAvailability};
pub use schedule::{DaySchedule, ScheduleError, TimeSlot, WeeklySchedule};
pub use shared_types::{AvailabilityStatus, BlockStats, SlotState};
pub use slot::{parse_slot_time, SlotError};
pub use wire::WireError;
