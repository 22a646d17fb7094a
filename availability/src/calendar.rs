//! Month grids for date pickers and the booking calendar.
//!
//! Weeks start on Monday. Cells before the 1st are blanks so the first
//! day lands under its own weekday column.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("month {0} is out of range 1..=12")]
    InvalidMonth(u32),
    #[error("{year}-{month:02} is outside the supported calendar range")]
    OutOfRange { year: i32, month: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    cells: Vec<Option<u32>>,
}

impl MonthGrid {
    /// Leading blanks followed by `1..=days_in_month`.
    pub fn cells(&self) -> &[Option<u32>] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Option<u32>> {
        self.cells
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|cell| cell.is_none()).count()
    }

    pub fn days_in_month(&self) -> usize {
        self.cells.len() - self.leading_blanks()
    }

    /// Rows of seven, the last one padded with blanks.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        self.cells
            .chunks(7)
            .map(|chunk| {
                let mut week = [None; 7];
                week[..chunk.len()].copy_from_slice(chunk);
                week
            })
            .collect()
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

/// Length of a month, taken as day 0 of the following month.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let last = first_of_month(next_year, next_month)?
        .pred_opt()
        .ok_or(CalendarError::OutOfRange { year, month })?;
    Ok(last.day())
}

pub fn build_month_grid(year: i32, month: u32) -> Result<MonthGrid, CalendarError> {
    let first = first_of_month(year, month)?;
    let total_days = days_in_month(year, month)?;
    let sunday_first = first.weekday().num_days_from_sunday();
    let leading = ((sunday_first + 6) % 7) as usize;

    let mut cells = Vec::with_capacity(leading + total_days as usize);
    cells.resize(leading, None);
    cells.extend((1..=total_days).map(Some));

    Ok(MonthGrid { year, month, cells })
}

/// Move `offset` months forward (or back, when negative).
pub fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + offset;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::OutOfRange { year, month })
}
