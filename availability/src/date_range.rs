use chrono::NaiveDate;

/// Every date from `start` through `end`, both included.
/// Empty when `end` is before `start`.
pub fn expand(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}

/// Number of days `expand` would produce.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> u64 {
    if end < start {
        return 0;
    }
    (end - start).num_days().unsigned_abs() + 1
}
