// src/pipeline/aggregate.rs

//! Day filtering and shift aggregation.

use chrono::{Datelike, NaiveDate};

use crate::models::{DayReport, Row, Shift};

/// Rows whose day equals `day`, in input order.
pub fn filter_rows_by_day(rows: &[Row], day: u32) -> Vec<&Row> {
    rows.iter().filter(|row| row.day() == Some(day)).collect()
}

/// Fold the rows for `date` into a [`DayReport`].
///
/// Cameras keep row-then-index order within each shift. Rows without a
/// recognized shift are skipped.
pub fn build_day_report(rows: &[Row], date: NaiveDate) -> DayReport {
    let mut report = DayReport::empty(date);

    for row in filter_rows_by_day(rows, date.day()) {
        match row.shift() {
            Some(Shift::Morning) => report.morning.extend(row.speedcams()),
            Some(Shift::Afternoon) => report.afternoon.extend(row.speedcams()),
            None => log::warn!(
                "Skipping day {} row with no recognized shift ({} camera(s))",
                date.day(),
                row.len()
            ),
        }
    }

    report
}
