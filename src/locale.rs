// src/locale.rs

//! Spanish month names and shift labels used by the bulletin source.

use chrono::{Datelike, Month, NaiveDate};

use crate::models::Shift;

/// Month names indexed by `month0` (January is 0).
pub const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Word that starts every day heading in the free-text layout ("Día 5").
pub const DAY_LABEL: &str = "Día";

/// Shift label used in table cells.
pub const MORNING_LABEL: &str = "mañana";
pub const AFTERNOON_LABEL: &str = "tarde";

/// Shift markers splitting a free-text paragraph.
pub const MORNING_MARKER: &str = "Mañana:";
pub const AFTERNOON_MARKER: &str = "Tarde:";

/// Source name for a calendar month.
pub fn month_name(month: Month) -> &'static str {
    MONTH_NAMES[month.number_from_month() as usize - 1]
}

/// Source name for the month a date falls in.
pub fn month_name_for(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Map a table shift label to a [`Shift`], ignoring case and padding.
pub fn shift_from_label(label: &str) -> Option<Shift> {
    let label = label.trim().to_lowercase();
    if label == MORNING_LABEL {
        Some(Shift::Morning)
    } else if label == AFTERNOON_LABEL {
        Some(Shift::Afternoon)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(month: u8) -> &'static str {
        month_name(Month::try_from(month).unwrap())
    }

    #[test]
    fn test_month_name_january() {
        assert_eq!(name_of(1), "enero");
    }

    #[test]
    fn test_month_name_february() {
        assert_eq!(name_of(2), "febrero");
    }

    #[test]
    fn test_month_name_march() {
        assert_eq!(name_of(3), "marzo");
    }

    #[test]
    fn test_month_name_april() {
        assert_eq!(name_of(4), "abril");
    }

    #[test]
    fn test_month_name_may() {
        assert_eq!(name_of(5), "mayo");
    }

    #[test]
    fn test_month_name_june() {
        assert_eq!(name_of(6), "junio");
    }

    #[test]
    fn test_month_name_july() {
        assert_eq!(name_of(7), "julio");
    }

    #[test]
    fn test_month_name_august() {
        assert_eq!(name_of(8), "agosto");
    }

    #[test]
    fn test_month_name_september() {
        assert_eq!(name_of(9), "septiembre");
    }

    #[test]
    fn test_month_name_october() {
        assert_eq!(name_of(10), "octubre");
    }

    #[test]
    fn test_month_name_november() {
        assert_eq!(name_of(11), "noviembre");
    }

    #[test]
    fn test_month_name_december() {
        assert_eq!(name_of(12), "diciembre");
    }

    #[test]
    fn test_month_name_for_date_matches_month() {
        for month in 1..=12u32 {
            let date = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
            assert_eq!(month_name_for(date), name_of(month as u8));
        }
    }

    #[test]
    fn test_shift_from_label() {
        assert_eq!(shift_from_label("mañana"), Some(Shift::Morning));
        assert_eq!(shift_from_label("  Tarde \n"), Some(Shift::Afternoon));
        assert_eq!(shift_from_label("noche"), None);
        assert_eq!(shift_from_label(""), None);
    }
}
