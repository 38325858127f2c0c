//! Day-scoped aggregate of active cameras.

use chrono::NaiveDate;
use serde::Serialize;

use super::Speedcam;

/// Cameras active on one calendar date, split by shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub morning: Vec<Speedcam>,
    pub afternoon: Vec<Speedcam>,
}

impl DayReport {
    /// An empty report for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            morning: Vec::new(),
            afternoon: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty()
    }
}
