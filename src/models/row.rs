// src/models/row.rs

//! Parsed bulletin rows before day filtering.

use serde::Serialize;
use thiserror::Error;

use super::Speedcam;

/// Half-day window in which a camera is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
}

/// A recoverable problem local to one row or one field of a row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRow {
    #[error("invalid day token '{0}'")]
    InvalidDay(String),

    #[error("invalid speed limit token '{0}'")]
    InvalidSpeedLimit(String),

    #[error("unknown shift label '{0}'")]
    UnknownShift(String),

    #[error("expected {expected} cells, found {found}")]
    MissingCells { expected: usize, found: usize },

    #[error("{streets} street(s) but {limits} speed limit(s)")]
    LengthMismatch { streets: usize, limits: usize },
}

/// One parsed source entry.
///
/// `streets` and `speed_limits` always have the same length; construction
/// through [`Row::new`] refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    day: Option<u32>,
    shift: Option<Shift>,
    streets: Vec<String>,
    speed_limits: Vec<u32>,
}

impl Row {
    /// Build a row, rejecting mismatched street/limit sequences.
    pub fn new(
        day: Option<u32>,
        shift: Option<Shift>,
        streets: Vec<String>,
        speed_limits: Vec<u32>,
    ) -> Result<Self, MalformedRow> {
        if streets.len() != speed_limits.len() {
            return Err(MalformedRow::LengthMismatch {
                streets: streets.len(),
                limits: speed_limits.len(),
            });
        }
        Ok(Self {
            day,
            shift,
            streets,
            speed_limits,
        })
    }

    /// Day of month, `None` when the source token was unusable.
    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Shift, `None` when the source label was not recognized.
    pub fn shift(&self) -> Option<Shift> {
        self.shift
    }

    pub fn streets(&self) -> &[String] {
        &self.streets
    }

    pub fn speed_limits(&self) -> &[u32] {
        &self.speed_limits
    }

    pub fn len(&self) -> usize {
        self.streets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }

    /// Street/limit pairs in index order.
    pub fn speedcams(&self) -> impl Iterator<Item = Speedcam> + '_ {
        self.streets
            .iter()
            .zip(&self.speed_limits)
            .map(|(street, &limit)| Speedcam::new(street.clone(), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Row::new(
            Some(4),
            Some(Shift::Morning),
            vec!["Calle A".into(), "Calle B".into()],
            vec![30, 40, 50],
        )
        .unwrap_err();

        assert_eq!(
            err,
            MalformedRow::LengthMismatch {
                streets: 2,
                limits: 3
            }
        );
    }

    #[test]
    fn test_speedcams_zip_in_order() {
        let row = Row::new(
            Some(1),
            Some(Shift::Afternoon),
            vec!["Calle A".into(), "Calle B".into()],
            vec![30, 50],
        )
        .unwrap();

        let cams: Vec<_> = row.speedcams().collect();
        assert_eq!(
            cams,
            vec![Speedcam::new("Calle A", 30), Speedcam::new("Calle B", 50)]
        );
    }

    #[test]
    fn test_empty_row_is_valid() {
        let row = Row::new(Some(2), Some(Shift::Morning), vec![], vec![]).unwrap();
        assert!(row.is_empty());
        assert_eq!(row.speedcams().count(), 0);
    }
}
