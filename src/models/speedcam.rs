//! Street/limit pairs and the watch list used to flag them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One active camera: a street and its speed limit in km/h.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Speedcam {
    pub street: String,
    pub speed_limit: u32,
}

impl Speedcam {
    pub fn new(street: impl Into<String>, speed_limit: u32) -> Self {
        Self {
            street: street.into(),
            speed_limit,
        }
    }

    /// Whether the street contains any watched name.
    pub fn is_monitored(&self, watch_list: &WatchList) -> bool {
        watch_list.matches(&self.street)
    }
}

impl fmt::Display for Speedcam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} km/h", self.street, self.speed_limit)
    }
}

/// Street-name substrings that should be flagged in the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchList(Vec<String>);

impl WatchList {
    pub fn new<I, S>(streets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(streets.into_iter().map(Into::into).collect())
    }

    /// Case-sensitive substring match against every entry.
    pub fn matches(&self, street: &str) -> bool {
        self.0.iter().any(|watched| street.contains(watched.as_str()))
    }
}
