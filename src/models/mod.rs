// src/models/mod.rs

//! Domain models for the speedcams pipeline.
//!
//! Every value here is created fresh per run and dropped once the report
//! has been emitted.

mod config;
mod report;
mod row;
mod speedcam;

// Re-export all public types
pub use config::{
    Config, LoggingConfig, ReportConfig, ScheduleConfig, SourceConfig, TelegramConfig,
    WatchConfig,
};
pub use report::DayReport;
pub use row::{MalformedRow, Row, Shift};
pub use speedcam::{Speedcam, WatchList};
