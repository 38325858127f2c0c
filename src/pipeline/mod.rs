//! Pipeline entry points.
//!
//! - `run_once`: resolve the bulletin link, extract rows, build today's report
//! - `run_offline`: the same over a saved bulletin page
//! - `Scheduler`: repeated runs with delivery

pub mod aggregate;
pub mod report;
pub mod run;
pub mod schedule;

pub use aggregate::{build_day_report, filter_rows_by_day};
pub use report::{ReportFormatter, format_speedcam};
pub use run::{RunOutcome, deliver, run_offline, run_once};
pub use schedule::{Scheduler, TickOutcome, error_chain, report_digest};
