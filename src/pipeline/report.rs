// src/pipeline/report.rs

//! Text rendering of a [`DayReport`].

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{DayReport, Speedcam, WatchList};

/// Renders day reports with a framed banner and one section per shift.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    title: String,
}

impl ReportFormatter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Render the report. Output depends only on the arguments.
    pub fn render(&self, report: &DayReport, watch_list: &WatchList) -> String {
        let mut out = String::new();

        let title_line = format!("* {} ({}) *", self.title, report.date.format("%d/%m/%Y"));
        let border = "*".repeat(title_line.graphemes(true).count());

        out.push_str(&format!("{border}\n{title_line}\n{border}\n\n"));

        out.push_str("Morning:\n");
        write_section(&mut out, &report.morning, watch_list);
        out.push('\n');

        out.push_str("Afternoon:\n");
        write_section(&mut out, &report.afternoon, watch_list);

        out
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new("LEÓN SPEEDCAMS")
    }
}

fn write_section(out: &mut String, cams: &[Speedcam], watch_list: &WatchList) {
    for cam in cams {
        out.push_str(&format!("\t- {}\n", format_speedcam(cam, watch_list)));
    }
}

/// One entry; watched streets get the highlighted form.
pub fn format_speedcam(cam: &Speedcam, watch_list: &WatchList) -> String {
    if cam.is_monitored(watch_list) {
        format!("⚠️ <strong> {cam} </strong> ⚠️")
    } else {
        cam.to_string()
    }
}
