// src/services/bulletin.rs

//! Bulletin row extraction.
//!
//! The source has published the monthly bulletin in two shapes:
//!
//! - **Tabular**: one `<table>` whose rows are `day | shift | streets | limits`,
//!   with multi-valued cells broken over lines.
//! - **Free text**: a `Día N` heading per day, followed by one paragraph such as
//!   `Mañana: Calle A (30), Calle B (50) Tarde: Calle C (40)`.
//!
//! [`classify`] picks the layout from the document structure and both parsers
//! produce the same [`Row`] values. Problems local to a row are logged and the
//! offending field or row is dropped; they never fail the extraction.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use super::fetcher::PageFetcher;
use crate::error::{AppError, Result};
use crate::locale::{self, AFTERNOON_MARKER, DAY_LABEL, MORNING_MARKER};
use crate::models::{MalformedRow, Row, Shift};
use crate::utils::{clean_cell, normalize_whitespace};

/// `<street name> (<limit>)`
static ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*?)\s*\((\d+)\)").expect("entry pattern is valid"));

/// Cells per bulletin table row: day, shift, streets, limits.
const TABLE_CELLS: usize = 4;

/// Markup shape of a bulletin page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Tabular,
    FreeText,
}

/// Fetches bulletin pages and turns them into rows.
pub struct BulletinExtractor<'a> {
    fetcher: &'a dyn PageFetcher,
}

impl<'a> BulletinExtractor<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch `link` and extract every row on the page.
    pub async fn fetch_rows(&self, link: &str) -> Result<Vec<Row>> {
        let page = self.fetcher.fetch(link).await?.ensure_success()?;
        extract_rows(&page.body, &page.url)
    }
}

/// Extract rows from raw bulletin markup.
///
/// An empty body is a parse error. A readable page with no rows is not.
pub fn extract_rows(markup: &str, context: &str) -> Result<Vec<Row>> {
    if markup.trim().is_empty() {
        return Err(AppError::parse(context, "empty bulletin page"));
    }

    let document = Html::parse_document(markup);
    let layout = classify(&document)?;
    log::debug!("Bulletin {} uses the {:?} layout", context, layout);

    let rows = match layout {
        Layout::Tabular => parse_tabular(&document)?,
        Layout::FreeText => parse_free_text(&document)?,
    };

    log::info!("Extracted {} row(s) from {}", rows.len(), context);
    Ok(rows)
}

/// Tabular when some table has a row of at least four data cells whose second
/// cell is a shift label.
pub fn classify(document: &Html) -> Result<Layout> {
    let table_sel = parse_selector("table")?;
    let selectors = TableSelectors::new()?;

    let tabular = document
        .select(&table_sel)
        .any(|table| selectors.is_bulletin_table(&table));

    Ok(if tabular {
        Layout::Tabular
    } else {
        Layout::FreeText
    })
}

// --- Tabular layout ---

struct TableSelectors {
    tr: Selector,
    td: Selector,
}

impl TableSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            tr: parse_selector("tr")?,
            td: parse_selector("td")?,
        })
    }

    /// At least one row with four cells and a known shift label in the second.
    /// Calendar widgets and other layout tables fail the label check.
    fn is_bulletin_table(&self, table: &ElementRef) -> bool {
        table.select(&self.tr).any(|tr| {
            let cells: Vec<ElementRef> = tr.select(&self.td).collect();
            cells.len() >= TABLE_CELLS && parse_shift(&element_text(&cells[1])).is_ok()
        })
    }
}

/// Parse every bulletin table, skipping each table's header row.
///
/// An empty day cell repeats the day of the last row that was kept, which is
/// how the source writes the afternoon shift of a day.
pub fn parse_tabular(document: &Html) -> Result<Vec<Row>> {
    let table_sel = parse_selector("table")?;
    let selectors = TableSelectors::new()?;

    let mut rows = Vec::new();
    let mut last_day = None;

    for table in document.select(&table_sel) {
        if !selectors.is_bulletin_table(&table) {
            continue;
        }

        for (index, tr) in table.select(&selectors.tr).enumerate().skip(1) {
            let cells: Vec<ElementRef> = tr.select(&selectors.td).collect();
            match build_table_row(&cells, last_day) {
                Ok(row) => {
                    last_day = row.day();
                    rows.push(row);
                }
                Err(issue) => log::warn!("Dropping table row {}: {}", index, issue),
            }
        }
    }

    Ok(rows)
}

fn build_table_row(
    cells: &[ElementRef],
    last_day: Option<u32>,
) -> std::result::Result<Row, MalformedRow> {
    let [day_cell, shift_cell, streets_cell, limits_cell, ..] = cells else {
        return Err(MalformedRow::MissingCells {
            expected: TABLE_CELLS,
            found: cells.len(),
        });
    };

    let day = match parse_day_cell(&element_text(day_cell)) {
        Ok(Some(day)) => Some(day),
        Ok(None) => last_day,
        Err(issue) => {
            log::warn!("{}; row kept without a day", issue);
            None
        }
    };

    let shift = match parse_shift(&element_text(shift_cell)) {
        Ok(shift) => Some(shift),
        Err(issue) => {
            log::warn!("{}; row will not be aggregated", issue);
            None
        }
    };

    let streets = cell_lines(streets_cell);
    let speed_limits = cell_lines(limits_cell)
        .iter()
        .filter_map(|token| match parse_speed_limit(token) {
            Ok(limit) => Some(limit),
            Err(issue) => {
                log::warn!("{}; value skipped", issue);
                None
            }
        })
        .collect();

    Row::new(day, shift, streets, speed_limits)
}

/// `Ok(None)` for an empty cell, `Ok(Some(day))` for a day number.
fn parse_day_cell(text: &str) -> std::result::Result<Option<u32>, MalformedRow> {
    let token = clean_cell(text);
    if token.is_empty() {
        return Ok(None);
    }
    parse_day_token(&token).map(Some)
}

fn parse_day_token(token: &str) -> std::result::Result<u32, MalformedRow> {
    match token.parse::<u32>() {
        Ok(day) if (1..=31).contains(&day) => Ok(day),
        _ => Err(MalformedRow::InvalidDay(token.to_string())),
    }
}

fn parse_shift(text: &str) -> std::result::Result<Shift, MalformedRow> {
    let label = clean_cell(text);
    locale::shift_from_label(&label).ok_or(MalformedRow::UnknownShift(label))
}

fn parse_speed_limit(token: &str) -> std::result::Result<u32, MalformedRow> {
    match token.parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(MalformedRow::InvalidSpeedLimit(token.to_string())),
    }
}

/// Non-empty lines of a cell. `<br>` and block children count as line breaks.
fn cell_lines(cell: &ElementRef) -> Vec<String> {
    let mut text = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if matches!(e.name(), "br" | "p" | "div" | "li") => text.push('\n'),
            _ => {}
        }
    }

    text.split('\n')
        .map(|line| normalize_whitespace(&clean_cell(line)))
        .filter(|line| !line.is_empty())
        .collect()
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect()
}

// --- Free-text layout ---

/// Parse `Día N` headings and the paragraph that follows each one.
pub fn parse_free_text(document: &Html) -> Result<Vec<Row>> {
    let heading_sel = parse_selector("h1, h2, h3, h4, h5, h6")?;
    let mut rows = Vec::new();

    for heading in document.select(&heading_sel) {
        let title = normalize_whitespace(&clean_cell(&element_text(&heading)));
        let Some(day) = parse_day_heading(&title) else {
            continue;
        };

        let Some(paragraph) = heading.next_siblings().find_map(ElementRef::wrap) else {
            log::debug!("Heading '{}' has no following element", title);
            continue;
        };
        if paragraph.value().name() != "p" {
            log::debug!(
                "Heading '{}' is followed by <{}>, not a paragraph",
                title,
                paragraph.value().name()
            );
            continue;
        }

        rows.extend(parse_day_paragraph(day, &element_text(&paragraph)));
    }

    Ok(rows)
}

/// Day number from a heading like `Día 12`, `None` for any other heading.
fn parse_day_heading(title: &str) -> Option<u32> {
    if !title.to_lowercase().starts_with(&DAY_LABEL.to_lowercase()) {
        return None;
    }

    let token = title
        .split_whitespace()
        .nth(1)?
        .trim_end_matches(|c: char| !c.is_ascii_digit());

    match parse_day_token(token) {
        Ok(day) => Some(day),
        Err(issue) => {
            log::debug!("Skipping heading '{}': {}", title, issue);
            None
        }
    }
}

/// Rows for one day's paragraph. A shift with no parsable entries yields no row.
pub fn parse_day_paragraph(day: u32, text: &str) -> Vec<Row> {
    let (morning, afternoon) = split_shifts(text);
    let mut rows = Vec::new();

    for (shift, segment) in [(Shift::Morning, morning), (Shift::Afternoon, afternoon)] {
        let Some(segment) = segment else {
            continue;
        };

        let (streets, limits) = parse_entries(segment);
        if streets.is_empty() {
            continue;
        }

        match Row::new(Some(day), Some(shift), streets, limits) {
            Ok(row) => rows.push(row),
            Err(issue) => log::warn!("Dropping day {} {:?} row: {}", day, shift, issue),
        }
    }

    rows
}

/// Split at the first afternoon marker. Without one, the whole text goes to
/// whichever shift is mentioned.
fn split_shifts(text: &str) -> (Option<&str>, Option<&str>) {
    if let Some(index) = text.find(AFTERNOON_MARKER) {
        return (Some(&text[..index]), Some(&text[index..]));
    }

    let morning_word = MORNING_MARKER.trim_end_matches(':');
    let afternoon_word = AFTERNOON_MARKER.trim_end_matches(':');
    if text.contains(morning_word) {
        (Some(text), None)
    } else if text.contains(afternoon_word) {
        (None, Some(text))
    } else {
        (None, None)
    }
}

/// Comma-separated `name (limit)` entries. Anything else is noise and skipped.
fn parse_entries(segment: &str) -> (Vec<String>, Vec<u32>) {
    let text = segment
        .replace(MORNING_MARKER, "")
        .replace(AFTERNOON_MARKER, "");

    let mut streets = Vec::new();
    let mut limits = Vec::new();

    for part in text.split(',') {
        let Some(caps) = ENTRY_PATTERN.captures(part.trim()) else {
            continue;
        };
        let street = normalize_whitespace(&clean_cell(&caps[1]));
        let Ok(limit) = parse_speed_limit(&caps[2]) else {
            continue;
        };
        if street.is_empty() {
            continue;
        }
        streets.push(street);
        limits.push(limit);
    }

    (streets, limits)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
