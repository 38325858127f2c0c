// src/pipeline/run.rs

//! One full pass: link → rows → day report → text.

use chrono::NaiveDate;

use super::aggregate::build_day_report;
use super::report::ReportFormatter;
use crate::error::Result;
use crate::locale;
use crate::models::{Config, DayReport, Row};
use crate::services::bulletin::extract_rows;
use crate::services::{BulletinExtractor, LinkResolver, Notifier, PageFetcher};

/// Everything a single run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Bulletin the rows came from
    pub source: String,
    /// Rows extracted before day filtering
    pub row_count: usize,
    pub report: DayReport,
    /// Rendered report text
    pub text: String,
}

/// Run the pipeline for `today`: at most two fetches, in order.
///
/// Any failure aborts the run and is tagged with the step that failed.
pub async fn run_once(
    fetcher: &dyn PageFetcher,
    config: &Config,
    today: NaiveDate,
) -> Result<RunOutcome> {
    let month = locale::month_name_for(today);
    log::info!("Looking up the {} bulletin", month);

    let link = LinkResolver::new(fetcher, config.source.base_url.as_str())
        .resolve(month)
        .await
        .map_err(|e| e.in_stage("resolve the bulletin link"))?;
    log::info!("Bulletin link: {}", link);

    let rows = BulletinExtractor::new(fetcher)
        .fetch_rows(&link)
        .await
        .map_err(|e| e.in_stage("extract bulletin rows"))?;

    Ok(finish(config, link, &rows, today))
}

/// Run the extraction and rendering steps over markup already on hand.
pub fn run_offline(
    markup: &str,
    source: &str,
    config: &Config,
    today: NaiveDate,
) -> Result<RunOutcome> {
    let rows = extract_rows(markup, source).map_err(|e| e.in_stage("extract bulletin rows"))?;
    Ok(finish(config, source.to_string(), &rows, today))
}

fn finish(config: &Config, source: String, rows: &[Row], today: NaiveDate) -> RunOutcome {
    let report = build_day_report(rows, today);
    log::info!(
        "{}: {} morning and {} afternoon camera(s)",
        today,
        report.morning.len(),
        report.afternoon.len()
    );

    let formatter = ReportFormatter::new(config.report.title.as_str());
    let text = formatter.render(&report, &config.watch_list());

    RunOutcome {
        source,
        row_count: rows.len(),
        report,
        text,
    }
}

/// Deliver a rendered report. A failure here leaves the outcome intact.
pub async fn deliver(
    notifier: &dyn Notifier,
    destination: &str,
    outcome: &RunOutcome,
) -> Result<()> {
    notifier
        .send(destination, &outcome.text)
        .await
        .map_err(|e| e.in_stage("deliver the report"))
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Speedcam;
    use crate::services::fetcher::testing::FakeFetcher;
    use crate::services::notifier::testing::RecordingNotifier;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn config(watch: &[&str]) -> Config {
        let mut config = Config::default();
        config.source.base_url = BASE_URL.to_string();
        config.watch.streets = watch.iter().map(|s| s.to_string()).collect();
        config
    }

    fn fetcher() -> FakeFetcher {
        FakeFetcher::new()
            .with_page(SEARCH_URL, 200, SEARCH_PAGE)
            .with_page(BULLETIN_URL, 200, BULLETIN_PAGE)
    }

    #[tokio::test]
    async fn test_end_to_end_flags_watched_street() {
        let fetcher = fetcher();
        let outcome = run_once(&fetcher, &config(&["Calle X"]), march(12))
            .await
            .unwrap();

        assert_eq!(fetcher.requests(), vec![SEARCH_URL, BULLETIN_URL]);
        assert_eq!(outcome.source, BULLETIN_URL);
        assert_eq!(outcome.row_count, 4);
        assert_eq!(outcome.report.morning, vec![Speedcam::new("Calle X", 30)]);
        assert!(outcome.report.afternoon.is_empty());

        let stars = "*".repeat(31);
        let expected = format!(
            "{stars}\n\
             * LEÓN SPEEDCAMS (12/03/2024) *\n\
             {stars}\n\
             \n\
             Morning:\n\
             \t- ⚠️ <strong> Calle X: 30 km/h </strong> ⚠️\n\
             \n\
             Afternoon:\n"
        );
        assert_eq!(outcome.text, expected);
    }

    #[tokio::test]
    async fn test_inherited_day_reaches_afternoon() {
        let outcome = run_once(&fetcher(), &config(&[]), march(11)).await.unwrap();

        assert_eq!(outcome.report.morning, vec![Speedcam::new("Avenida Real", 50)]);
        assert_eq!(outcome.report.afternoon, vec![Speedcam::new("Padre Isla", 40)]);
    }

    #[tokio::test]
    async fn test_identical_markup_gives_identical_reports() {
        let config = config(&["Ordoño"]);
        let first = run_once(&fetcher(), &config, march(13)).await.unwrap();
        let second = run_once(&fetcher(), &config, march(13)).await.unwrap();

        assert_eq!(first.text, second.text);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_day_without_cameras_is_success() {
        let outcome = run_once(&fetcher(), &config(&[]), march(20)).await.unwrap();
        assert!(outcome.report.is_empty());
        assert!(outcome.text.ends_with("Morning:\n\nAfternoon:\n"));
    }

    #[tokio::test]
    async fn test_missing_link_aborts_before_second_fetch() {
        let fetcher = FakeFetcher::new().with_page(SEARCH_URL, 200, "<p>Sin resultados</p>");

        let err = run_once(&fetcher, &config(&[]), march(12)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::LinkNotFound);
        assert_eq!(err.to_string(), "Failed to resolve the bulletin link");
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_bulletin_status_error() {
        let fetcher = FakeFetcher::new()
            .with_page(SEARCH_URL, 200, SEARCH_PAGE)
            .with_page(BULLETIN_URL, 503, "maintenance");

        let err = run_once(&fetcher, &config(&[]), march(12)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::HttpStatus);
        assert_eq!(err.to_string(), "Failed to extract bulletin rows");
    }

    #[tokio::test]
    async fn test_bulletin_transport_error() {
        let fetcher = FakeFetcher::new().with_page(SEARCH_URL, 200, SEARCH_PAGE);
        let err = run_once(&fetcher, &config(&[]), march(12)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_run_offline() {
        let outcome = run_offline(BULLETIN_PAGE, "saved.html", &config(&[]), march(13)).unwrap();

        assert_eq!(outcome.source, "saved.html");
        assert_eq!(
            outcome.report.afternoon,
            vec![Speedcam::new("Calle Ancha", 30), Speedcam::new("Ordoño II", 50)]
        );
    }

    #[tokio::test]
    async fn test_deliver_failure_keeps_outcome() {
        let outcome = run_once(&fetcher(), &config(&[]), march(12)).await.unwrap();
        let notifier = RecordingNotifier::failing();

        let err = deliver(&notifier, "chat", &outcome).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Notify);
        assert_eq!(outcome.report.morning.len(), 1);
    }

    #[tokio::test]
    async fn test_deliver_sends_text() {
        let outcome = run_once(&fetcher(), &config(&[]), march(12)).await.unwrap();
        let notifier = RecordingNotifier::default();

        deliver(&notifier, "-100", &outcome).await.unwrap();

        assert_eq!(notifier.sent(), vec![("-100".to_string(), outcome.text.clone())]);
    }
}
