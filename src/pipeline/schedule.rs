// src/pipeline/schedule.rs

//! Repeated pipeline runs on a fixed interval.
//!
//! Each tick is an independent [`run_once`]; a failed tick is logged and the
//! next one starts from scratch. The only thing carried between ticks is the
//! digest of the last delivered report, so an unchanged report is not re-sent.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use sha2::{Digest, Sha256};
use tokio::time::MissedTickBehavior;

use super::run::{deliver, run_once};
use crate::error::Result;
use crate::models::Config;
use crate::services::{Notifier, PageFetcher};

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new report was delivered
    Delivered { digest: String },
    /// The report matched the last delivered one
    Unchanged,
}

/// Hex SHA-256 of a rendered report.
pub fn report_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Drives scheduled runs against one fetcher and one delivery channel.
pub struct Scheduler<'a> {
    fetcher: &'a dyn PageFetcher,
    notifier: &'a dyn Notifier,
    destination: String,
    config: &'a Config,
    last_digest: Option<String>,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        notifier: &'a dyn Notifier,
        destination: impl Into<String>,
        config: &'a Config,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            destination: destination.into(),
            config,
            last_digest: None,
        }
    }

    /// Run the pipeline once for `today` and deliver the report if it changed.
    ///
    /// The digest is only remembered after a successful delivery, so a failed
    /// send is retried on the next tick.
    pub async fn tick(&mut self, today: NaiveDate) -> Result<TickOutcome> {
        let outcome = run_once(self.fetcher, self.config, today).await?;
        let digest = report_digest(&outcome.text);

        if self.last_digest.as_deref() == Some(digest.as_str()) {
            log::info!("Report for {} unchanged, not re-sending", today);
            return Ok(TickOutcome::Unchanged);
        }

        deliver(self.notifier, &self.destination, &outcome).await?;
        self.last_digest = Some(digest.clone());
        Ok(TickOutcome::Delivered { digest })
    }

    /// Tick every `schedule.interval_secs` until Ctrl-C.
    ///
    /// Ctrl-C during a tick drops the in-flight run along with any rows it
    /// had parsed.
    pub async fn run(&mut self) -> Result<()> {
        let period = Duration::from_secs(self.config.schedule.interval_secs);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Running every {}s, Ctrl-C to stop", period.as_secs());

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Stopping scheduler");
                    return Ok(());
                }
            }

            let today = Local::now().date_naive();
            tokio::select! {
                result = self.tick(today) => match result {
                    Ok(TickOutcome::Delivered { digest }) => {
                        log::info!("Delivered report {}", &digest[..12]);
                    }
                    Ok(TickOutcome::Unchanged) => {}
                    Err(e) => log::error!("Scheduled run failed: {}", error_chain(&e)),
                },
                _ = tokio::signal::ctrl_c() => {
                    log::warn!("Interrupted, abandoning the in-flight run");
                    return Ok(());
                }
            }
        }
    }
}

/// `outer: inner: innermost`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
