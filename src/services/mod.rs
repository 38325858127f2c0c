//! Service layer for the speedcams pipeline.
//!
//! This module contains the components that talk to the outside world or
//! read its markup:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Bulletin link lookup (`LinkResolver`)
//! - Row extraction for both bulletin layouts (`BulletinExtractor`)
//! - Report delivery (`Notifier`, `TelegramNotifier`, `ConsoleNotifier`)

pub mod bulletin;
pub mod fetcher;
pub mod links;
pub mod notifier;

pub use bulletin::{BulletinExtractor, Layout};
pub use fetcher::{HttpFetcher, Page, PageFetcher};
pub use links::LinkResolver;
pub use notifier::{ConsoleNotifier, Notifier, TelegramNotifier};
