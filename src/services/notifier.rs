// src/services/notifier.rs

//! Outbound delivery of rendered reports.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;

/// Trait for report delivery channels.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `message` to `destination` (a channel-specific identifier).
    async fn send(&self, destination: &str, message: &str) -> Result<()>;
}

/// Telegram Bot API response envelope.
#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API with HTML formatting.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: &TelegramConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint())
            .form(&[
                ("chat_id", destination),
                ("text", message),
                ("parse_mode", "HTML"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::notify(format!("request to Telegram failed: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                AppError::notify(format!(
                    "reading Telegram response failed: {}",
                    e.without_url()
                ))
            })?;

        check_response(status.as_u16(), &body)
    }
}

/// Writes reports to standard output. The destination is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, _destination: &str, message: &str) -> Result<()> {
        println!("{message}");
        Ok(())
    }
}

/// Interpret a Bot API reply. The token is part of the URL, so it never
/// appears in these messages.
fn check_response(status: u16, body: &str) -> Result<()> {
    let parsed: Option<BotResponse> = serde_json::from_str(body).ok();

    match parsed {
        Some(BotResponse { ok: true, .. }) if (200..300).contains(&status) => Ok(()),
        Some(BotResponse { description, .. }) => Err(AppError::notify(format!(
            "Telegram rejected the message (status {}): {}",
            status,
            description.unwrap_or_else(|| "no description".to_string())
        ))),
        None => Err(AppError::notify(format!(
            "Telegram returned status {} with an unreadable body",
            status
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records deliveries; optionally fails every send.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, destination: &str, message: &str) -> Result<()> {
            if self.fail {
                return Err(AppError::notify("channel unavailable"));
            }
            self.sent
                .lock()
                .unwrap()
                .push((destination.to_string(), message.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_endpoint() {
        let config = TelegramConfig {
            token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            api_base: "https://api.telegram.org/".to_string(),
        };
        let notifier = TelegramNotifier::new(Client::new(), &config);
        assert_eq!(
            notifier.endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_check_response_ok() {
        assert!(check_response(200, r#"{"ok":true,"result":{}}"#).is_ok());
    }

    #[test]
    fn test_check_response_rejected() {
        let err = check_response(
            400,
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Notify);
        assert!(err.to_string().contains("chat not found"));
    }

    #[test]
    fn test_check_response_garbage() {
        let err = check_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().contains("502"));
    }
}
