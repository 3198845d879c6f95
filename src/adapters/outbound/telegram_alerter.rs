//! Telegram Alerter
//!
//! Delivers run outcomes through the Bot API `sendMessage` call. The
//! scheduler treats delivery as best-effort; this adapter only reports
//! whether Telegram accepted the message.

use crate::domain::errors::AlertError;
use crate::domain::ports::Alerter;
use async_trait::async_trait;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Per-call deadline; a slow Telegram API must not stall the loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramAlerter {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: i64,
}

impl TelegramAlerter {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self::with_api_base(API_BASE, token, chat_id)
    }

    /// Override the API host (tests).
    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            token: token.into(),
            chat_id,
        }
    }
}

#[async_trait]
impl Alerter for TelegramAlerter {
    async fn notify(&self, message: &str, parse_mode: Option<&str>) -> Result<(), AlertError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let mut body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
        });
        if let Some(mode) = parse_mode {
            body["parse_mode"] = serde_json::Value::from(mode);
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AlertError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError(format!(
                "telegram API returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_notify_posts_chat_id_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": 42,
                "text": "Backup succeeded",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let alerter = TelegramAlerter::with_api_base(server.uri(), "123:abc", 42);
        alerter.notify("Backup succeeded", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_includes_parse_mode_when_set() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "parse_mode": "MarkdownV2",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let alerter = TelegramAlerter::with_api_base(server.uri(), "123:abc", 42);
        alerter.notify("*bold*", Some("MarkdownV2")).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_rejection_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"ok":false,"description":"chat not found"}"#),
            )
            .mount(&server)
            .await;

        let alerter = TelegramAlerter::with_api_base(server.uri(), "123:abc", 42);
        let err = alerter.notify("msg", None).await.unwrap_err();
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("chat not found"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_error() {
        let alerter = TelegramAlerter::with_api_base("http://127.0.0.1:9", "t", 1);
        assert!(alerter.notify("msg", None).await.is_err());
    }
}
