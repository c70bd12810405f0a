//! Telegram Bot API sink.

use crate::PublishSink;
use async_trait::async_trait;
use derive_getters::Getters;
use postkeeper_error::{SendError, SendErrorKind};
use postkeeper_storage::MediaItem;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, error, instrument};

/// Smallest media group Telegram accepts.
const MIN_GROUP: usize = 2;
/// Largest media group Telegram accepts.
const MAX_GROUP: usize = 10;
/// Longest text message Telegram accepts, in characters.
const MAX_TEXT: usize = 4096;

/// Connection settings for [`TelegramSink`].
#[derive(Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct TelegramSinkConfig {
    /// Bot token.
    token: String,
    /// Target chat or channel (numeric id or `@username`).
    chat_id: String,
    /// Bot API base URL.
    #[builder(default = "\"https://api.telegram.org\".to_string()")]
    api_base: String,
    /// Optional `parse_mode` for text messages (e.g. `HTML`).
    #[builder(default, setter(into, strip_option))]
    parse_mode: Option<String>,
}

impl std::fmt::Debug for TelegramSinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSinkConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("parse_mode", &self.parse_mode)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sink posting to a Telegram chat through the Bot API.
///
/// A single item goes out as `sendPhoto`/`sendVideo`, two to ten items as one
/// `sendMediaGroup`; files are uploaded as multipart attachments. Text goes
/// out as `sendMessage`.
#[derive(Debug, Clone)]
pub struct TelegramSink {
    config: TelegramSinkConfig,
    client: reqwest::Client,
}

impl TelegramSink {
    /// Create a sink with a default HTTP client.
    #[instrument(skip_all, fields(chat_id = %config.chat_id))]
    pub fn new(config: TelegramSinkConfig) -> Self {
        debug!("Creating Telegram sink");
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Settings this sink was created with.
    pub fn config(&self) -> &TelegramSinkConfig {
        &self.config
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.token,
            method
        )
    }

    async fn attachment(item: &MediaItem) -> Result<Part, SendError> {
        let bytes = tokio::fs::read(item.path()).await.map_err(|e| {
            SendError::new(SendErrorKind::Validation(format!(
                "cannot read {}: {}",
                item, e
            )))
        })?;
        Ok(Part::bytes(bytes).file_name(item.id().to_string()))
    }

    async fn call(&self, method: &str, request: reqwest::RequestBuilder) -> Result<(), SendError> {
        let response = request.send().await.map_err(|e| {
            error!(method, "Telegram request failed: {}", e);
            SendError::new(SendErrorKind::Transport(format!("{}: {}", method, e)))
        })?;

        let status = response.status();
        let body: ApiResponse = response.json().await.map_err(|e| {
            error!(method, %status, "Failed to parse Telegram response: {}", e);
            SendError::new(SendErrorKind::Transport(format!(
                "{} returned unreadable response ({}): {}",
                method, status, e
            )))
        })?;

        if status.is_success() && body.ok {
            debug!(method, "Telegram call succeeded");
            Ok(())
        } else {
            let reason = body.description.unwrap_or_else(|| status.to_string());
            error!(method, %status, reason = %reason, "Telegram rejected request");
            Err(SendError::new(SendErrorKind::Rejected(format!(
                "{}: {}",
                method, reason
            ))))
        }
    }

    async fn send_single(&self, item: &MediaItem) -> Result<(), SendError> {
        let (method, field) = match item.media() {
            postkeeper_core::MediaKind::Photo => ("sendPhoto", "photo"),
            postkeeper_core::MediaKind::Video => ("sendVideo", "video"),
        };
        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .part(field, Self::attachment(item).await?);
        let request = self.client.post(self.method_url(method)).multipart(form);
        self.call(method, request).await
    }
}

#[async_trait]
impl PublishSink for TelegramSink {
    #[instrument(skip_all, fields(items = items.len()))]
    async fn send_group(&self, items: &[MediaItem]) -> Result<(), SendError> {
        match items.len() {
            0 => {
                return Err(SendError::new(SendErrorKind::Validation(
                    "empty media group".to_string(),
                )));
            }
            1 => return self.send_single(&items[0]).await,
            n if n > MAX_GROUP => {
                return Err(SendError::new(SendErrorKind::Validation(format!(
                    "media group of {} exceeds {}",
                    n, MAX_GROUP
                ))));
            }
            n => debug_assert!(n >= MIN_GROUP),
        }

        let mut media = Vec::with_capacity(items.len());
        let mut form = Form::new().text("chat_id", self.config.chat_id.clone());
        for (index, item) in items.iter().enumerate() {
            let name = format!("file{}", index);
            media.push(serde_json::json!({
                "type": item.media().to_string(),
                "media": format!("attach://{}", name),
            }));
            form = form.part(name, Self::attachment(item).await?);
        }
        let media = serde_json::to_string(&media).map_err(|e| {
            SendError::new(SendErrorKind::Validation(format!(
                "cannot encode media group: {}",
                e
            )))
        })?;
        form = form.text("media", media);

        let request = self
            .client
            .post(self.method_url("sendMediaGroup"))
            .multipart(form);
        self.call("sendMediaGroup", request).await
    }

    #[instrument(skip_all, fields(text_len = text.len()))]
    async fn send_text(&self, text: &str) -> Result<(), SendError> {
        let chars = text.chars().count();
        if chars == 0 || chars > MAX_TEXT {
            return Err(SendError::new(SendErrorKind::Validation(format!(
                "text of {} characters is outside 1..={}",
                chars, MAX_TEXT
            ))));
        }

        let mut body = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
        });
        if let Some(mode) = &self.config.parse_mode {
            body["parse_mode"] = serde_json::Value::String(mode.clone());
        }

        let request = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body);
        self.call("sendMessage", request).await
    }

    fn sink_name(&self) -> &str {
        "telegram"
    }
}
