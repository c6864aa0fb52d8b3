//! LINE Messaging API integration
//!
//! Webhook payload types, signature verification and the reply client.
//! See: https://developers.line.biz/en/reference/messaging-api/

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::LineConfig;
use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook body signature
pub const SIGNATURE_HEADER: &str = "x-line-signature";

// ============================================================================
// Webhook payload
// ============================================================================

/// Sender recorded when an event carries no user, group or room id
pub const UNKNOWN_SENDER: &str = "unknown";

/// Body of a webhook delivery. Only the fields order intake reads are mapped.
#[derive(Debug, Deserialize)]
pub struct LineWebhookRequest {
    /// Bot user id the delivery is addressed to
    #[serde(default)]
    pub destination: String,
    pub events: Vec<LineWebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// Present on message and follow events; valid for one reply
    pub reply_token: Option<String>,
    pub source: LineEventSource,
    pub message: Option<LineEventMessage>,
    /// Epoch millis
    pub timestamp: i64,
    #[serde(default = "active_mode")]
    pub mode: String,
    pub webhook_event_id: Option<String>,
    pub delivery_context: Option<DeliveryContext>,
}

fn active_mode() -> String {
    "active".to_string()
}

impl LineWebhookEvent {
    pub fn is_standby(&self) -> bool {
        self.mode == "standby"
    }

    pub fn is_redelivery(&self) -> bool {
        self.delivery_context
            .as_ref()
            .is_some_and(|ctx| ctx.is_redelivery)
    }

    /// Sender and text of a text message event.
    ///
    /// The sender is the user id, else the group or room id, else
    /// [`UNKNOWN_SENDER`], so every text message can be logged.
    pub fn text_message(&self) -> Option<(&str, &str)> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        Some((self.source.sender_id(), message.text.as_deref()?))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    pub is_redelivery: bool,
}

/// Where the event came from: a 1:1 chat, a group or a multi-person room
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    pub room_id: Option<String>,
}

impl LineEventSource {
    pub fn sender_id(&self) -> &str {
        self.user_id
            .as_deref()
            .or(self.group_id.as_deref())
            .or(self.room_id.as_deref())
            .unwrap_or(UNKNOWN_SENDER)
    }
}

#[derive(Debug, Deserialize)]
pub struct LineEventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub id: String,
    /// Only text messages carry text
    pub text: Option<String>,
}

// ============================================================================
// Signature verification
// ============================================================================

/// Check `signature` against base64(HMAC-SHA256(channel_secret, body))
pub fn verify_signature(channel_secret: &str, signature: &str, body: &[u8]) -> AppResult<()> {
    let expected = BASE64
        .decode(signature.trim())
        .map_err(|_| AppError::InvalidSignature("signature is not valid base64".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| AppError::Configuration("LINE channel secret is unusable".to_string()))?;
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| AppError::InvalidSignature("signature mismatch".to_string()))
}

/// Signature LINE would send for `body`
pub fn sign_body(channel_secret: &str, body: &[u8]) -> AppResult<String> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| AppError::Configuration("LINE channel secret is unusable".to_string()))?;
    mac.update(body);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

// ============================================================================
// Reply client
// ============================================================================

/// Sends replies to chat users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LineMessenger: Send + Sync {
    /// Reply with a single text message using an event's reply token
    async fn reply_text(&self, reply_token: &str, text: &str) -> AppResult<()>;
}

/// LINE message types
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum LineMessage {
    #[serde(rename = "text")]
    Text { text: String },
}

/// LINE reply message request
#[derive(Debug, Serialize)]
struct LineReplyRequest {
    #[serde(rename = "replyToken")]
    reply_token: String,
    messages: Vec<LineMessage>,
}

/// LINE API error body
#[derive(Debug, Deserialize)]
struct LineApiResponse {
    #[serde(default)]
    message: Option<String>,
}

/// LINE Messaging API client
#[derive(Clone)]
pub struct LineMessagingClient {
    http_client: Client,
    channel_access_token: String,
    base_url: String,
}

impl LineMessagingClient {
    pub fn new(channel_access_token: String, base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            channel_access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &LineConfig) -> Self {
        Self::new(
            config.channel_access_token.clone(),
            config.api_base_url.clone(),
        )
    }
}

#[async_trait]
impl LineMessenger for LineMessagingClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> AppResult<()> {
        let request = LineReplyRequest {
            reply_token: reply_token.to_string(),
            messages: vec![LineMessage::Text {
                text: text.to_string(),
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .bearer_auth(&self.channel_access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::LineApiError(format!("reply request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let error: LineApiResponse = response
            .json()
            .await
            .unwrap_or(LineApiResponse { message: None });
        Err(AppError::LineApiError(format!(
            "reply failed with {}: {}",
            status,
            error.message.unwrap_or_else(|| "Unknown error".to_string())
        )))
    }
}
