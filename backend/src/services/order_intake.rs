//! Order intake from LINE chat messages
//!
//! Every text message is logged, then run through the interpreter. Messages
//! that read as an order become a draft order row and get a confirmation
//! reply; anything else gets a reply explaining the expected format.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::external::line::{LineMessenger, LineWebhookRequest};
use crate::store::RowStore;
use shared::{interpret, LineDraftOrder, LineMessageRecord, ParsedOrderIntent, RawMessage, StoredOrder};

/// Reply sent when the draft order could not be saved
pub const ORDER_FAILED_REPLY: &str =
    "申し訳ございません。注文の処理中にエラーが発生しました。もう一度お試しください。";

/// Reply sent when a message does not read as an order
pub const FORMAT_HELP_REPLY: &str = "ご連絡ありがとうございます。\n\n注文の場合は以下の形式でお送りください：\n例: 「りんご 10個」「みかん 5」「バナナ20」\n\nご不明な点がございましたらお気軽にお問い合わせください。";

/// Confirmation reply for a saved draft order
pub fn confirmation_message(intent: &ParsedOrderIntent) -> String {
    format!(
        "ご注文ありがとうございます！\n\n📦 商品: {}\n📊 数量: {}個\n\n注文を受け付けました。\n処理状況はダッシュボードでご確認いただけます。",
        intent.product_text, intent.quantity
    )
}

/// What happened to one inbound text message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IntakeOutcome {
    OrderCreated {
        order: StoredOrder,
        intent: ParsedOrderIntent,
    },
    NotAnOrder,
    OrderFailed {
        intent: ParsedOrderIntent,
    },
}

impl IntakeOutcome {
    /// Text to send back to the chat user
    pub fn reply_text(&self) -> String {
        match self {
            IntakeOutcome::OrderCreated { intent, .. } => confirmation_message(intent),
            IntakeOutcome::NotAnOrder => FORMAT_HELP_REPLY.to_string(),
            IntakeOutcome::OrderFailed { .. } => ORDER_FAILED_REPLY.to_string(),
        }
    }
}

/// Turns webhook deliveries into draft orders and replies
#[derive(Clone)]
pub struct OrderIntakeService {
    store: Arc<dyn RowStore>,
    messenger: Arc<dyn LineMessenger>,
}

impl OrderIntakeService {
    pub fn new(store: Arc<dyn RowStore>, messenger: Arc<dyn LineMessenger>) -> Self {
        Self { store, messenger }
    }

    /// Process every event of a webhook delivery in order.
    ///
    /// Events that are not text messages are skipped. Storage and
    /// reply failures are logged; they never fail the delivery.
    pub async fn process_webhook(&self, request: LineWebhookRequest) -> Vec<IntakeOutcome> {
        tracing::debug!(
            "Processing webhook for destination: {} ({} events)",
            request.destination,
            request.events.len()
        );

        let mut outcomes = Vec::new();
        for event in &request.events {
            // Another channel owns the conversation
            if event.is_standby() {
                tracing::debug!("Skipping event in standby mode");
                continue;
            }

            if event.is_redelivery() {
                tracing::info!("Processing redelivered event: {:?}", event.webhook_event_id);
            }

            let Some((sender_id, text)) = event.text_message() else {
                tracing::debug!("Ignoring {} event", event.event_type);
                continue;
            };

            if event.source.user_id.is_none() {
                tracing::warn!(
                    "Message from {} source has no user id; logging it as {}",
                    event.source.source_type,
                    sender_id
                );
            }

            tracing::info!("Processing message: {:?} from user: {}", text, sender_id);
            let message = RawMessage::new(sender_id, text, Utc::now());
            let outcome = self.handle_text_message(&message).await;

            match &event.reply_token {
                Some(reply_token) => {
                    if let Err(e) = self
                        .messenger
                        .reply_text(reply_token, &outcome.reply_text())
                        .await
                    {
                        tracing::error!("Failed to reply to {}: {}", sender_id, e);
                    }
                }
                None => tracing::warn!("Message from {} has no reply token", sender_id),
            }

            outcomes.push(outcome);
        }

        outcomes
    }

    /// Log one text message and create a draft order when it reads as one
    pub async fn handle_text_message(&self, message: &RawMessage) -> IntakeOutcome {
        if let Err(e) = self
            .store
            .insert_line_message(LineMessageRecord::received(message))
            .await
        {
            tracing::error!("Error saving LINE message: {}", e);
        }

        let Some(intent) = interpret(&message.text) else {
            tracing::debug!("Message does not match order pattern");
            return IntakeOutcome::NotAnOrder;
        };
        tracing::info!(
            "Parsed order: product={:?} quantity={}",
            intent.product_text,
            intent.quantity
        );

        let draft = LineDraftOrder::from_intent(message, &intent, Utc::now());
        match self.store.insert_line_order(draft).await {
            Ok(order) => {
                tracing::info!("Order {} saved", order.order_number);
                IntakeOutcome::OrderCreated { order, intent }
            }
            Err(e) => {
                tracing::error!("Error saving order: {}", e);
                IntakeOutcome::OrderFailed { intent }
            }
        }
    }
}
