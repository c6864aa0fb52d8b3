//! Inbound chat message audit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interpreter::RawMessage;
use crate::types::ProcessingStatus;

/// A row in the message log. Every inbound message gets one, parsed or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMessageRecord {
    pub line_user_id: String,
    pub message_text: String,
    pub received_at: DateTime<Utc>,
    pub client_id: Option<Uuid>,
    pub parsed_data: Option<serde_json::Value>,
    pub order_id: Option<Uuid>,
    pub processing_status: Option<ProcessingStatus>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl LineMessageRecord {
    /// Verbatim record of a chat message
    pub fn received(message: &RawMessage) -> Self {
        Self {
            line_user_id: message.sender_id.clone(),
            message_text: message.text.clone(),
            received_at: message.received_at,
            client_id: None,
            parsed_data: None,
            order_id: None,
            processing_status: None,
            processed_at: None,
        }
    }

    /// Record of an order placed through the LIFF form
    pub fn processed_liff_order(
        liff_user_id: &str,
        client_id: Option<Uuid>,
        order_number: &str,
        order_id: Uuid,
        parsed_data: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            line_user_id: liff_user_id.to_string(),
            message_text: format!("LIFF注文: {order_number}"),
            received_at: now,
            client_id,
            parsed_data: Some(parsed_data),
            order_id: Some(order_id),
            processing_status: Some(ProcessingStatus::Processed),
            processed_at: Some(now),
        }
    }
}
