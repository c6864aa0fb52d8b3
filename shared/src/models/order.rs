//! Order models: chat drafts, LIFF orders and their line items

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::interpreter::{ParsedOrderIntent, RawMessage};
use crate::orders::{line_client_name, order_number, LINE_ORDER_PREFIX};
use crate::types::{OrderStatus, ProductUnit};

/// Order row derived from a recognized chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraftOrder {
    pub client_name: String,
    pub product_name: String,
    pub quantity: u64,
    pub unit: ProductUnit,
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl LineDraftOrder {
    /// Build the draft for `intent`, numbered by the time it is created
    pub fn from_intent(message: &RawMessage, intent: &ParsedOrderIntent, now: DateTime<Utc>) -> Self {
        Self {
            client_name: line_client_name(&message.sender_id),
            product_name: intent.product_text.clone(),
            quantity: intent.quantity,
            unit: ProductUnit::Item,
            order_number: order_number(LINE_ORDER_PREFIX, now),
            status: OrderStatus::Received,
            created_at: now,
        }
    }
}

/// Totals as computed by the ordering client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotal {
    pub sub_total: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Customer block of a LIFF order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiffCustomerInfo {
    /// Client registry id, when the customer is known
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One product line of a LIFF order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LiffOrderItemInput {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Order submitted from the customer-facing LIFF form.
///
/// Every field is optional on the wire so that a missing field can be
/// reported with the same message regardless of which one it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiffOrderRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_info: Option<LiffCustomerInfo>,
    #[serde(default)]
    pub items: Option<Vec<LiffOrderItemInput>>,
    #[serde(default)]
    pub liff_user_id: Option<String>,
    #[serde(default)]
    pub order_total: Option<OrderTotal>,
}

/// A LIFF order that passed validation
#[derive(Debug, Clone)]
pub struct LiffOrder {
    pub customer_id: String,
    pub customer_info: LiffCustomerInfo,
    pub items: Vec<LiffOrderItemInput>,
    pub liff_user_id: String,
    pub order_total: OrderTotal,
}

/// Order header row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub order_number: String,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub order_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub sub_total: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub line_message_id: Option<String>,
}

/// Order line row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub order_id: Uuid,
    /// 1-based position within the order
    pub item_number: i32,
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Identity of an order row after insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOrder {
    pub id: Uuid,
    pub order_number: String,
}
