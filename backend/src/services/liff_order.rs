//! Orders placed through the LIFF order form

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::RowStore;
use shared::{
    default_tax_rate, line_client_name, order_number, validate_liff_order, LiffOrder,
    LiffOrderRequest, LineMessageRecord, NewOrder, NewOrderItem, OrderStatus, LIFF_ORDER_PREFIX,
};

/// Confirmation shown in the order form
pub const LIFF_ORDER_ACCEPTED: &str = "注文を正常に受け付けました";

/// Response for an accepted LIFF order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiffOrderResponse {
    pub success: bool,
    pub order_number: String,
    pub order_id: Uuid,
    pub message: String,
}

/// LIFF order service
#[derive(Clone)]
pub struct LiffOrderService {
    store: Arc<dyn RowStore>,
}

impl LiffOrderService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// Validate and store a LIFF order with its lines and an audit record
    pub async fn create_order(&self, request: LiffOrderRequest) -> AppResult<LiffOrderResponse> {
        let order = validate_liff_order(request)?;

        self.create_validated(order, Utc::now()).await
    }

    async fn create_validated(
        &self,
        order: LiffOrder,
        now: DateTime<Utc>,
    ) -> AppResult<LiffOrderResponse> {
        let number = order_number(LIFF_ORDER_PREFIX, now);
        let today = now.date_naive();
        let client_id = order.customer_info.id;

        let header = NewOrder {
            order_number: number.clone(),
            client_id,
            client_name: order
                .customer_info
                .company_name
                .clone()
                .unwrap_or_else(|| line_client_name(&order.liff_user_id)),
            order_date: today,
            // Same-day delivery
            delivery_date: today,
            status: OrderStatus::Pending,
            sub_total: order.order_total.sub_total,
            tax_rate: default_tax_rate(),
            tax_amount: order.order_total.tax_amount,
            total_amount: order.order_total.total,
            notes: Some(format!("LIFF注文 - LINE User: {}", order.liff_user_id)),
            line_message_id: Some(order.liff_user_id.clone()),
        };

        let stored = self.store.insert_order(header).await.map_err(|e| {
            tracing::error!("Error saving LIFF order: {}", e);
            AppError::persistence("Failed to save order", e)
        })?;

        let items: Vec<NewOrderItem> = order
            .items
            .iter()
            .zip(1..)
            .map(|(item, item_number)| NewOrderItem {
                order_id: stored.id,
                item_number,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect();

        if let Err(e) = self.store.insert_order_items(items).await {
            tracing::error!("Error saving order items: {}", e);
            // Compensate: the header must not outlive its lines
            if let Err(delete_err) = self.store.delete_order(stored.id).await {
                tracing::error!("Failed to roll back order {}: {}", stored.id, delete_err);
            }
            return Err(AppError::persistence("Failed to save order items", e));
        }

        let parsed_data = serde_json::json!({
            "orderNumber": number,
            "customerId": order.customer_id,
            "items": order.items,
            "total": order.order_total.total,
        });
        let record = LineMessageRecord::processed_liff_order(
            &order.liff_user_id,
            client_id,
            &number,
            stored.id,
            parsed_data,
            now,
        );
        if let Err(e) = self.store.insert_line_message(record).await {
            tracing::warn!("Failed to record LIFF order {} in message log: {}", number, e);
        }

        tracing::info!("LIFF order saved successfully: {}", number);

        Ok(LiffOrderResponse {
            success: true,
            order_number: stored.order_number,
            order_id: stored.id,
            message: LIFF_ORDER_ACCEPTED.to_string(),
        })
    }
}
