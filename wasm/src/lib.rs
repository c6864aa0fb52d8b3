//! WebAssembly module for the order intake dashboard
//!
//! Lets the browser-side webhook simulator and the customer order form use
//! the same message interpreter and price arithmetic as the server.

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use shared::interpreter::*;
pub use shared::orders::*;

/// Result shape handed back to JavaScript
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InterpretedMessage {
    product: String,
    quantity: u64,
}

/// Interpret a chat message.
///
/// Returns `{"product": ..., "quantity": ...}` as JSON, or `null` when the
/// message is not an order.
#[wasm_bindgen]
pub fn interpret_order_message(text: &str) -> String {
    match interpret(text) {
        Some(intent) => serde_json::to_string(&InterpretedMessage {
            product: intent.product_text,
            quantity: intent.quantity,
        })
        .unwrap_or_else(|_| "null".to_string()),
        None => "null".to_string(),
    }
}

/// Order number for a chat order created at `epoch_millis`
#[wasm_bindgen]
pub fn line_order_number(epoch_millis: f64) -> String {
    format!("{}-{}", LINE_ORDER_PREFIX, epoch_millis as i64)
}

/// Compute order totals from `[{"unitPrice": n, "quantity": n}, ...]`.
///
/// Returns `{"subTotal", "taxAmount", "total"}` as JSON.
#[wasm_bindgen]
pub fn calculate_order_totals(lines_json: &str, tax_rate: f64) -> Result<String, JsValue> {
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Line {
        unit_price: Decimal,
        quantity: u32,
    }

    let lines: Vec<Line> = serde_json::from_str(lines_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid order lines JSON: {}", e)))?;
    let rate = Decimal::try_from(tax_rate)
        .map_err(|e| JsValue::from_str(&format!("Invalid tax rate: {}", e)))?;

    let totals = calculate_totals(
        lines.iter().map(|l| line_total(l.unit_price, l.quantity)),
        rate,
    );
    serde_json::to_string(&totals).map_err(|e| JsValue::from_str(&e.to_string()))
}
