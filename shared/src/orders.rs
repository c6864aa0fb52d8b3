//! Order numbering and price arithmetic

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::OrderTotal;

/// Order number prefix for orders recognized in chat messages
pub const LINE_ORDER_PREFIX: &str = "LINE";

/// Order number prefix for orders placed through the LIFF form
pub const LIFF_ORDER_PREFIX: &str = "LIFF";

/// Consumption tax applied to LIFF orders (10%)
pub fn default_tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// `<PREFIX>-<unix millis>`
pub fn order_number(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.timestamp_millis())
}

/// Display name for a chat sender that has no client record
pub fn line_client_name(sender_id: &str) -> String {
    let short: String = sender_id.chars().take(8).collect();
    format!("LINEユーザー {}", short)
}

/// Price of one order line
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Sum line totals and add tax, rounding the tax down to whole yen
pub fn calculate_totals<I>(line_totals: I, tax_rate: Decimal) -> OrderTotal
where
    I: IntoIterator<Item = Decimal>,
{
    let sub_total: Decimal = line_totals.into_iter().sum();
    let tax_amount = (sub_total * tax_rate).round_dp_with_strategy(0, RoundingStrategy::ToZero);

    OrderTotal {
        sub_total,
        tax_amount,
        total: sub_total + tax_amount,
    }
}
