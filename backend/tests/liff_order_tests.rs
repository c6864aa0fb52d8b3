//! LIFF order form tests
//!
//! Tests for orders placed through the order form:
//! - Request validation and the messages clients see
//! - Totals and tax
//! - Order numbering

use chrono::DateTime;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    calculate_totals, default_tax_rate, line_total, order_number, validate_liff_order,
    LiffOrderRequest, ValidationError, LIFF_MISSING_FIELDS, LIFF_ORDER_PREFIX,
};

fn request_json(body: serde_json::Value) -> LiffOrderRequest {
    serde_json::from_value(body).unwrap()
}

fn complete_body() -> serde_json::Value {
    serde_json::json!({
        "customerId": "0001",
        "customerInfo": {
            "id": "6f1c2a7e-3b8e-4d25-9a4f-0c6d2b1e8f10",
            "companyName": "A商店",
            "contactPerson": "山田太郎"
        },
        "items": [
            { "productId": "0b5c8a52-51a4-4b8e-8a0f-6a8e1f6b7c21", "quantity": 10, "unitPrice": 150, "totalPrice": 1500 },
            { "productId": "a3e0f0c4-3a4d-4c0b-9d7e-2f4b9d8e6c11", "quantity": 5, "unitPrice": 1200, "totalPrice": 6000 }
        ],
        "liffUserId": "U1234567890abcdef",
        "orderTotal": { "subTotal": 7500, "taxAmount": 750, "total": 8250 }
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_complete_request_is_valid() {
        let order = validate_liff_order(request_json(complete_body())).unwrap();

        assert_eq!(order.customer_id, "0001");
        assert_eq!(order.customer_info.company_name.as_deref(), Some("A商店"));
        assert!(order.customer_info.id.is_some());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.order_total.total, Decimal::from(8250));
    }

    #[test]
    fn test_each_required_field_reports_same_message() {
        for field in ["customerId", "customerInfo", "items", "liffUserId"] {
            let mut body = complete_body();
            body.as_object_mut().unwrap().remove(field);

            let err = validate_liff_order(request_json(body)).unwrap_err();
            assert_eq!(err, ValidationError::MissingLiffFields, "removing {field}");
            assert_eq!(err.to_string(), LIFF_MISSING_FIELDS);
        }
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let mut body = complete_body();
        body["customerId"] = serde_json::json!("");
        assert_eq!(
            validate_liff_order(request_json(body)).unwrap_err(),
            ValidationError::MissingLiffFields
        );
    }

    #[test]
    fn test_client_totals_match_server_arithmetic() {
        let order = validate_liff_order(request_json(complete_body())).unwrap();
        let totals = calculate_totals(
            order.items.iter().map(|i| line_total(i.unit_price, i.quantity)),
            default_tax_rate(),
        );

        assert_eq!(totals, order.order_total);
    }

    #[test]
    fn test_liff_order_number() {
        let at = DateTime::from_timestamp_millis(1_722_232_800_000).unwrap();
        assert_eq!(order_number(LIFF_ORDER_PREFIX, at), "LIFF-1722232800000");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Tax never exceeds the rate applied to the subtotal and is whole yen
    #[test]
    fn prop_tax_is_whole_yen(
        lines in prop::collection::vec((1i64..50_000, 1u32..1_000), 1..15)
    ) {
        let totals = calculate_totals(
            lines.iter().map(|(price, qty)| line_total(Decimal::from(*price), *qty)),
            default_tax_rate(),
        );

        prop_assert_eq!(totals.tax_amount.fract(), Decimal::ZERO);
        prop_assert!(totals.tax_amount <= totals.sub_total * default_tax_rate());
        prop_assert!(totals.sub_total * default_tax_rate() - totals.tax_amount < Decimal::ONE);
    }

    /// Zero quantities are rejected wherever they appear
    #[test]
    fn prop_zero_quantity_rejected(position in 0usize..2) {
        let mut body = complete_body();
        body["items"][position]["quantity"] = serde_json::json!(0);
        prop_assert!(validate_liff_order(request_json(body)).is_err());
    }
}
