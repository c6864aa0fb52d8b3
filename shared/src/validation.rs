//! Validation of API inputs

use thiserror::Error;
use validator::Validate;

use crate::models::{LiffOrder, LiffOrderRequest, NewProduct, ProductInput};

/// Message returned when a LIFF order lacks one of its required fields
pub const LIFF_MISSING_FIELDS: &str =
    "Missing required fields: customerId, customerInfo, items, liffUserId";

/// Message returned when a new product lacks a name or unit
pub const PRODUCT_REQUIRED_FIELDS: &str = "商品名、単位は必須です";

/// Why an input was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", LIFF_MISSING_FIELDS)]
    MissingLiffFields,
    #[error("Missing required field: orderTotal")]
    MissingOrderTotal,
    #[error("Order must contain at least one item")]
    EmptyOrder,
    #[error("Item quantities must be at least 1")]
    InvalidQuantity,
    #[error("{}", PRODUCT_REQUIRED_FIELDS)]
    MissingProductFields,
    #[error("Invalid product fields")]
    InvalidProductFields,
}

impl ValidationError {
    /// Request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingLiffFields => "body",
            ValidationError::MissingOrderTotal => "orderTotal",
            ValidationError::EmptyOrder | ValidationError::InvalidQuantity => "items",
            ValidationError::MissingProductFields | ValidationError::InvalidProductFields => "name",
        }
    }

    pub fn message_ja(&self) -> &'static str {
        match self {
            ValidationError::MissingLiffFields => "必須項目が入力されていません",
            ValidationError::MissingOrderTotal => "合計金額が入力されていません",
            ValidationError::EmptyOrder => "商品を1つ以上選択してください",
            ValidationError::InvalidQuantity => "数量は1以上で入力してください",
            ValidationError::MissingProductFields => PRODUCT_REQUIRED_FIELDS,
            ValidationError::InvalidProductFields => "商品情報が正しくありません",
        }
    }
}

/// Validate a product for creation
pub fn validate_new_product(input: ProductInput) -> Result<NewProduct, ValidationError> {
    let name = input.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ValidationError::MissingProductFields);
    }
    let unit = input.unit.as_deref().map(str::trim).unwrap_or_default();
    if unit.is_empty() {
        return Err(ValidationError::MissingProductFields);
    }
    if input.validate().is_err() {
        return Err(ValidationError::InvalidProductFields);
    }

    Ok(NewProduct {
        name: name.to_string(),
        unit: unit.to_string(),
        category: input.category,
        description: input.description,
    })
}

/// Validate a product update. Absent fields are left untouched by the update.
pub fn validate_product_update(input: &ProductInput) -> Result<(), ValidationError> {
    let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());
    if blank(&input.name) || blank(&input.unit) {
        return Err(ValidationError::MissingProductFields);
    }
    input
        .validate()
        .map_err(|_| ValidationError::InvalidProductFields)
}

/// Validate a LIFF order and unwrap its required fields
pub fn validate_liff_order(request: LiffOrderRequest) -> Result<LiffOrder, ValidationError> {
    use ValidationError::*;

    let customer_id = non_empty(request.customer_id).ok_or(MissingLiffFields)?;
    let customer_info = request.customer_info.ok_or(MissingLiffFields)?;
    let items = request.items.ok_or(MissingLiffFields)?;
    let liff_user_id = non_empty(request.liff_user_id).ok_or(MissingLiffFields)?;
    let order_total = request.order_total.ok_or(MissingOrderTotal)?;

    if items.is_empty() {
        return Err(EmptyOrder);
    }
    if items.iter().any(|item| item.validate().is_err()) {
        return Err(InvalidQuantity);
    }

    Ok(LiffOrder {
        customer_id,
        customer_info,
        items,
        liff_user_id,
        order_total,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
