//! HTTP request handlers

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

pub mod customer;
pub mod health;
pub mod liff_order;
pub mod line_webhook;
pub mod product;

pub use customer::get_customer;
pub use health::{health_check, root};
pub use liff_order::create_liff_order;
pub use line_webhook::handle_line_webhook;
pub use product::{create_product, delete_product, list_products, update_product};

/// JSON request body. Malformed bodies answer with the standard error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters, rejected the same way as [`AppJson`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
