//! HTTP handlers for product master endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::{AppJson, AppPath};
use crate::services::product::{
    ProductService, PRODUCT_CREATED, PRODUCT_DELETED, PRODUCT_UPDATED,
};
use crate::AppState;
use shared::{Product, ProductInput};

#[derive(Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// List products ordered by name
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<ProductListResponse>> {
    let service = ProductService::new(state.store);
    let products = service.list_products().await?;
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<ProductInput>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    let service = ProductService::new(state.store);
    let product = service.create_product(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
            message: PRODUCT_CREATED.to_string(),
        }),
    ))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<ProductInput>,
) -> AppResult<Json<ProductResponse>> {
    let service = ProductService::new(state.store);
    let product = service.update_product(id, input).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
        message: PRODUCT_UPDATED.to_string(),
    }))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    let service = ProductService::new(state.store);
    service.delete_product(id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: PRODUCT_DELETED.to_string(),
    }))
}
