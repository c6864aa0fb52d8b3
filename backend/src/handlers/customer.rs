//! HTTP handler for customer lookup

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::CustomerService;
use crate::AppState;
use shared::Client;

#[derive(Serialize)]
pub struct CustomerResponse {
    pub success: bool,
    pub customer: Client,
}

/// GET /api/customers/:customer_id
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<CustomerResponse>> {
    let service = CustomerService::new(state.store);
    let customer = service.get_by_customer_id(&customer_id).await?;
    Ok(Json(CustomerResponse {
        success: true,
        customer,
    }))
}
