//! HTTP handler for orders from the LIFF order form

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::handlers::AppJson;
use crate::services::liff_order::{LiffOrderResponse, LiffOrderService};
use crate::AppState;
use shared::LiffOrderRequest;

/// Place an order
/// POST /api/orders
pub async fn create_liff_order(
    State(state): State<AppState>,
    AppJson(request): AppJson<LiffOrderRequest>,
) -> AppResult<Json<LiffOrderResponse>> {
    tracing::info!(
        "LIFF order received from {:?} ({} items)",
        request.liff_user_id,
        request.items.as_ref().map_or(0, Vec::len)
    );

    let service = LiffOrderService::new(state.store);
    let response = service.create_order(request).await?;
    Ok(Json(response))
}
