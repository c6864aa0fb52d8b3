//! HTTP handler for the LINE Messaging API webhook

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::external::line::{verify_signature, LineWebhookRequest, SIGNATURE_HEADER};
use crate::services::OrderIntakeService;
use crate::AppState;

/// Response for webhook processing
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
}

/// Handle LINE webhook events
/// POST /webhook
///
/// Once the signature checks out the response is always 200 so that LINE
/// does not redeliver; per-message failures are answered in the chat.
pub async fn handle_line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookResponse>> {
    if state.config.line.verify_signature {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::InvalidSignature("missing x-line-signature header".to_string()))?;

        if let Err(e) = verify_signature(&state.config.line.channel_secret, signature, &body) {
            tracing::warn!("LINE webhook signature verification failed: {}", e);
            return Err(e);
        }
    }

    let request: LineWebhookRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Failed to parse LINE webhook: {}", e);
        AppError::ValidationError(format!("Invalid request body: {}", e))
    })?;

    let service = OrderIntakeService::new(state.store.clone(), state.messenger.clone());
    let outcomes = service.process_webhook(request).await;
    tracing::debug!("Webhook handled {} messages", outcomes.len());

    Ok(Json(WebhookResponse { success: true }))
}
