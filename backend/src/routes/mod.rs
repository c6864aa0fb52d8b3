//! Route definitions for the order intake server

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Routes outside `/api`: status probes and the LINE webhook
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // LINE webhook (signature checked in the handler)
        .route("/webhook", post(handlers::handle_line_webhook))
}

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // LIFF order form
        .route("/orders", post(handlers::create_liff_order))
        .route("/customers/:customer_id", get(handlers::get_customer))
        .nest("/products", product_routes())
}

/// Product master routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:id",
            put(handlers::update_product).delete(handlers::delete_product),
        )
}
