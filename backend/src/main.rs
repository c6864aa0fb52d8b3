//! Produce Order Intake - Backend Server
//!
//! Receives customer orders from LINE chat messages and the LIFF order form
//! and records them for the wholesaler's dashboard.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;
mod store;

pub use config::Config;

use external::{LineMessenger, LineMessagingClient};
use store::{PgRowStore, RowStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RowStore>,
    pub messenger: Arc<dyn LineMessenger>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seika_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting order intake server");
    tracing::info!("Environment: {}", config.environment);
    if !config.line.verify_signature {
        tracing::warn!("LINE webhook signature verification is disabled");
    }

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Create application state
    let state = AppState {
        store: Arc::new(PgRowStore::new(db_pool)),
        messenger: Arc::new(LineMessagingClient::from_config(&config.line)),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = config.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::public_routes())
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, LineConfig, ServerConfig};
    use crate::error::AppError;
    use crate::external::line::{sign_body, MockLineMessenger};
    use crate::services::order_intake::FORMAT_HELP_REPLY;
    use crate::store::MockRowStore;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Utc;
    use shared::{Product, StoredOrder};
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "test-channel-secret";

    fn test_config() -> Config {
        Config {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/seika_test".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            line: LineConfig {
                channel_secret: SECRET.to_string(),
                channel_access_token: "token".to_string(),
                api_base_url: "http://localhost:9".to_string(),
                verify_signature: true,
            },
        }
    }

    fn app(store: MockRowStore, messenger: MockLineMessenger) -> Router {
        create_app(AppState {
            store: Arc::new(store),
            messenger: Arc::new(messenger),
            config: Arc::new(test_config()),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn webhook_body(text: &str) -> String {
        serde_json::json!({
            "destination": "U0000000000000000",
            "events": [{
                "type": "message",
                "replyToken": "reply-token-123",
                "source": { "type": "user", "userId": "U1234567890abcdef" },
                "message": { "type": "text", "id": "msg-1", "text": text },
                "timestamp": 1722232800123i64
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_root_status() {
        let response = app(MockRowStore::new(), MockLineMessenger::new())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "OK");
        assert_eq!(json["message"], "LINE Bot Webhook Server is running");
    }

    #[tokio::test]
    async fn test_health_reports_database() {
        let mut store = MockRowStore::new();
        store
            .expect_ping()
            .returning(|| Err(AppError::database("connection refused")));

        let response = app(store, MockLineMessenger::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "disconnected");
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let mut store = MockRowStore::new();
        store.expect_insert_line_message().never();

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .header("x-line-signature", "c2lnbmF0dXJl")
                    .body(Body::from(webhook_body("りんご 10個")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_rejects_missing_signature() {
        let response = app(MockRowStore::new(), MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .body(Body::from(webhook_body("りんご 10個")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_signed_non_order() {
        let mut store = MockRowStore::new();
        store.expect_insert_line_message().times(1).returning(|_| Ok(()));
        store.expect_insert_line_order().never();
        let mut messenger = MockLineMessenger::new();
        messenger
            .expect_reply_text()
            .withf(|_, text| text == FORMAT_HELP_REPLY)
            .times(1)
            .returning(|_, _| Ok(()));

        let body = webhook_body("こんにちは");
        let signature = sign_body(SECRET, body.as_bytes()).unwrap();

        let response = app(store, messenger)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("x-line-signature", signature)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
    }

    #[tokio::test]
    async fn test_webhook_signed_order_stays_ok_when_storage_fails() {
        let mut store = MockRowStore::new();
        store
            .expect_insert_line_message()
            .returning(|_| Err(AppError::database("down")));
        store
            .expect_insert_line_order()
            .returning(|_| Err(AppError::database("down")));
        let mut messenger = MockLineMessenger::new();
        messenger.expect_reply_text().times(1).returning(|_, _| Ok(()));

        let body = webhook_body("りんご 10個");
        let signature = sign_body(SECRET, body.as_bytes()).unwrap();

        let response = app(store, messenger)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("x-line-signature", signature)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_liff_order_missing_fields() {
        let mut store = MockRowStore::new();
        store.expect_insert_order().never();

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"customerId":"0001"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error"]["message_en"],
            "Missing required fields: customerId, customerInfo, items, liffUserId"
        );
    }

    #[tokio::test]
    async fn test_liff_order_accepted() {
        let order_id = Uuid::new_v4();
        let mut store = MockRowStore::new();
        store.expect_insert_order().returning(move |order| {
            Ok(StoredOrder {
                id: order_id,
                order_number: order.order_number,
            })
        });
        store.expect_insert_order_items().returning(|_| Ok(()));
        store.expect_insert_line_message().returning(|_| Ok(()));

        let body = serde_json::json!({
            "customerId": "0001",
            "customerInfo": { "companyName": "A商店" },
            "items": [{
                "productId": Uuid::new_v4(),
                "quantity": 10,
                "unitPrice": 150,
                "totalPrice": 1500
            }],
            "liffUserId": "U1234567890abcdef",
            "orderTotal": { "subTotal": 1500, "taxAmount": 150, "total": 1650 }
        });

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["orderId"], order_id.to_string());
        assert_eq!(json["message"], "注文を正常に受け付けました");
    }

    #[tokio::test]
    async fn test_liff_order_malformed_item_is_json_error() {
        let mut store = MockRowStore::new();
        store.expect_insert_order().never();

        let body = serde_json::json!({
            "customerId": "0001",
            "customerInfo": { "companyName": "A商店" },
            "items": [{ "productId": "p1", "quantity": 10, "unitPrice": 150, "totalPrice": 1500 }],
            "liffUserId": "U1234567890abcdef",
            "orderTotal": { "subTotal": 1500, "taxAmount": 150, "total": 1650 }
        });

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(json["error"]["message_en"]
            .as_str()
            .unwrap()
            .contains("productId"));
    }

    #[tokio::test]
    async fn test_product_bad_body_and_id_are_json_errors() {
        let app = app(MockRowStore::new(), MockLineMessenger::new());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/products")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":42,"unit":"個"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/products/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_customer_not_found() {
        let mut store = MockRowStore::new();
        store
            .expect_find_client_by_customer_id()
            .returning(|_| Ok(None));

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .uri("/api/customers/9999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["message_en"], "Customer not found");
    }

    #[tokio::test]
    async fn test_products_list_and_create() {
        let mut store = MockRowStore::new();
        store.expect_list_products().returning(|| {
            Ok(vec![Product {
                id: Uuid::new_v4(),
                name: "キャベツ".to_string(),
                unit: "個".to_string(),
                category: None,
                description: None,
                created_at: Utc::now(),
            }])
        });
        store.expect_insert_product().returning(|p| {
            Ok(Product {
                id: Uuid::new_v4(),
                name: p.name,
                unit: p.unit,
                category: p.category,
                description: p.description,
                created_at: Utc::now(),
            })
        });
        let app = app(store, MockLineMessenger::new());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["products"][0]["name"], "キャベツ");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/products")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"玉ねぎ","unit":"袋"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["message"], "商品を追加しました");
        assert_eq!(json["product"]["unit"], "袋");
    }

    #[tokio::test]
    async fn test_product_update_not_found() {
        let mut store = MockRowStore::new();
        store.expect_update_product().returning(|_, _| Ok(None));

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/products/{}", Uuid::new_v4()))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"category":"果物"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"]["message_ja"],
            "商品が見つかりません"
        );
    }

    #[tokio::test]
    async fn test_product_delete() {
        let mut store = MockRowStore::new();
        store.expect_delete_product().times(1).returning(|_| Ok(true));

        let response = app(store, MockLineMessenger::new())
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/products/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "商品を削除しました");
    }
}
