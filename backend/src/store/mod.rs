//! Row storage for orders, clients, products and the message log
//!
//! Services depend on the `RowStore` trait so they can be exercised against
//! mocks; the server wires in `PgRowStore`.

mod postgres;

pub use postgres::PgRowStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use shared::{
    Client, LineDraftOrder, LineMessageRecord, NewOrder, NewOrderItem, NewProduct, Product,
    ProductInput, StoredOrder,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Append a row to the inbound message log
    async fn insert_line_message(&self, record: LineMessageRecord) -> AppResult<()>;

    /// Insert a draft order recognized in a chat message
    async fn insert_line_order(&self, draft: LineDraftOrder) -> AppResult<StoredOrder>;

    /// Insert an order header
    async fn insert_order(&self, order: NewOrder) -> AppResult<StoredOrder>;

    /// Insert the lines of an order in one statement
    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> AppResult<()>;

    /// Remove an order header and anything that cascades from it
    async fn delete_order(&self, order_id: Uuid) -> AppResult<()>;

    async fn find_client_by_customer_id(&self, customer_id: &str) -> AppResult<Option<Client>>;

    /// All products ordered by name
    async fn list_products(&self) -> AppResult<Vec<Product>>;

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product>;

    /// Write the fields present in `input`; `None` when no product has `id`
    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Option<Product>>;

    /// Returns whether a row was removed
    async fn delete_product(&self, id: Uuid) -> AppResult<bool>;

    /// Round-trip to the database
    async fn ping(&self) -> AppResult<()>;
}
