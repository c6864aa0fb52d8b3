//! PostgreSQL implementation of the row store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::RowStore;
use crate::error::{AppError, AppResult};
use shared::{
    Client, LineDraftOrder, LineMessageRecord, NewOrder, NewOrderItem, NewProduct, Product,
    ProductInput, StoredOrder,
};

/// Row store backed by a connection pool
#[derive(Clone)]
pub struct PgRowStore {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct StoredOrderRow {
    id: Uuid,
    order_number: String,
}

impl From<StoredOrderRow> for StoredOrder {
    fn from(row: StoredOrderRow) -> Self {
        StoredOrder {
            id: row.id,
            order_number: row.order_number,
        }
    }
}

#[derive(Debug, FromRow)]
struct ClientRow {
    id: Uuid,
    customer_id: Option<String>,
    company_name: String,
    contact_person: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    rule_summary: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            customer_id: row.customer_id,
            company_name: row.company_name,
            contact_person: row.contact_person,
            phone: row.phone,
            email: row.email,
            address: row.address,
            rule_summary: row.rule_summary,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    unit: String,
    category: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            unit: row.unit,
            category: row.category,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, unit, category, description, created_at";

/// Chat quantities are u64; the column is BIGINT
fn bigint_quantity(quantity: u64) -> AppResult<i64> {
    i64::try_from(quantity).map_err(|e| {
        AppError::persistence(
            &format!("Quantity {} does not fit the orders table", quantity),
            e,
        )
    })
}

impl PgRowStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RowStore for PgRowStore {
    async fn insert_line_message(&self, record: LineMessageRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO line_messages (
                line_user_id, message_text, received_at, client_id, parsed_data,
                order_id, processing_status, processed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'received'), $8)
            "#,
        )
        .bind(&record.line_user_id)
        .bind(&record.message_text)
        .bind(record.received_at)
        .bind(record.client_id)
        .bind(&record.parsed_data)
        .bind(record.order_id)
        .bind(record.processing_status.map(|s| s.as_str()))
        .bind(record.processed_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn insert_line_order(&self, draft: LineDraftOrder) -> AppResult<StoredOrder> {
        let quantity = bigint_quantity(draft.quantity)?;
        let row = sqlx::query_as::<_, StoredOrderRow>(
            r#"
            INSERT INTO orders (
                order_number, client_name, product_name, quantity, unit, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, order_number
            "#,
        )
        .bind(&draft.order_number)
        .bind(&draft.client_name)
        .bind(&draft.product_name)
        .bind(quantity)
        .bind(draft.unit.label())
        .bind(draft.status.as_str())
        .bind(draft.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn insert_order(&self, order: NewOrder) -> AppResult<StoredOrder> {
        let row = sqlx::query_as::<_, StoredOrderRow>(
            r#"
            INSERT INTO orders (
                order_number, client_id, client_name, order_date, delivery_date, status,
                sub_total, tax_rate, tax_amount, total_amount, notes, line_message_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, order_number
            "#,
        )
        .bind(&order.order_number)
        .bind(order.client_id)
        .bind(&order.client_name)
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(order.status.as_str())
        .bind(order.sub_total)
        .bind(order.tax_rate)
        .bind(order.tax_amount)
        .bind(order.total_amount)
        .bind(&order.notes)
        .bind(&order.line_message_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> AppResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO order_items (order_id, item_number, product_id, quantity, unit_price, total_price) ",
        );
        builder.push_values(items, |mut row, item| {
            row.push_bind(item.order_id)
                .push_bind(item.item_number)
                .push_bind(item.product_id)
                .push_bind(i64::from(item.quantity))
                .push_bind(item.unit_price)
                .push_bind(item.total_price);
        });
        builder.build().execute(&self.db).await?;

        Ok(())
    }

    async fn delete_order(&self, order_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn find_client_by_customer_id(&self, customer_id: &str) -> AppResult<Option<Client>> {
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, customer_id, company_name, contact_person, phone, email, address,
                   rule_summary, created_at
            FROM clients
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Client::from))
    }

    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, unit, category, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(&product.unit)
        .bind(&product.category)
        .bind(&product.description)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                unit = COALESCE($3, unit),
                category = COALESCE($4, category),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.unit.as_deref().map(str::trim))
        .bind(&input.category)
        .bind(&input.description)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
