//! Product master maintenance

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::RowStore;
use shared::{validate_new_product, validate_product_update, Product, ProductInput};

pub const PRODUCT_CREATED: &str = "商品を追加しました";
pub const PRODUCT_UPDATED: &str = "商品を更新しました";
pub const PRODUCT_DELETED: &str = "商品を削除しました";

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn RowStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.store.list_products().await
    }

    pub async fn create_product(&self, input: ProductInput) -> AppResult<Product> {
        let product = validate_new_product(input)?;

        let created = self.store.insert_product(product).await?;
        tracing::info!("Product {} created: {}", created.id, created.name);
        Ok(created)
    }

    /// Update the fields present in `input`
    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        validate_product_update(&input)?;

        self.store
            .update_product(id, input)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Product",
                message_ja: "商品が見つかりません",
            })
    }

    /// Delete a product. Deleting an id that does not exist is not an error.
    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_product(id).await? {
            tracing::debug!("Product {} was already absent", id);
        }
        Ok(())
    }
}
