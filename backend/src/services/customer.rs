//! Customer lookup for the order form

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::store::RowStore;
use shared::Client;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn RowStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    /// Find a client by the short customer number printed on their account
    pub async fn get_by_customer_id(&self, customer_id: &str) -> AppResult<Client> {
        self.store
            .find_client_by_customer_id(customer_id)
            .await?
            .ok_or(AppError::NotFound {
                resource: "Customer",
                message_ja: "顧客が見つかりません",
            })
    }
}
