//! Client (customer) registry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wholesale customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    /// Short number customers type into the order form, e.g. "0001"
    pub customer_id: Option<String>,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Free-text delivery and unit conventions for this client
    pub rule_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}
