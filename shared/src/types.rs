//! Common types used across the order intake system

use serde::{Deserialize, Serialize};

/// Standard selling units. Chat drafts are recorded in 個; the product master
/// accepts any unit text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ProductUnit {
    #[default]
    #[serde(rename = "個")]
    Item,
    #[serde(rename = "箱")]
    Box,
    #[serde(rename = "ケース")]
    Case,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "セット")]
    Set,
}

impl ProductUnit {
    pub fn label(&self) -> &'static str {
        match self {
            ProductUnit::Item => "個",
            ProductUnit::Box => "箱",
            ProductUnit::Case => "ケース",
            ProductUnit::Kilogram => "kg",
            ProductUnit::Set => "セット",
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Draft created from a chat message, not yet reviewed by staff
    Received,
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
    Invoiced,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Invoiced => "invoiced",
        }
    }
}

/// Processing state of an inbound chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Received,
    Processed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Received => "received",
            ProcessingStatus::Processed => "processed",
        }
    }
}
