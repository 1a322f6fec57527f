//! Product lookup contract.
//!
//! Shares the call layer's convention of a specific failure plus an
//! undefined catch-all. No catalog implementation ships with the crate.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub brand: String,
    pub previous_price: u64,
    pub current_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
}

/// Error type returned by [`ProductLookup::get_product`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ProductError {
    #[error("product {0} not found")]
    NotFound(u64),
    #[error("undefined error: {0}")]
    Undefined(String),
}

/// Looks up a product by id.
pub trait ProductLookup {
    fn get_product(&self, id: u64) -> Result<Product, ProductError>;
}
