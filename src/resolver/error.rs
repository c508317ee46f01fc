//! Error types for price resolution.

use thiserror::Error;

use crate::ProductCode;

/// Reasons a single resolution fails. None of them are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("invalid product id: {0}")]
    InvalidProductIdentifier(String),

    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(i64),

    #[error("no price found for {product_code} with quantity {quantity}")]
    NoPriceFound {
        product_code: ProductCode,
        quantity: i64,
    },
}
