use crate::model::{CustomerId, Quote};
use crate::product::{ProductCode, ProductId};

use super::PricingError;

/// One row of a batch query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    pub customer_id: CustomerId,
}

impl PriceRequest {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64, customer_id: CustomerId) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            customer_id,
        }
    }
}

/// Result of one batch row, ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceOutcome {
    Quoted(Quote),
    /// `product_id` is the normalized code, or the raw input when it could
    /// not be normalized.
    Failed {
        product_id: String,
        error: PricingError,
    },
}

impl PriceOutcome {
    pub(super) fn failed(request: &PriceRequest, error: PricingError) -> Self {
        let product_id = match ProductCode::normalize(&request.product_id) {
            Ok(code) => code.to_string(),
            Err(_) => request.product_id.to_string(),
        };
        PriceOutcome::Failed { product_id, error }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, PriceOutcome::Quoted(_))
    }
}
