//! Price resolution.
//!
//! The resolver holds an immutable price list plus customer tier/group
//! membership, and picks the single best price for a product, quantity and
//! customer. Source precedence (customer, tier, group, normal) always beats
//! price; price only breaks ties within one source.
//! Also supports resolving an async stream of requests.

use tokio_stream::{Stream, StreamExt};
use tracing::{info, trace};

use crate::model::{CustomerAttributes, CustomerId, PriceRule, PriceScope, Quote};
use crate::product::{ProductCode, ProductId};

mod error;
pub use error::PricingError;

mod outcome;
pub use outcome::{PriceOutcome, PriceRequest};

/// Best-price resolver over a fixed price list.
///
/// Holds no mutable state, so it can be shared across threads and queried
/// concurrently. Build a new resolver to change prices.
#[derive(Debug, Clone)]
pub struct PriceResolver {
    rules: Vec<PriceRule>,
    customers: CustomerAttributes,
}

/// Public API
impl PriceResolver {
    pub fn new(rules: impl IntoIterator<Item = PriceRule>, customers: CustomerAttributes) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            customers,
        }
    }

    pub fn rules(&self) -> &[PriceRule] {
        &self.rules
    }

    /// Resolve the best price for `quantity` units of `product_id` sold to `customer`.
    pub fn resolve(
        &self,
        product_id: impl Into<ProductId>,
        quantity: i64,
        customer: CustomerId,
    ) -> Result<Quote, PricingError> {
        let product_id = product_id.into();
        let result = self.find_best(&product_id, quantity, customer);
        Self::log_result(&product_id, quantity, customer, &result);
        result
    }

    /// Resolve one batch row, keeping failures as reportable outcomes.
    pub fn resolve_request(&self, request: &PriceRequest) -> PriceOutcome {
        match self.resolve(request.product_id.clone(), request.quantity, request.customer_id) {
            Ok(quote) => PriceOutcome::Quoted(quote),
            Err(error) => PriceOutcome::failed(request, error),
        }
    }

    /// Resolve every request of the stream, in order
    pub async fn run(
        &self,
        mut stream: impl Stream<Item = PriceRequest> + Unpin,
    ) -> Vec<PriceOutcome> {
        let mut outcomes = Vec::new();
        while let Some(request) = stream.next().await {
            // a failed row never stops the batch
            outcomes.push(self.resolve_request(&request));
        }
        outcomes
    }
}

/// Private API
impl PriceResolver {
    fn log_result(
        product_id: &ProductId,
        quantity: i64,
        customer: CustomerId,
        result: &Result<Quote, PricingError>,
    ) {
        match result {
            Ok(quote) => {
                info!(
                    product = %quote.product_id,
                    quantity,
                    customer,
                    price = %quote.price,
                    price_type = %quote.price_type,
                    "price resolved"
                );
            }
            Err(e) => {
                info!(
                    product = %product_id,
                    quantity,
                    customer,
                    reason = %e,
                    "price not resolved"
                );
            }
        }
    }

    /// Resolution steps:
    /// - Reject non-positive quantities
    /// - Normalize the product identifier
    /// - Keep rules for this product whose minimum quantity is met and whose
    ///   scope covers the customer
    /// - Pick the lowest (priority, price); the first rule wins exact ties
    fn find_best(
        &self,
        product_id: &ProductId,
        quantity: i64,
        customer: CustomerId,
    ) -> Result<Quote, PricingError> {
        if quantity <= 0 {
            return Err(PricingError::InvalidQuantity(quantity));
        }

        let product_code = ProductCode::normalize(product_id)?;

        let tier = self.customers.tier(customer);
        let group = self.customers.group(customer);

        let best = self
            .rules
            .iter()
            .filter(|rule| rule.product_code == product_code)
            .filter(|rule| quantity >= i64::from(rule.min_quantity))
            .filter(|rule| Self::applies(&rule.scope, customer, tier, group))
            .inspect(|rule| {
                trace!(
                    product = %rule.product_code,
                    source = %rule.source(),
                    price = %rule.price,
                    "candidate price"
                )
            })
            .min_by_key(|rule| (rule.source().priority(), rule.price))
            .ok_or_else(|| PricingError::NoPriceFound {
                product_code: product_code.clone(),
                quantity,
            })?;

        Ok(Quote {
            product_id: best.product_code.clone(),
            price: best.price,
            price_type: best.source(),
        })
    }

    /// A customer with no tier (or group) never matches tier (or group) rules.
    fn applies(
        scope: &PriceScope,
        customer: CustomerId,
        tier: Option<&str>,
        group: Option<&str>,
    ) -> bool {
        match scope {
            PriceScope::Customer(id) => *id == customer,
            PriceScope::Tier(name) => tier == Some(name.as_str()),
            PriceScope::Group(name) => group == Some(name.as_str()),
            PriceScope::Normal => true,
        }
    }
}
