pub mod csv;
pub mod model;
pub mod price;
pub mod product;
pub mod resolver;

pub use model::{CustomerAttributes, CustomerId, PriceRule, PriceScope, PriceSource, Quote};
pub use price::Price;
pub use product::{ProductCode, ProductId};
pub use resolver::{PriceOutcome, PriceRequest, PriceResolver, PricingError};
