use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::model::{CustomerAttributes, CustomerId, PriceRule, PriceScope, PriceSource};
use crate::resolver::{PriceOutcome, PriceRequest, PricingError};
use crate::{Price, ProductCode, ProductId};

/// Errors that can occur when reading or writing csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: {price_source} rule missing key")]
    MissingKey {
        line: usize,
        price_source: PriceSource,
    },

    #[error("line {line}: customer rule key '{key}' is not a customer id")]
    InvalidCustomerKey { line: usize, key: String },

    #[error("line {line}: price {raw} is not a representable amount")]
    InvalidPrice { line: usize, raw: f64 },

    #[error("line {line}: negative price {price}")]
    NegativePrice { line: usize, price: Price },

    #[error("line {line}: minimum quantity must be at least 1")]
    ZeroMinQuantity { line: usize },

    #[error("line {line}: {source}")]
    Product { line: usize, source: PricingError },

    #[error("failed to write csv row: {0}")]
    Write(#[from] csv::Error),

    #[error("failed to flush csv output: {0}")]
    Flush(#[from] io::Error),
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    product_id: String,
    min_qty: u32,
    price: f64,
    source: PriceSource,
    key: Option<String>,
}

impl RuleRow {
    fn into_rule(self, line: usize) -> Result<PriceRule, CsvError> {
        let product_code = ProductCode::normalize(&ProductId::Code(self.product_id))
            .map_err(|source| CsvError::Product { line, source })?;

        if self.min_qty == 0 {
            return Err(CsvError::ZeroMinQuantity { line });
        }

        let price = Price::try_from_float(self.price).ok_or(CsvError::InvalidPrice {
            line,
            raw: self.price,
        })?;
        if price.is_negative() {
            return Err(CsvError::NegativePrice { line, price });
        }

        let missing_key = || CsvError::MissingKey {
            line,
            price_source: self.source,
        };
        let scope = match self.source {
            PriceSource::Customer => {
                let key = self.key.ok_or_else(missing_key)?;
                let customer = key
                    .parse::<CustomerId>()
                    .map_err(|_| CsvError::InvalidCustomerKey { line, key })?;
                PriceScope::Customer(customer)
            }
            PriceSource::Tier => PriceScope::Tier(self.key.ok_or_else(missing_key)?),
            PriceSource::Group => PriceScope::Group(self.key.ok_or_else(missing_key)?),
            PriceSource::Normal => {
                if let Some(key) = &self.key {
                    warn!(line, key = %key, "ignoring key on NORMAL rule");
                }
                PriceScope::Normal
            }
        };

        Ok(PriceRule::new(product_code, self.min_qty, price, scope))
    }
}

/// Tier and group of one customer, as listed in a customers file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: CustomerId,
    pub tier: Option<String>,
    pub group: Option<String>,
}

impl FromIterator<CustomerRecord> for CustomerAttributes {
    fn from_iter<I: IntoIterator<Item = CustomerRecord>>(records: I) -> Self {
        records
            .into_iter()
            .fold(CustomerAttributes::default(), |mut customers, record| {
                if let Some(tier) = record.tier {
                    customers = customers.with_tier(record.customer_id, tier);
                }
                if let Some(group) = record.group {
                    customers = customers.with_group(record.customer_id, group);
                }
                customers
            })
    }
}

#[derive(Debug, Deserialize)]
struct RequestRow {
    product_id: String,
    quantity: i64,
    customer_id: CustomerId,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    product_id: String,
    price: Option<String>,
    price_type: Option<PriceSource>,
    error: Option<String>,
}

/// A request row that could not be read, kept so the report still has one
/// row per input row.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RejectedRequest {
    /// Normalized code when the product column could be normalized, else its raw text.
    pub product_id: String,
    pub error: CsvError,
}

impl RejectedRequest {
    fn new(raw_product_id: &str, error: CsvError) -> Self {
        let product_id = match ProductCode::normalize(&ProductId::from(raw_product_id)) {
            Ok(code) => code.to_string(),
            Err(_) => raw_product_id.to_string(),
        };
        Self { product_id, error }
    }
}

/// One line of the output report, in input order.
#[derive(Debug)]
pub enum ReportRow {
    Resolved(PriceOutcome),
    Rejected(RejectedRequest),
}

impl From<PriceOutcome> for ReportRow {
    fn from(outcome: PriceOutcome) -> Self {
        ReportRow::Resolved(outcome)
    }
}

impl From<RejectedRequest> for ReportRow {
    fn from(rejected: RejectedRequest) -> Self {
        ReportRow::Rejected(rejected)
    }
}

impl From<&ReportRow> for OutputRow {
    fn from(row: &ReportRow) -> Self {
        match row {
            ReportRow::Rejected(rejected) => OutputRow {
                product_id: rejected.product_id.clone(),
                price: None,
                price_type: None,
                error: Some(rejected.error.to_string()),
            },
            ReportRow::Resolved(PriceOutcome::Quoted(quote)) => OutputRow {
                product_id: quote.product_id.to_string(),
                price: Some(quote.price.to_string()),
                price_type: Some(quote.price_type),
                error: None,
            },
            ReportRow::Resolved(PriceOutcome::Failed { product_id, error }) => OutputRow {
                product_id: product_id.clone(),
                price: None,
                price_type: None,
                error: Some(error.to_string()),
            },
        }
    }
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Deserialize every row of a csv file, tagged with its line number
fn deserialize_rows<T: DeserializeOwned>(
    path: &Path,
) -> Result<impl Iterator<Item = (usize, Result<T, CsvError>)> + use<T>, CsvError> {
    Ok(open_reader(path)?
        .into_deserialize::<T>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            (line, result.map_err(|source| CsvError::Parse { line, source }))
        }))
}

/// Read price rules (`product_id,min_qty,price,source,key`) from a csv file
pub fn read_rules(
    path: &Path,
) -> Result<impl Iterator<Item = Result<PriceRule, CsvError>> + use<>, CsvError> {
    Ok(deserialize_rows::<RuleRow>(path)?
        .map(|(line, row)| row.and_then(|row| row.into_rule(line))))
}

/// Read customer tiers and groups (`customer_id,tier,group`) from a csv file
pub fn read_customers(
    path: &Path,
) -> Result<impl Iterator<Item = Result<CustomerRecord, CsvError>> + use<>, CsvError> {
    Ok(deserialize_rows::<CustomerRecord>(path)?.map(|(_, row)| row))
}

/// Read price requests (`product_id,quantity,customer_id`) from a csv file
///
/// A row that fails to parse is rejected along with whatever its
/// `product_id` column holds.
pub fn read_requests(
    path: &Path,
) -> Result<impl Iterator<Item = Result<PriceRequest, RejectedRequest>> + use<>, CsvError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|source| CsvError::Parse { line: 1, source })?
        .clone();
    let product_column = headers.iter().position(|name| name == "product_id");

    Ok(reader
        .into_records()
        .enumerate()
        .map(move |(idx, record)| {
            let line = idx + 2; // 1-indexed, skip header
            let record = record
                .map_err(|source| RejectedRequest::new("", CsvError::Parse { line, source }))?;
            record
                .deserialize::<RequestRow>(Some(&headers))
                .map(|row| PriceRequest::new(row.product_id, row.quantity, row.customer_id))
                .map_err(|source| {
                    let raw = product_column.and_then(|idx| record.get(idx)).unwrap_or("");
                    RejectedRequest::new(raw, CsvError::Parse { line, source })
                })
        }))
}

/// Write the report in csv format (`product_id,price,price_type,error`)
pub fn write_report<'a>(
    rows: impl IntoIterator<Item = &'a ReportRow>,
    writer: impl io::Write,
) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(writer);

    for row in rows {
        writer.serialize(OutputRow::from(row))?;
    }

    writer.flush()?;
    Ok(())
}
