//! Fixtures
//!
//! Loads order batches and payment method definitions from disk. JSON files
//! hold a bare array of records; YAML fixture sets wrap the records in an
//! `orders:` or `methods:` key and live under `fixtures/<kind>/<name>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    methods::{MethodError, PaymentMethod, PaymentMethods},
    orders::{Order, OrderError},
};

pub mod methods;
pub mod orders;

use self::{
    methods::{MethodFixture, MethodsFixture},
    orders::{OrderFixture, OrdersFixture},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// File extension is not one of `json`, `yml` or `yaml`
    #[error("Unsupported fixture format: {0}")]
    UnsupportedFormat(String),

    /// Invalid amount format
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid discount percentage
    #[error("Invalid discount percentage: {0}")]
    InvalidDiscount(String),

    /// Order record could not be turned into an order
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Method record could not be turned into a payment method
    #[error(transparent)]
    Method(#[from] MethodError),
}

/// Serialisation format of a fixture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    /// Bare JSON array of records
    Json,

    /// YAML document with a wrapping key
    Yaml,
}

impl FixtureFormat {
    /// Pick the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            _ => Err(FixtureError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Numeric field kept as the exact text written in the source document.
///
/// Amounts never pass through binary floating point on their way to a
/// [`Decimal`].
pub trait Scalar {
    /// Source text, trimmed
    fn as_text(&self) -> String;
}

/// YAML scalars are read as raw text, whether or not they are quoted.
impl Scalar for String {
    fn as_text(&self) -> String {
        self.trim().to_string()
    }
}

/// Amount or percentage in a JSON document: a string or a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonScalar {
    /// Quoted value, e.g. `"150.00"`
    Text(String),

    /// Bare number with its digits preserved, e.g. `150.5`
    Number(serde_json::Number),
}

impl Scalar for JsonScalar {
    fn as_text(&self) -> String {
        match self {
            JsonScalar::Text(text) => text.trim().to_string(),
            JsonScalar::Number(number) => number.to_string(),
        }
    }
}

/// Parse an amount such as `"150.00"` or `1.5e2` into an exact decimal.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidAmount`] if the value is not a decimal number.
pub fn parse_amount(value: &impl Scalar) -> Result<Decimal, FixtureError> {
    let text = value.as_text();

    text.parse::<Decimal>()
        .or_else(|_err| Decimal::from_scientific(&text))
        .map_err(|_err| FixtureError::InvalidAmount(text))
}

/// Parse a whole-number discount percentage such as `"10"` or `10`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidDiscount`] if the value is not a whole
/// number between 0 and 100.
pub fn parse_discount(value: &impl Scalar) -> Result<u8, FixtureError> {
    let text = value.as_text();

    text.parse::<u8>()
        .ok()
        .filter(|discount| *discount <= 100)
        .ok_or(FixtureError::InvalidDiscount(text))
}

/// Parse an order batch.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed or any record is invalid.
pub fn parse_orders(contents: &str, format: FixtureFormat) -> Result<Vec<Order>, FixtureError> {
    match format {
        FixtureFormat::Json => {
            into_orders(serde_json::from_str::<Vec<OrderFixture<JsonScalar>>>(contents)?)
        }
        FixtureFormat::Yaml => into_orders(serde_norway::from_str::<OrdersFixture>(contents)?.orders),
    }
}

/// Parse payment method definitions into a catalog.
///
/// # Errors
///
/// Returns an error if the document cannot be parsed, any record is invalid,
/// or two records share an identifier.
pub fn parse_methods(
    contents: &str,
    format: FixtureFormat,
) -> Result<PaymentMethods, FixtureError> {
    match format {
        FixtureFormat::Json => {
            into_catalog(serde_json::from_str::<Vec<MethodFixture<JsonScalar>>>(contents)?)
        }
        FixtureFormat::Yaml => {
            into_catalog(serde_norway::from_str::<MethodsFixture>(contents)?.methods)
        }
    }
}

fn into_orders<V: Scalar>(records: Vec<OrderFixture<V>>) -> Result<Vec<Order>, FixtureError> {
    records.into_iter().map(Order::try_from).collect()
}

fn into_catalog<V: Scalar>(
    records: Vec<MethodFixture<V>>,
) -> Result<PaymentMethods, FixtureError> {
    let mut catalog = PaymentMethods::new();

    for record in records {
        catalog.insert(PaymentMethod::try_from(record)?)?;
    }

    Ok(catalog)
}

/// Load an order batch from a JSON or YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<Order>, FixtureError> {
    let path = path.as_ref();
    let format = FixtureFormat::from_path(path)?;

    parse_orders(&fs::read_to_string(path)?, format)
}

/// Load payment method definitions from a JSON or YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_methods(path: impl AsRef<Path>) -> Result<PaymentMethods, FixtureError> {
    let path = path.as_ref();
    let format = FixtureFormat::from_path(path)?;

    parse_methods(&fs::read_to_string(path)?, format)
}

/// A named set of orders and payment methods.
#[derive(Debug)]
pub struct Fixture {
    orders: Vec<Order>,
    methods: PaymentMethods,
}

impl Fixture {
    /// Default location of fixture sets
    pub fn base_path() -> PathBuf {
        PathBuf::from("./fixtures")
    }

    /// Load `orders/<name>.yml` and `methods/<name>.yml` from the default
    /// fixture directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in(Self::base_path(), name)
    }

    /// Load a fixture set from a custom directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded.
    pub fn from_set_in(base_path: impl AsRef<Path>, name: &str) -> Result<Self, FixtureError> {
        let base_path = base_path.as_ref();

        Ok(Self {
            orders: load_orders(base_path.join("orders").join(format!("{name}.yml")))?,
            methods: load_methods(base_path.join("methods").join(format!("{name}.yml")))?,
        })
    }

    /// Orders in file order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Payment method catalog
    pub fn methods(&self) -> &PaymentMethods {
        &self.methods
    }
}
