//! Orders

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

/// Errors raised when constructing an [`Order`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Order identifiers must not be empty.
    #[error("order identifier must not be empty")]
    EmptyId,

    /// Order values must be strictly positive.
    #[error("order {id} has non-positive value {value}")]
    NonPositiveValue {
        /// Order identifier
        id: String,

        /// Rejected value
        value: Decimal,
    },
}

/// Promotion codes attached to an order.
pub type Promotions = SmallVec<[String; 2]>;

/// A single order awaiting payment.
///
/// Orders are immutable once built; the allocator only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: String,
    value: Decimal,
    promotions: Promotions,
}

impl Order {
    /// Create a new order.
    ///
    /// `promotions` lists the identifiers of payment methods whose configured
    /// discount applies to this order when it is paid in full by that method.
    ///
    /// # Errors
    ///
    /// - [`OrderError::EmptyId`]: `id` is empty.
    /// - [`OrderError::NonPositiveValue`]: `value` is zero or negative.
    pub fn new<I, S>(
        id: impl Into<String>,
        value: Decimal,
        promotions: I,
    ) -> Result<Self, OrderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();

        if id.is_empty() {
            return Err(OrderError::EmptyId);
        }

        if value <= Decimal::ZERO {
            return Err(OrderError::NonPositiveValue { id, value });
        }

        Ok(Self {
            id,
            value,
            promotions: promotions.into_iter().map(Into::into).collect(),
        })
    }

    /// Order identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw order value, before any discount
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Promotion codes, in the order they were supplied
    pub fn promotions(&self) -> &[String] {
        &self.promotions
    }
}
