//! Order Fixtures

use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, Scalar, parse_amount},
    orders::Order,
};

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Orders, in processing order
    pub orders: Vec<OrderFixture>,
}

/// Order Fixture
///
/// `V` is how the value is read: raw text for YAML,
/// [`JsonScalar`](crate::fixtures::JsonScalar) for JSON.
#[derive(Debug, Deserialize)]
pub struct OrderFixture<V = String> {
    /// Order identifier
    pub id: String,

    /// Order value (e.g., "150.00")
    pub value: V,

    /// Payment method identifiers that discount this order
    #[serde(default)]
    pub promotions: Option<Vec<String>>,
}

impl<V: Scalar> TryFrom<OrderFixture<V>> for Order {
    type Error = FixtureError;

    fn try_from(fixture: OrderFixture<V>) -> Result<Self, Self::Error> {
        let value = parse_amount(&fixture.value)?;

        Ok(Order::new(
            fixture.id,
            value,
            fixture.promotions.unwrap_or_default(),
        )?)
    }
}
