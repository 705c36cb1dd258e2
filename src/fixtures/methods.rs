//! Payment Method Fixtures

use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, Scalar, parse_amount, parse_discount},
    methods::PaymentMethod,
};

/// Wrapper for payment methods in YAML
#[derive(Debug, Deserialize)]
pub struct MethodsFixture {
    /// Payment methods, in catalog order
    pub methods: Vec<MethodFixture>,
}

/// Payment Method Fixture
///
/// `V` is how numbers are read: raw text for YAML,
/// [`JsonScalar`](crate::fixtures::JsonScalar) for JSON.
#[derive(Debug, Deserialize)]
pub struct MethodFixture<V = String> {
    /// Method identifier
    pub id: String,

    /// Whole-number discount percentage (e.g., "10")
    pub discount: V,

    /// Spending limit (e.g., "180.00")
    pub limit: V,
}

impl<V: Scalar> TryFrom<MethodFixture<V>> for PaymentMethod {
    type Error = FixtureError;

    fn try_from(fixture: MethodFixture<V>) -> Result<Self, Self::Error> {
        let discount = parse_discount(&fixture.discount)?;
        let limit = parse_amount(&fixture.limit)?;

        Ok(PaymentMethod::new(fixture.id, discount, limit)?)
    }
}
