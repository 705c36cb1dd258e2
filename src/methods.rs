//! Payment Methods

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use slotmap::{SecondaryMap, SlotMap, new_key_type};
use thiserror::Error;

/// Identifier reserved for the loyalty points method.
pub const LOYALTY_METHOD_ID: &str = "PUNKTY";

new_key_type! {
    /// Payment Method Key
    pub struct MethodKey;
}

/// Errors raised when constructing payment methods or a method catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MethodError {
    /// Method identifiers must not be empty.
    #[error("payment method identifier must not be empty")]
    EmptyId,

    /// Discount percentages must lie within `0..=100`.
    #[error("payment method {id} has discount {discount}%, expected 0-100")]
    DiscountOutOfRange {
        /// Method identifier
        id: String,

        /// Rejected discount
        discount: u8,
    },

    /// Limits must not be negative.
    #[error("payment method {id} has negative limit {limit}")]
    NegativeLimit {
        /// Method identifier
        id: String,

        /// Rejected limit
        limit: Decimal,
    },

    /// Two methods share an identifier.
    #[error("payment method {0} is defined more than once")]
    DuplicateId(String),
}

/// A payment method definition as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    id: String,
    discount: u8,
    limit: Decimal,
}

impl PaymentMethod {
    /// Create a new payment method.
    ///
    /// # Errors
    ///
    /// - [`MethodError::EmptyId`]: `id` is empty.
    /// - [`MethodError::DiscountOutOfRange`]: `discount` is above 100.
    /// - [`MethodError::NegativeLimit`]: `limit` is below zero.
    pub fn new(id: impl Into<String>, discount: u8, limit: Decimal) -> Result<Self, MethodError> {
        let id = id.into();

        if id.is_empty() {
            return Err(MethodError::EmptyId);
        }

        if discount > 100 {
            return Err(MethodError::DiscountOutOfRange { id, discount });
        }

        if limit < Decimal::ZERO {
            return Err(MethodError::NegativeLimit { id, limit });
        }

        Ok(Self {
            id,
            discount,
            limit,
        })
    }

    /// Method identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Discount percentage, `0..=100`
    pub fn discount(&self) -> u8 {
        self.discount
    }

    /// Spending limit available at the start of a batch
    pub fn limit(&self) -> Decimal {
        self.limit
    }

    /// Whether this is the reserved loyalty points method.
    pub fn is_loyalty(&self) -> bool {
        self.id == LOYALTY_METHOD_ID
    }
}

/// Read-only catalog of payment method definitions.
///
/// Iteration follows insertion order, which is also the order options are
/// enumerated in and therefore the final tie-break between equal options.
#[derive(Debug, Clone, Default)]
pub struct PaymentMethods {
    methods: SlotMap<MethodKey, PaymentMethod>,
    keys: FxHashMap<String, MethodKey>,
    loyalty: Option<MethodKey>,
}

impl PaymentMethods {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MethodError::DuplicateId`] if a method with the same
    /// identifier is already present.
    pub fn insert(&mut self, method: PaymentMethod) -> Result<MethodKey, MethodError> {
        if self.keys.contains_key(method.id()) {
            return Err(MethodError::DuplicateId(method.id().to_string()));
        }

        let id = method.id().to_string();
        let is_loyalty = method.is_loyalty();
        let key = self.methods.insert(method);

        if is_loyalty {
            self.loyalty = Some(key);
        }

        self.keys.insert(id, key);

        Ok(key)
    }

    /// Build a catalog from a list of method definitions.
    ///
    /// # Errors
    ///
    /// Returns [`MethodError::DuplicateId`] if two methods share an identifier.
    pub fn from_methods(
        methods: impl IntoIterator<Item = PaymentMethod>,
    ) -> Result<Self, MethodError> {
        let mut catalog = Self::new();

        for method in methods {
            catalog.insert(method)?;
        }

        Ok(catalog)
    }

    /// Get a method by key
    pub fn get(&self, key: MethodKey) -> Option<&PaymentMethod> {
        self.methods.get(key)
    }

    /// Look up a method key by identifier
    pub fn key_of(&self, id: &str) -> Option<MethodKey> {
        self.keys.get(id).copied()
    }

    /// Key of the loyalty points method, if configured
    pub fn loyalty(&self) -> Option<MethodKey> {
        self.loyalty
    }

    /// Iterate over all methods in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MethodKey, &PaymentMethod)> {
        self.methods.iter()
    }

    /// Iterate over every method except the loyalty method, in insertion order.
    pub fn cards(&self) -> impl Iterator<Item = (MethodKey, &PaymentMethod)> {
        self.methods.iter().filter(|(_, method)| !method.is_loyalty())
    }

    /// Number of methods in the catalog
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Fresh working copy of every method's starting limit.
    pub fn limits(&self) -> RemainingLimits {
        RemainingLimits {
            remaining: self
                .methods
                .iter()
                .map(|(key, method)| (key, method.limit()))
                .collect(),
        }
    }
}

/// Mutable per-run copy of each method's remaining limit.
///
/// Every strategy run owns its own copy; the catalog it was taken from is
/// never touched.
#[derive(Debug, Clone, Default)]
pub struct RemainingLimits {
    remaining: SecondaryMap<MethodKey, Decimal>,
}

impl RemainingLimits {
    /// Remaining limit for a method, or zero for unknown keys.
    pub fn get(&self, key: MethodKey) -> Decimal {
        self.remaining.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Whether `key` still has at least `amount` available.
    pub fn covers(&self, key: MethodKey, amount: Decimal) -> bool {
        self.remaining
            .get(key)
            .is_some_and(|remaining| *remaining >= amount)
    }

    /// Draw `amount` from a method's remaining limit.
    ///
    /// Returns `false` without changing anything if the method is unknown or
    /// the draw would take its limit below zero.
    pub fn draw(&mut self, key: MethodKey, amount: Decimal) -> bool {
        match self.remaining.get_mut(key) {
            Some(remaining) if *remaining >= amount => {
                *remaining -= amount;
                true
            }
            _ => false,
        }
    }

    /// Replace a method's remaining limit.
    ///
    /// Returns `false` without changing anything if `amount` is negative.
    pub fn set(&mut self, key: MethodKey, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }

        self.remaining.insert(key, amount);
        true
    }

    /// Iterate over remaining limits
    pub fn iter(&self) -> impl Iterator<Item = (MethodKey, Decimal)> + '_ {
        self.remaining.iter().map(|(key, amount)| (key, *amount))
    }
}
