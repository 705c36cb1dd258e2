//! Strategy Runner
//!
//! A strategy is one pass of the order processor over a specific ordering of
//! the batch. Each run starts from a fresh copy of the method limits and an
//! empty ledger, and either settles every order or produces nothing.

use rust_decimal::Decimal;

use crate::{
    ledger::{Ledger, PaymentResult},
    methods::{PaymentMethods, RemainingLimits},
    orders::Order,
    processor::{ProcessError, process_order},
};

/// Completed strategy run.
#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    ledger: Ledger,
    limits: RemainingLimits,
}

impl StrategyOutcome {
    /// Sum of every method's rounded spend
    pub fn total(&self) -> Decimal {
        self.ledger.total()
    }

    /// Per-method spend
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Limits left over once every order was settled
    pub fn remaining(&self) -> &RemainingLimits {
        &self.limits
    }

    /// Rounded, positive per-method results in catalog order.
    pub fn results(&self, methods: &PaymentMethods) -> Vec<PaymentResult> {
        self.ledger.results(methods)
    }
}

/// Settle `orders` in sequence against a private copy of `methods`' limits.
///
/// # Errors
///
/// Returns the first [`ProcessError`] hit; the partial ledger built up to
/// that point is discarded.
pub fn run_strategy<'a>(
    orders: impl IntoIterator<Item = &'a Order>,
    methods: &PaymentMethods,
) -> Result<StrategyOutcome, ProcessError> {
    let mut limits = methods.limits();
    let mut ledger = Ledger::default();

    for order in orders {
        process_order(order, methods, &mut limits, &mut ledger)?;
    }

    Ok(StrategyOutcome { ledger, limits })
}
