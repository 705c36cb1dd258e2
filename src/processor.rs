//! Order Processor

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

use crate::{
    ledger::Ledger,
    methods::{MethodKey, PaymentMethods, RemainingLimits},
    options::{PaymentOption, enumerate_options},
    orders::Order,
};

/// Errors raised while settling a single order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// No payment option fits the remaining limits.
    #[error("order {order_id} cannot be paid with the remaining limits")]
    OrderInfeasible {
        /// Order identifier
        order_id: String,
    },

    /// The chosen option could not be drawn from the limits it was built
    /// from (this is a bug).
    #[error("order processor invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Pick the best option: lowest cost, then lowest card portion.
///
/// Remaining ties go to the option enumerated first.
pub fn select_best(options: &[PaymentOption]) -> Option<&PaymentOption> {
    options
        .iter()
        .min_by(|a, b| a.cost.cmp(&b.cost).then(a.from_card.cmp(&b.from_card)))
}

/// Settle `order` with its best option, drawing from `limits` and recording
/// the spend in `ledger`.
///
/// Nothing is changed when the order cannot be paid or the chosen option
/// cannot be drawn.
///
/// # Errors
///
/// - [`ProcessError::OrderInfeasible`]: no option fits the remaining limits.
/// - [`ProcessError::InvariantViolation`]: the selected option could not be
///   drawn.
pub fn process_order(
    order: &Order,
    methods: &PaymentMethods,
    limits: &mut RemainingLimits,
    ledger: &mut Ledger,
) -> Result<PaymentOption, ProcessError> {
    let options = enumerate_options(order, methods, limits);

    let best = *select_best(&options).ok_or_else(|| ProcessError::OrderInfeasible {
        order_id: order.id().to_string(),
    })?;

    trace!(
        order_id = order.id(),
        cost = %best.cost,
        from_loyalty = %best.from_loyalty,
        from_card = %best.from_card,
        candidates = options.len(),
        "selected payment option"
    );

    settle(&best, methods, limits, ledger)?;

    Ok(best)
}

/// Draw both portions of `option` and record them, or change nothing.
fn settle(
    option: &PaymentOption,
    methods: &PaymentMethods,
    limits: &mut RemainingLimits,
    ledger: &mut Ledger,
) -> Result<(), ProcessError> {
    let mut draws: SmallVec<[(MethodKey, Decimal); 2]> = SmallVec::new();

    if option.from_loyalty > Decimal::ZERO {
        let loyalty = methods.loyalty().ok_or(ProcessError::InvariantViolation {
            message: "loyalty portion chosen without a loyalty method",
        })?;

        if !limits.covers(loyalty, option.from_loyalty) {
            return Err(ProcessError::InvariantViolation {
                message: "loyalty portion exceeds remaining limit",
            });
        }

        draws.push((loyalty, option.from_loyalty));
    }

    if option.from_card > Decimal::ZERO {
        let card = option.target.card();

        if !limits.covers(card, option.from_card) {
            return Err(ProcessError::InvariantViolation {
                message: "card portion exceeds remaining limit",
            });
        }

        draws.push((card, option.from_card));
    }

    for (key, amount) in draws {
        if limits.draw(key, amount) {
            ledger.record(key, amount);
        }
    }

    Ok(())
}
