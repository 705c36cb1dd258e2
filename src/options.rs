//! Payment Options
//!
//! Enumerates every feasible way to pay a single order against a snapshot of
//! the remaining method limits. Enumeration never mutates the snapshot and
//! never ranks the options; that is left to [`crate::processor`].

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    discounts::{
        COMBINATION_DISCOUNT_PERCENT, COMBINATION_MINIMUM_PERCENT, apply_discount, percent_of,
    },
    methods::{MethodKey, PaymentMethods, RemainingLimits},
    orders::Order,
};

/// Options generated for a single order.
pub type PaymentOptions = SmallVec<[PaymentOption; 8]>;

/// What a [`PaymentOption`] charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentTarget {
    /// Paid entirely by one method (the loyalty method or a card).
    Method(MethodKey),

    /// Split between loyalty points and this card.
    LoyaltyWithCard(MethodKey),
}

impl PaymentTarget {
    /// The method any non-loyalty portion of the payment is charged to.
    pub fn card(self) -> MethodKey {
        match self {
            PaymentTarget::Method(key) | PaymentTarget::LoyaltyWithCard(key) => key,
        }
    }
}

/// One feasible way to pay an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOption {
    /// Method (or loyalty + card combination) charged
    pub target: PaymentTarget,

    /// Total amount paid after discount
    pub cost: Decimal,

    /// Portion of `cost` drawn from loyalty points
    pub from_loyalty: Decimal,

    /// Portion of `cost` charged to a card
    pub from_card: Decimal,
}

impl PaymentOption {
    fn loyalty_only(key: MethodKey, cost: Decimal) -> Self {
        Self {
            target: PaymentTarget::Method(key),
            cost,
            from_loyalty: cost,
            from_card: Decimal::ZERO,
        }
    }

    fn card_only(key: MethodKey, cost: Decimal) -> Self {
        Self {
            target: PaymentTarget::Method(key),
            cost,
            from_loyalty: Decimal::ZERO,
            from_card: cost,
        }
    }
}

/// Enumerate every feasible payment option for `order`.
///
/// Options are produced in a fixed sequence:
///
/// 1. Full loyalty payment, at the loyalty method's own discount.
/// 2. Loyalty points combined with each card, at the fixed combination rate,
///    when the loyalty balance covers at least the minimum share of the order.
/// 3. Each promoted card (in promotion order) at that card's discount.
/// 4. Each card at full price.
///
/// Within each step methods are visited in catalog insertion order. An empty
/// result means the order cannot be paid under `limits`.
pub fn enumerate_options(
    order: &Order,
    methods: &PaymentMethods,
    limits: &RemainingLimits,
) -> PaymentOptions {
    let mut options = PaymentOptions::new();
    let value = order.value();

    if let Some((loyalty, discount)) = methods
        .loyalty()
        .and_then(|key| methods.get(key).map(|method| (key, method.discount())))
    {
        if limits.covers(loyalty, value) {
            options.push(PaymentOption::loyalty_only(
                loyalty,
                apply_discount(value, discount),
            ));
        }

        push_combination_options(&mut options, value, loyalty, methods, limits);
    }

    for promotion in order.promotions() {
        let Some(key) = methods.key_of(promotion) else {
            continue;
        };

        let Some(method) = methods.get(key) else {
            continue;
        };

        if method.is_loyalty() || !limits.covers(key, value) {
            continue;
        }

        options.push(PaymentOption::card_only(
            key,
            apply_discount(value, method.discount()),
        ));
    }

    options.extend(
        methods
            .cards()
            .filter(|(key, _)| limits.covers(*key, value))
            .map(|(key, _)| PaymentOption::card_only(key, value)),
    );

    options
}

/// Loyalty points (as many as available) plus one card for the remainder.
fn push_combination_options(
    options: &mut PaymentOptions,
    value: Decimal,
    loyalty: MethodKey,
    methods: &PaymentMethods,
    limits: &RemainingLimits,
) {
    let minimum = percent_of(value, COMBINATION_MINIMUM_PERCENT);

    if !limits.covers(loyalty, minimum) {
        return;
    }

    let cost = apply_discount(value, COMBINATION_DISCOUNT_PERCENT);
    let from_loyalty = cost.min(limits.get(loyalty));
    let from_card = cost - from_loyalty;

    options.extend(
        methods
            .cards()
            .filter(|(key, _)| limits.covers(*key, from_card))
            .map(|(key, _)| PaymentOption {
                target: PaymentTarget::LoyaltyWithCard(key),
                cost,
                from_loyalty,
                from_card,
            }),
    );
}
