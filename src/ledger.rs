//! Spend Ledger

use std::fmt;

use rust_decimal::Decimal;
use slotmap::SecondaryMap;

use crate::{
    discounts::round_amount,
    methods::{MethodKey, PaymentMethods},
};

/// Amount charged to each method over a strategy run.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    spent: SecondaryMap<MethodKey, Decimal>,
}

impl Ledger {
    /// Add `amount` to a method's running total.
    pub fn record(&mut self, key: MethodKey, amount: Decimal) {
        match self.spent.get_mut(key) {
            Some(spent) => *spent += amount,
            None => {
                self.spent.insert(key, amount);
            }
        }
    }

    /// Amount charged to a method so far, zero if nothing was charged.
    pub fn get(&self, key: MethodKey) -> Decimal {
        self.spent.get(key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Whether nothing has been charged
    pub fn is_empty(&self) -> bool {
        self.spent.values().all(|amount| amount.is_zero())
    }

    /// Sum of every method's rounded, positive spend.
    pub fn total(&self) -> Decimal {
        self.spent
            .values()
            .filter(|amount| **amount > Decimal::ZERO)
            .map(|amount| round_amount(*amount))
            .sum()
    }

    /// Externally visible results: one entry per method with positive spend,
    /// in catalog order, each rounded to two places.
    pub fn results(&self, methods: &PaymentMethods) -> Vec<PaymentResult> {
        methods
            .iter()
            .filter_map(|(key, method)| {
                let amount = self.get(key);

                (amount > Decimal::ZERO).then(|| PaymentResult {
                    method_id: method.id().to_string(),
                    amount: round_amount(amount),
                })
            })
            .collect()
    }
}

/// Total charged to a single payment method across the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResult {
    /// Payment method identifier
    pub method_id: String,

    /// Amount charged, rounded to two decimal places
    pub amount: Decimal,
}

impl fmt::Display for PaymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.method_id, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::methods::PaymentMethod;

    fn methods() -> Result<PaymentMethods, crate::methods::MethodError> {
        PaymentMethods::from_methods([
            PaymentMethod::new("PUNKTY", 15, Decimal::new(10000, 2))?,
            PaymentMethod::new("mZysk", 10, Decimal::new(18000, 2))?,
            PaymentMethod::new("BosBankrut", 5, Decimal::new(20000, 2))?,
        ])
    }

    #[test]
    fn record_accumulates_per_method() -> TestResult {
        let methods = methods()?;
        let key = methods.key_of("mZysk").ok_or("mZysk missing")?;

        let mut ledger = Ledger::default();

        ledger.record(key, Decimal::new(13500, 2));
        ledger.record(key, Decimal::new(4500, 2));

        assert_eq!(ledger.get(key), Decimal::new(18000, 2));
        assert_eq!(ledger.total(), Decimal::new(18000, 2));

        Ok(())
    }

    #[test]
    fn results_skip_unused_methods_and_follow_catalog_order() -> TestResult {
        let methods = methods()?;
        let points = methods.key_of("PUNKTY").ok_or("PUNKTY missing")?;
        let bos = methods.key_of("BosBankrut").ok_or("BosBankrut missing")?;

        let mut ledger = Ledger::default();

        ledger.record(bos, Decimal::new(19000, 2));
        ledger.record(points, Decimal::new(10000, 2));

        assert_eq!(
            ledger.results(&methods),
            [
                PaymentResult {
                    method_id: "PUNKTY".to_string(),
                    amount: Decimal::new(10000, 2),
                },
                PaymentResult {
                    method_id: "BosBankrut".to_string(),
                    amount: Decimal::new(19000, 2),
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn results_round_half_up() -> TestResult {
        let methods = methods()?;
        let key = methods.key_of("mZysk").ok_or("mZysk missing")?;

        let mut ledger = Ledger::default();

        ledger.record(key, Decimal::new(100_005, 3));

        assert_eq!(
            ledger.results(&methods).first().map(|r| r.amount),
            Some(Decimal::new(10001, 2))
        );

        Ok(())
    }

    #[test]
    fn empty_ledger_has_no_results() -> TestResult {
        let methods = methods()?;
        let ledger = Ledger::default();

        assert!(ledger.is_empty());
        assert!(ledger.results(&methods).is_empty());
        assert_eq!(ledger.total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn display_uses_two_decimal_places() {
        let result = PaymentResult {
            method_id: "PUNKTY".to_string(),
            amount: Decimal::new(100, 0),
        };

        assert_eq!(result.to_string(), "PUNKTY 100.00");
    }
}
