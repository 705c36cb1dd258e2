//! Batch Optimizer
//!
//! Tries a bounded set of processing orders for the whole batch and keeps the
//! cheapest one that settles every order. This is a heuristic search: for
//! large batches it trades a guarantee of the lowest total for bounded run
//! time.

use rand::{SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::OptimizerConfig,
    ledger::PaymentResult,
    methods::{MethodError, PaymentMethod, PaymentMethods},
    orderings::{Ordering, candidate_orderings},
    orders::Order,
    strategy::{StrategyOutcome, run_strategy},
};

/// Errors surfaced by the batch optimizer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizerError {
    /// Every candidate ordering left at least one order unpaid.
    #[error("no ordering of {orders} orders could be paid in full ({strategies} strategies tried)")]
    BatchInfeasible {
        /// Number of orders in the batch
        orders: usize,

        /// Number of strategies tried
        strategies: usize,
    },

    /// Method definitions could not be assembled into a catalog.
    #[error(transparent)]
    Methods(#[from] MethodError),
}

/// Cheapest complete assignment found for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    results: Vec<PaymentResult>,
    total: Decimal,
    ordering: Vec<String>,
    strategies_tried: usize,
    strategies_succeeded: usize,
}

impl Allocation {
    /// Per-method totals, in catalog order
    pub fn results(&self) -> &[PaymentResult] {
        &self.results
    }

    /// Consume the allocation, keeping only the per-method totals
    pub fn into_results(self) -> Vec<PaymentResult> {
        self.results
    }

    /// Sum of every result's amount
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Order identifiers in the sequence that produced this allocation
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    /// Number of candidate orderings evaluated
    pub fn strategies_tried(&self) -> usize {
        self.strategies_tried
    }

    /// Number of candidate orderings that settled every order
    pub fn strategies_succeeded(&self) -> usize {
        self.strategies_succeeded
    }
}

/// Searches candidate orderings of an order batch for the lowest total cost.
#[derive(Debug, Clone, Default)]
pub struct BatchOptimizer {
    config: OptimizerConfig,
}

impl BatchOptimizer {
    /// Create an optimizer with the given search bounds.
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Search bounds in use
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Find the cheapest complete assignment of `orders` to `methods`.
    ///
    /// Neither argument is modified; every strategy works on its own copy of
    /// the method limits. When several orderings tie on total, the one
    /// generated first wins, whether or not strategies ran in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::BatchInfeasible`] if no candidate ordering
    /// pays for every order.
    #[tracing::instrument(
        name = "optimizer.optimize",
        skip_all,
        fields(orders = orders.len(), methods = methods.len())
    )]
    pub fn optimize(
        &self,
        orders: &[Order],
        methods: &PaymentMethods,
    ) -> Result<Allocation, OptimizerError> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let candidates = candidate_orderings(orders, &self.config, &mut rng);
        let strategies_tried = candidates.len();

        debug!(strategies = strategies_tried, "generated candidate orderings");

        let evaluate = |(index, ordering): (usize, &Ordering)| {
            evaluate_ordering(index, ordering, orders, methods)
        };

        let runs: Vec<Option<(usize, StrategyOutcome)>> = if self.config.sequential {
            candidates.iter().enumerate().map(evaluate).collect()
        } else {
            candidates.par_iter().enumerate().map(evaluate).collect()
        };

        let strategies_succeeded = runs.iter().flatten().count();

        let (index, outcome) = runs
            .into_iter()
            .flatten()
            .min_by(|(a_idx, a), (b_idx, b)| a.total().cmp(&b.total()).then(a_idx.cmp(b_idx)))
            .ok_or(OptimizerError::BatchInfeasible {
                orders: orders.len(),
                strategies: strategies_tried,
            })?;

        let ordering = candidates
            .get(index)
            .map(|ordering| {
                ordering
                    .iter()
                    .filter_map(|idx| orders.get(*idx))
                    .map(|order| order.id().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let allocation = Allocation {
            results: outcome.results(methods),
            total: outcome.total(),
            ordering,
            strategies_tried,
            strategies_succeeded,
        };

        info!(
            total = %allocation.total,
            strategies_tried,
            strategies_succeeded,
            "selected cheapest strategy"
        );

        Ok(allocation)
    }
}

/// Run one candidate ordering, logging and dropping it if it fails.
fn evaluate_ordering(
    index: usize,
    ordering: &Ordering,
    orders: &[Order],
    methods: &PaymentMethods,
) -> Option<(usize, StrategyOutcome)> {
    let sequence = ordering.iter().filter_map(|idx| orders.get(*idx));

    match run_strategy(sequence, methods) {
        Ok(outcome) => Some((index, outcome)),
        Err(error) => {
            debug!(strategy = index, %error, "discarded strategy");
            None
        }
    }
}

/// Assign `orders` to `methods` with the default search bounds.
///
/// # Errors
///
/// - [`OptimizerError::Methods`]: two methods share an identifier.
/// - [`OptimizerError::BatchInfeasible`]: no candidate ordering pays for
///   every order.
pub fn optimize(
    orders: &[Order],
    methods: &[PaymentMethod],
) -> Result<Vec<PaymentResult>, OptimizerError> {
    let catalog = PaymentMethods::from_methods(methods.iter().cloned())?;

    Ok(BatchOptimizer::default()
        .optimize(orders, &catalog)?
        .into_results())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::methods::LOYALTY_METHOD_ID;

    fn amount(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn shop_orders() -> Result<Vec<Order>, crate::orders::OrderError> {
        Ok(vec![
            Order::new("ORDER1", amount(15000), ["mZysk"])?,
            Order::new("ORDER2", amount(20000), ["BosBankrut"])?,
            Order::new("ORDER3", amount(15000), ["mZysk", "BosBankrut"])?,
            Order::new("ORDER4", amount(5000), Vec::<String>::new())?,
        ])
    }

    fn shop_methods(mzysk: i64, bos: i64) -> Result<PaymentMethods, MethodError> {
        PaymentMethods::from_methods([
            PaymentMethod::new(LOYALTY_METHOD_ID, 15, amount(10000))?,
            PaymentMethod::new("mZysk", 10, amount(mzysk))?,
            PaymentMethod::new("BosBankrut", 5, amount(bos))?,
        ])
    }

    #[test]
    fn optimizer_beats_original_order() -> TestResult {
        let orders = shop_orders()?;
        let methods = shop_methods(30000, 25000)?;

        let optimizer = BatchOptimizer::new(OptimizerConfig::default().with_seed(11));
        let allocation = optimizer.optimize(&orders, &methods)?;

        assert_eq!(allocation.total(), amount(50000));

        let replayed = allocation
            .ordering()
            .iter()
            .map(|id| orders.iter().find(|order| order.id() == id.as_str()))
            .collect::<Option<Vec<_>>>()
            .ok_or("winning ordering names an unknown order")?;

        assert_eq!(replayed.len(), orders.len());

        let outcome = run_strategy(replayed, &methods)?;

        assert_eq!(outcome.total(), allocation.total());
        assert_eq!(outcome.results(&methods), allocation.results());
        assert_eq!(allocation.strategies_tried(), 24);
        assert_eq!(allocation.strategies_succeeded(), 24);

        Ok(())
    }

    #[test]
    fn parallel_and_sequential_agree() -> TestResult {
        let orders = shop_orders()?;
        let methods = shop_methods(30000, 25000)?;

        let config = OptimizerConfig::default().with_seed(5);

        let parallel = BatchOptimizer::new(config.clone()).optimize(&orders, &methods)?;
        let sequential = BatchOptimizer::new(config.sequential()).optimize(&orders, &methods)?;

        assert_eq!(parallel, sequential);

        Ok(())
    }

    #[test]
    fn infeasible_batch_is_reported() -> TestResult {
        let orders = shop_orders()?;
        let methods = shop_methods(18000, 20000)?;

        let result = BatchOptimizer::default().optimize(&orders, &methods);

        assert_eq!(
            result,
            Err(OptimizerError::BatchInfeasible {
                orders: 4,
                strategies: 24
            })
        );

        Ok(())
    }

    #[test]
    fn optimize_rejects_duplicate_methods() -> TestResult {
        let orders = shop_orders()?;
        let methods = [
            PaymentMethod::new("CARD1", 0, amount(100_000))?,
            PaymentMethod::new("CARD1", 0, amount(100_000))?,
        ];

        let result = optimize(&orders, &methods);

        assert_eq!(
            result,
            Err(OptimizerError::Methods(MethodError::DuplicateId(
                "CARD1".to_string()
            )))
        );

        Ok(())
    }

    #[test]
    fn empty_batch_pays_nothing() -> TestResult {
        let methods = [PaymentMethod::new("CARD1", 0, amount(100))?];

        assert!(optimize(&[], &methods)?.is_empty());

        Ok(())
    }
}
