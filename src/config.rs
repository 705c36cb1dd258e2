//! Optimizer Configuration

use clap::Args;

/// Largest batch searched with random permutations.
pub const DEFAULT_EXHAUSTIVE_THRESHOLD: usize = 8;

/// Maximum number of distinct permutations tried for a small batch.
pub const DEFAULT_PERMUTATION_LIMIT: usize = 1000;

/// Random shuffles tried for a large batch, on top of the fixed orderings.
pub const DEFAULT_RANDOM_SHUFFLES: usize = 5;

/// Search bounds for the batch optimizer.
///
/// These bound the work done per batch; they are not a guarantee that the
/// cheapest possible assignment is found.
#[derive(Debug, Clone, Args)]
pub struct OptimizerConfig {
    /// Batches with at most this many orders are searched with random permutations
    #[arg(long, env = "PAYSPLIT_EXHAUSTIVE_THRESHOLD", default_value_t = DEFAULT_EXHAUSTIVE_THRESHOLD)]
    pub exhaustive_threshold: usize,

    /// Maximum number of distinct permutations tried for a small batch
    #[arg(long, env = "PAYSPLIT_PERMUTATION_LIMIT", default_value_t = DEFAULT_PERMUTATION_LIMIT)]
    pub permutation_limit: usize,

    /// Random shuffles tried for a large batch, after original, descending and ascending order
    #[arg(long, env = "PAYSPLIT_RANDOM_SHUFFLES", default_value_t = DEFAULT_RANDOM_SHUFFLES)]
    pub random_shuffles: usize,

    /// Seed for the ordering generator; random when omitted
    #[arg(long, env = "PAYSPLIT_SEED")]
    pub seed: Option<u64>,

    /// Evaluate strategies one at a time instead of in parallel
    #[arg(long, env = "PAYSPLIT_SEQUENTIAL", default_value_t = false)]
    pub sequential: bool,
}

impl OptimizerConfig {
    /// Use a fixed seed so that repeated runs try the same orderings.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Evaluate strategies on the current thread only.
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.sequential = true;
        self
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            exhaustive_threshold: DEFAULT_EXHAUSTIVE_THRESHOLD,
            permutation_limit: DEFAULT_PERMUTATION_LIMIT,
            random_shuffles: DEFAULT_RANDOM_SHUFFLES,
            seed: None,
            sequential: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        optimizer: OptimizerConfig,
    }

    #[test]
    fn default_matches_reference_bounds() {
        let config = OptimizerConfig::default();

        assert_eq!(config.exhaustive_threshold, 8);
        assert_eq!(config.permutation_limit, 1000);
        assert_eq!(config.random_shuffles, 5);
        assert_eq!(config.seed, None);
        assert!(!config.sequential);
    }

    #[test]
    fn builders_set_seed_and_sequential() {
        let config = OptimizerConfig::default().with_seed(7).sequential();

        assert_eq!(config.seed, Some(7));
        assert!(config.sequential);
    }

    #[test]
    fn parses_from_command_line() -> Result<(), clap::Error> {
        let cli = TestCli::try_parse_from([
            "paysplit",
            "--permutation-limit",
            "50",
            "--seed",
            "42",
            "--sequential",
        ])?;

        assert_eq!(cli.optimizer.permutation_limit, 50);
        assert_eq!(cli.optimizer.seed, Some(42));
        assert!(cli.optimizer.sequential);
        assert_eq!(cli.optimizer.exhaustive_threshold, 8);

        Ok(())
    }
}
