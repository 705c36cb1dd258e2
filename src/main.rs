//! Paysplit
//!
//! Reads a batch of orders and a set of payment methods, then prints how much
//! to charge to each method so that the whole batch costs as little as
//! possible.
//!
//! ```text
//! paysplit orders.json paymentmethods.json
//! paysplit fixtures/orders/shop.yml fixtures/methods/shop.yml --format table
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::{error, info};

use paysplit::{
    config::OptimizerConfig,
    fixtures::{load_methods, load_orders},
    observability::{LoggingConfig, init_logging},
    optimizer::BatchOptimizer,
    receipt::{Receipt, ReceiptFormat},
};

/// Assign a batch of orders to payment methods at the lowest total cost
#[derive(Debug, Parser)]
#[command(name = "paysplit", version, about)]
struct Cli {
    /// Orders file (`.json`, `.yml` or `.yaml`)
    orders: PathBuf,

    /// Payment methods file (`.json`, `.yml` or `.yaml`)
    methods: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReceiptFormat::Plain)]
    format: ReceiptFormat,

    #[command(flatten)]
    optimizer: OptimizerConfig,

    #[command(flatten)]
    logging: LoggingConfig,
}

fn main() -> ExitCode {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(source) = init_logging(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{source}");
        }

        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(source) => {
            error!("{source:#}");

            #[expect(
                clippy::print_stderr,
                reason = "the failure must reach the user whatever the log level"
            )]
            {
                eprintln!("error: {source:#}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let orders = load_orders(&cli.orders)?;
    let methods = load_methods(&cli.methods)?;

    info!(
        orders = orders.len(),
        methods = methods.len(),
        "loaded batch"
    );

    let start = Instant::now();

    let allocation = BatchOptimizer::new(cli.optimizer.clone()).optimize(&orders, &methods)?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(&orders, &allocation).write_to(&mut handle, cli.format)?;

    if cli.format == ReceiptFormat::Table {
        writeln!(
            handle,
            " {} ({}s)",
            elapsed.human(Truncate::Nano),
            elapsed.as_secs_f32()
        )?;
    }

    Ok(())
}
