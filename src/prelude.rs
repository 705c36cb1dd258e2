//! Paysplit prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    config::OptimizerConfig,
    fixtures::{Fixture, FixtureError, load_methods, load_orders},
    ledger::{Ledger, PaymentResult},
    methods::{LOYALTY_METHOD_ID, MethodError, MethodKey, PaymentMethod, PaymentMethods},
    optimizer::{Allocation, BatchOptimizer, OptimizerError, optimize},
    options::{PaymentOption, PaymentTarget},
    orders::{Order, OrderError},
    processor::ProcessError,
    receipt::{Receipt, ReceiptError, ReceiptFormat},
};
