//! Paysplit
//!
//! Paysplit assigns every order in a batch to payment methods (bank cards and a
//! loyalty points balance) so that the total paid is as low as possible while
//! no method is charged beyond its limit.

pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod ledger;
pub mod methods;
pub mod observability;
pub mod optimizer;
pub mod options;
pub mod orderings;
pub mod orders;
pub mod prelude;
pub mod processor;
pub mod receipt;
pub mod strategy;
