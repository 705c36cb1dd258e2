//! Receipt
//!
//! Presentation of an [`Allocation`]: either one `<method> <amount>` line per
//! payment method, or a table with a savings summary.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{discounts::round_amount, optimizer::Allocation, orders::Order};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Output could not be written
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// How a receipt is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReceiptFormat {
    /// One `<method> <amount>` line per payment method
    #[default]
    Plain,

    /// Table of amounts followed by totals and savings
    Table,
}

/// Final receipt for an optimised batch.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    allocation: &'a Allocation,
    subtotal: Decimal,
}

impl<'a> Receipt<'a> {
    /// Build a receipt for `allocation`, computed over `orders`.
    pub fn new(orders: &[Order], allocation: &'a Allocation) -> Self {
        Self {
            allocation,
            subtotal: orders.iter().map(Order::value).sum(),
        }
    }

    /// Sum of raw order values, before any discount
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Amount actually paid
    pub fn total(&self) -> Decimal {
        self.allocation.total()
    }

    /// Amount saved through discounts
    pub fn savings(&self) -> Decimal {
        self.subtotal - self.total()
    }

    /// Savings as a percentage of the subtotal, rounded to two places
    pub fn savings_percent(&self) -> Decimal {
        if self.subtotal.is_zero() {
            return Decimal::ZERO;
        }

        round_amount(self.savings() * Decimal::ONE_HUNDRED / self.subtotal)
    }

    /// Write the receipt in the requested format.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing fails.
    pub fn write_to(&self, out: impl io::Write, format: ReceiptFormat) -> Result<(), ReceiptError> {
        match format {
            ReceiptFormat::Plain => self.write_plain(out),
            ReceiptFormat::Table => self.write_table(out),
        }
    }

    /// One `<method> <amount>` line per payment method.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing fails.
    pub fn write_plain(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        for result in self.allocation.results() {
            writeln!(out, "{result}")?;
        }

        Ok(())
    }

    /// Table of amounts followed by a totals summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing fails.
    pub fn write_table(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Payment Method", "Amount"]);

        for result in self.allocation.results() {
            builder.push_record([result.method_id.clone(), format!("{:.2}", result.amount)]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Subtotal: {:.2}", self.subtotal())?;
        writeln!(out, " Total:    {:.2}", self.total())?;
        writeln!(
            out,
            " Savings:  {:.2} ({:.2}%)",
            self.savings(),
            self.savings_percent()
        )?;
        writeln!(
            out,
            " Order:    {}",
            self.allocation.ordering().join(", ")
        )?;
        writeln!(
            out,
            " Strategies: {} tried, {} succeeded",
            self.allocation.strategies_tried(),
            self.allocation.strategies_succeeded()
        )?;

        Ok(())
    }
}
