//! Integration tests for single-order payment selection

use rust_decimal::Decimal;
use testresult::TestResult;

use paysplit::{
    ledger::PaymentResult,
    methods::{LOYALTY_METHOD_ID, PaymentMethod},
    optimizer::optimize,
    orders::Order,
};

fn amount(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn paid(method_id: &str, cents: i64) -> PaymentResult {
    PaymentResult {
        method_id: method_id.to_string(),
        amount: amount(cents),
    }
}

#[test]
fn promotion_card_discount_without_loyalty() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), ["CARD1"])?];
    let methods = [PaymentMethod::new("CARD1", 10, amount(20000))?];

    assert_eq!(optimize(&orders, &methods)?, vec![paid("CARD1", 9000)]);

    Ok(())
}

#[test]
fn full_loyalty_payment() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), Vec::<String>::new())?];
    let methods = [PaymentMethod::new(LOYALTY_METHOD_ID, 15, amount(20000))?];

    assert_eq!(
        optimize(&orders, &methods)?,
        vec![paid(LOYALTY_METHOD_ID, 8500)]
    );

    Ok(())
}

#[test]
fn partial_loyalty_tops_up_with_card() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), Vec::<String>::new())?];
    let methods = [
        PaymentMethod::new(LOYALTY_METHOD_ID, 15, amount(2000))?,
        PaymentMethod::new("CARD1", 0, amount(20000))?,
    ];

    assert_eq!(
        optimize(&orders, &methods)?,
        vec![paid(LOYALTY_METHOD_ID, 2000), paid("CARD1", 7000)]
    );

    Ok(())
}

#[test]
fn partial_loyalty_uses_every_available_point() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), Vec::<String>::new())?];
    let methods = [
        PaymentMethod::new(LOYALTY_METHOD_ID, 15, amount(5000))?,
        PaymentMethod::new("CARD1", 0, amount(20000))?,
    ];

    assert_eq!(
        optimize(&orders, &methods)?,
        vec![paid(LOYALTY_METHOD_ID, 5000), paid("CARD1", 4000)]
    );

    Ok(())
}

#[test]
fn partial_loyalty_needs_a_tenth_of_the_order() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), Vec::<String>::new())?];

    for limit in [500, 999] {
        let methods = [
            PaymentMethod::new(LOYALTY_METHOD_ID, 15, amount(limit))?,
            PaymentMethod::new("CARD1", 0, amount(20000))?,
        ];

        assert_eq!(
            optimize(&orders, &methods)?,
            vec![paid("CARD1", 10000)],
            "loyalty limit {limit} should not be used"
        );
    }

    Ok(())
}

#[test]
fn partial_loyalty_accepts_exactly_a_tenth() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), Vec::<String>::new())?];
    let methods = [
        PaymentMethod::new(LOYALTY_METHOD_ID, 15, amount(1000))?,
        PaymentMethod::new("CARD1", 0, amount(20000))?,
    ];

    assert_eq!(
        optimize(&orders, &methods)?,
        vec![paid(LOYALTY_METHOD_ID, 1000), paid("CARD1", 8000)]
    );

    Ok(())
}

#[test]
fn loyalty_wins_ties_with_cards() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), ["CARD1"])?];
    let methods = [
        PaymentMethod::new("CARD1", 10, amount(20000))?,
        PaymentMethod::new(LOYALTY_METHOD_ID, 10, amount(20000))?,
    ];

    assert_eq!(
        optimize(&orders, &methods)?,
        vec![paid(LOYALTY_METHOD_ID, 9000)]
    );

    Ok(())
}

#[test]
fn unknown_promotion_pays_full_price() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), ["CARD2"])?];
    let methods = [PaymentMethod::new("CARD1", 10, amount(20000))?];

    assert_eq!(optimize(&orders, &methods)?, vec![paid("CARD1", 10000)]);

    Ok(())
}

#[test]
fn unlisted_card_pays_full_price() -> TestResult {
    let orders = [Order::new("ORDER1", amount(10000), ["CARD2"])?];
    let methods = [
        PaymentMethod::new("CARD1", 10, amount(20000))?,
        PaymentMethod::new("CARD2", 5, amount(1000))?,
    ];

    assert_eq!(optimize(&orders, &methods)?, vec![paid("CARD1", 10000)]);

    Ok(())
}
