//! Integration tests for order and payment method sources

use rust_decimal::Decimal;
use testresult::TestResult;

use paysplit::{
    fixtures::{Fixture, load_methods, load_orders},
    methods::LOYALTY_METHOD_ID,
    optimizer::BatchOptimizer,
};

#[test]
fn json_and_yaml_sources_agree() -> TestResult {
    let fixture = Fixture::from_set("shop")?;

    let orders = load_orders("demos/orders.json")?;
    let methods = load_methods("demos/paymentmethods.json")?;

    assert_eq!(orders, fixture.orders());

    let json_methods: Vec<_> = methods.iter().map(|(_, m)| m.clone()).collect();
    let yaml_methods: Vec<_> = fixture.methods().iter().map(|(_, m)| m.clone()).collect();

    assert_eq!(json_methods, yaml_methods);

    Ok(())
}

#[test]
fn demo_batch_loads_and_optimises() -> TestResult {
    let orders = load_orders("demos/orders.json")?;
    let methods = load_methods("demos/paymentmethods.json")?;

    assert_eq!(orders.len(), 4);
    assert!(methods.loyalty().is_some());

    let order4 = orders.get(3).ok_or("ORDER4 missing")?;

    assert_eq!(order4.id(), "ORDER4");
    assert_eq!(order4.value(), Decimal::new(5000, 2));
    assert!(order4.promotions().is_empty());

    let allocation = BatchOptimizer::default().optimize(&orders, &methods)?;

    assert_eq!(allocation.total(), Decimal::new(50000, 2));
    assert!(
        allocation
            .results()
            .iter()
            .any(|result| result.method_id == LOYALTY_METHOD_ID)
    );

    Ok(())
}

#[test]
fn missing_fixture_set_is_an_error() {
    assert!(Fixture::from_set("does-not-exist").is_err());
}
