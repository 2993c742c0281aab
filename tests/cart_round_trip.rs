//! End-to-end: file-persisted cart surviving a reload, then checked out.

use std::sync::Arc;

use jiff::civil::date;
use testresult::TestResult;

use kilima::{
    cart::store::CartStore,
    checkout::{CheckoutFlow, CheckoutForm},
    notifications::NoopSink,
    orders::{IntentStatus, MockOrdersGateway, OrderRecord},
    persistence::FileSlot,
    products::{ProductDescriptor, ProductKind},
};

#[tokio::test]
async fn cart_survives_reload_and_checks_out() -> TestResult {
    let dir = tempfile::tempdir()?;

    // First "session": fill the cart.
    {
        let mut store = CartStore::new(Box::new(FileSlot::in_dir(dir.path())));
        store.add(&ProductDescriptor::new(
            "safari-1",
            ProductKind::Tour,
            "Serengeti 3-Day",
            900,
        ));
        store.add(&ProductDescriptor::new(
            "transfer-9",
            ProductKind::Transfer,
            "Airport pickup",
            60,
        ));
    }

    // Second "session": reload and submit.
    let mut store = CartStore::new(Box::new(FileSlot::in_dir(dir.path())));

    assert_eq!(store.cart().item_count(), 2);
    assert_eq!(store.cart().subtotal(), 960);

    let mut gateway = MockOrdersGateway::new();
    gateway.expect_insert().times(2).returning(|_| {
        Ok(OrderRecord {
            id: uuid::Uuid::now_v7(),
            status: IntentStatus::Pending,
        })
    });

    let flow = CheckoutFlow::new(Arc::new(gateway), Arc::new(NoopSink));

    let form = CheckoutForm {
        name: "Asha Mrema".to_owned(),
        email: "asha@example.com".to_owned(),
        phone: "+255 700 000 001".to_owned(),
        travel_date: Some(date(2026, 9, 14)),
        guests: None,
        notes: None,
    };

    let confirmation = flow.submit(&mut store, &form).await?;

    assert_eq!(confirmation.total, 960);

    // The cleared cart is what a third session sees.
    let reloaded = CartStore::new(Box::new(FileSlot::in_dir(dir.path())));

    assert!(reloaded.cart().is_empty());

    Ok(())
}
