//! Integration tests for the cart reconciliation flow.
//!
//! These tests require:
//! - A running API gateway (`MEDICART_GATEWAY_URL`, default localhost:8080)
//! - The cart-orders service behind it and a seeded catalog
//! - Seeded demo user credentials (`MEDICART_TEST_EMAIL` / `_PASSWORD`)
//!
//! Run with: `cargo test -p medicart-integration-tests -- --ignored`

use medicart_client::{CartStatus, CartStore};
use medicart_core::Email;

use medicart_integration_tests::{test_client, test_credentials};

async fn logged_in_store() -> (CartStore, medicart_client::GatewayClient) {
    let (client, _session, _log) = test_client();
    let (email, password) = test_credentials();
    client
        .login(&Email::parse(&email).expect("valid email"), &password)
        .await
        .expect("login");
    client.clear_cart().await.expect("clear cart");
    (CartStore::new(client.clone()), client)
}

async fn first_catalog_medicine(
    client: &medicart_client::GatewayClient,
) -> medicart_core::MedicineId {
    let medicines = client.list_medicines().await.expect("catalog fetch");
    medicines.first().expect("seeded catalog").id
}

#[tokio::test]
#[ignore = "Requires running gateway with seeded catalog"]
async fn test_add_then_refresh_reflects_server_cart() {
    let (store, client) = logged_in_store().await;
    let medicine_id = first_catalog_medicine(&client).await;

    store.add(medicine_id).await.expect("add");

    let state = store.state().await;
    assert_eq!(state.status, CartStatus::Succeeded);
    let line = state
        .items
        .iter()
        .find(|i| i.product.id == medicine_id)
        .expect("added line present after refresh");
    assert_eq!(line.qty, 1);
}

#[tokio::test]
#[ignore = "Requires running gateway with seeded catalog"]
async fn test_increment_then_decrement_round_trips_quantity() {
    let (store, client) = logged_in_store().await;
    let medicine_id = first_catalog_medicine(&client).await;

    store.add(medicine_id).await.expect("add");
    store.increment(medicine_id).await.expect("increment");

    let qty = |state: &medicart_client::CartState| {
        state
            .items
            .iter()
            .find(|i| i.product.id == medicine_id)
            .map(|i| i.qty)
    };

    assert_eq!(qty(&store.state().await), Some(2));

    // qty > 1: decrement updates the line by its line-item id
    store.decrement(medicine_id).await.expect("decrement");
    assert_eq!(qty(&store.state().await), Some(1));

    // qty == 1: decrement removes the line entirely
    store.decrement(medicine_id).await.expect("decrement to removal");
    assert_eq!(qty(&store.state().await), None);
}

#[tokio::test]
#[ignore = "Requires running gateway"]
async fn test_unauthenticated_cart_fetch_fails_without_warning_noise() {
    let (client, _session, _log) = test_client();
    let store = CartStore::new(client);

    let result = store.refresh().await;
    assert!(result.is_err());
    assert_eq!(store.state().await.status, CartStatus::Failed);
}
