//! Store scenario bindings.

use crate::bdd::fixtures::TestWorld;
use anyhow::{Result, ensure};
use petstore_bdd::config::DEFAULT_API_KEY;
use petstore_bdd::steps::store;
use rstest_bdd_macros::{given, then, when};

#[given("I am authenticated as a store manager:")]
fn store_manager(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run(|harness, ctx| store::authenticate_store_manager(harness, ctx, datatable))
}

#[given("I have order details:")]
fn order_details(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run(|harness, ctx| store::order_details(harness, ctx, datatable))
}

#[given("I have an invalid order without a pet ID")]
fn invalid_order(world: &TestWorld) -> Result<()> {
    world.run(store::invalid_order)
}

#[when("I place the order")]
fn place_order(world: &TestWorld) -> Result<()> {
    world.run(store::place_order)
}

#[when("I try to place the invalid order")]
fn try_place_invalid_order(world: &TestWorld) -> Result<()> {
    world.run(store::try_place_invalid_order)
}

#[when("I retrieve the order by ID")]
fn retrieve_order(world: &TestWorld) -> Result<()> {
    world.run(store::retrieve_order)
}

#[when("I retrieve the order with ID {id:i64}")]
fn retrieve_order_with_id(world: &TestWorld, id: i64) -> Result<()> {
    world.run(|harness, ctx| store::try_retrieve_order(harness, ctx, id))
}

#[when("I update the order status to {status:string}")]
fn update_order_status(world: &TestWorld, status: String) -> Result<()> {
    world.run(|harness, ctx| store::update_order_status(harness, ctx, &status))
}

#[when("I delete the order")]
fn delete_order(world: &TestWorld) -> Result<()> {
    world.run(store::delete_order)
}

#[when("I delete the order with ID {id:i64}")]
fn delete_order_with_id(world: &TestWorld, id: i64) -> Result<()> {
    world.run(|harness, ctx| store::try_delete_order(harness, ctx, id))
}

#[when("I request the store inventory")]
fn request_inventory(world: &TestWorld) -> Result<()> {
    world.run(store::request_inventory)
}

#[then("the order should be created successfully")]
fn order_created(world: &TestWorld) -> Result<()> {
    world.run(store::order_created)
}

#[then("the order should have a valid order ID")]
fn valid_order_id(world: &TestWorld) -> Result<()> {
    world.run(store::valid_order_id)
}

#[then("the order details should match the created order")]
fn order_matches_request(world: &TestWorld) -> Result<()> {
    world.run(store::order_matches_request)
}

#[then("the order should be updated successfully")]
fn order_updated(world: &TestWorld) -> Result<()> {
    world.run(store::order_updated)
}

#[then("the updated order status should be {status:string}")]
fn updated_status(world: &TestWorld, status: String) -> Result<()> {
    world.run(|harness, ctx| store::updated_status_is(harness, ctx, &status))
}

#[then("the order should be deleted successfully")]
fn order_deleted(world: &TestWorld) -> Result<()> {
    world.run(store::order_deleted)
}

#[then("I should receive the inventory status")]
fn inventory_received(world: &TestWorld) -> Result<()> {
    world.run(store::inventory_received)
}

#[then("the inventory should contain status counts")]
fn inventory_counts(world: &TestWorld) -> Result<()> {
    world.run(store::inventory_has_counts)
}

#[then("the error message should contain {fragment:string}")]
fn error_message(world: &TestWorld, fragment: String) -> Result<()> {
    world.run(|harness, ctx| store::error_message_contains(harness, ctx, &fragment))
}

#[then("the order creation should fail")]
fn order_creation_failed(world: &TestWorld) -> Result<()> {
    world.run(store::order_creation_failed)
}

#[then("the response should contain validation errors")]
fn validation_errors(world: &TestWorld) -> Result<()> {
    world.run(store::validation_errors_present)
}

#[then("the store should have received the manager API key")]
fn manager_key_sent(world: &TestWorld) -> Result<()> {
    let requests = world.stub.requests();
    let deletes: Vec<_> = requests
        .iter()
        .filter(|request| request.method == "DELETE")
        .collect();
    ensure!(!deletes.is_empty(), "no delete reached the store");
    ensure!(
        deletes
            .iter()
            .all(|request| request.api_key.as_deref() == Some(DEFAULT_API_KEY)),
        "every delete should carry the manager key: {deletes:?}"
    );
    Ok(())
}
