//! Pet scenario bindings.

use crate::bdd::fixtures::TestWorld;
use anyhow::{Context, Result, ensure};
use petstore_bdd::context::Lookup;
use petstore_bdd::steps::pet;
use rstest_bdd_macros::{given, then, when};
use test_support::fixtures_dir;

#[given("the pet store holds the reference pet")]
fn store_holds_reference_pet(world: &TestWorld) -> Result<()> {
    let path = fixtures_dir().join(petstore_bdd::fixture::KNOWN_PET);
    let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let pet = serde_json::from_str(&text).with_context(|| format!("parse {path}"))?;
    world.stub.seed_pet(pet);
    Ok(())
}

#[given("the pet store fails pet reads with status {status:u16}")]
fn store_fails_pet_reads(world: &TestWorld, status: u16) {
    world.stub.fail_pet_reads(Some(status));
}

#[given("I have pet details with the following attributes:")]
fn pet_details(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run(|_, ctx| pet::pet_details(ctx, datatable))
}

#[given("I have incomplete pet details:")]
fn incomplete_pet_details(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run_expecting_failure(|_, ctx| pet::pet_details(ctx, datatable))
}

#[given("I use a known pet ID")]
fn known_pet_id(world: &TestWorld) -> Result<()> {
    world.run(pet::known_pet)
}

#[when("I send a request to add the new pet")]
fn add_pet(world: &TestWorld) -> Result<()> {
    world.run(pet::add_pet)
}

#[when("I request the pet details")]
fn request_pet(world: &TestWorld) -> Result<()> {
    world.run(pet::get_pet)
}

#[when("I request the pet details expecting a server error")]
fn request_pet_expecting_error(world: &TestWorld) -> Result<()> {
    world.run_expecting_failure(pet::get_pet)
}

#[then("the pet should be created successfully")]
fn pet_created(world: &TestWorld) -> Result<()> {
    world.run(pet::pet_created)
}

#[then("the response should contain the pet details I submitted")]
fn response_matches_request(world: &TestWorld) -> Result<()> {
    world.run(pet::response_matches_request)
}

#[then("the pet status should be {status:string}")]
fn pet_status(world: &TestWorld, status: String) -> Result<()> {
    world.run(|harness, ctx| pet::pet_status_is(harness, ctx, &status))
}

#[then("I should receive the correct pet information")]
fn correct_pet_information(world: &TestWorld) -> Result<()> {
    world.run(pet::correct_pet_information)
}

#[then("the pet details should come from the reference data")]
fn used_reference_data(world: &TestWorld) -> Result<()> {
    world.run(pet::used_reference_data)?;
    ensure!(
        world.evidence.contains_heading("Pet Not Found"),
        "fallback should be recorded as evidence"
    );
    Ok(())
}

#[then("the pet details should come from the live store")]
fn used_live_data(world: &TestWorld) -> Result<()> {
    let lookup = world.ctx.borrow().pet.lookup();
    ensure!(
        lookup == Some(Lookup::Live),
        "expected a live lookup, got {lookup:?}"
    );
    ensure!(
        !world.evidence.contains_heading("Using Local Pet Data"),
        "live read should not use local data"
    );
    Ok(())
}

#[then("the read should have failed with status {status:u16}")]
fn read_failed(world: &TestWorld, status: u16) -> Result<()> {
    let observed = world
        .failed_status
        .get()
        .context("no unexpected status was captured")?;
    ensure!(observed == status, "expected status {status}, got {observed}");
    let error = world.step_error.get().context("no step error captured")?;
    ensure!(error.contains("get pet"), "unexpected error: {error}");
    Ok(())
}
