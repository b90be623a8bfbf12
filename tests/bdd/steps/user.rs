//! User scenario bindings.

use crate::bdd::fixtures::TestWorld;
use anyhow::Result;
use petstore_bdd::steps::user;
use rstest_bdd_macros::{given, then, when};

#[given("the pet store has a user {username:string} with password {password:string}")]
fn store_has_user(world: &TestWorld, username: String, password: String) {
    world.stub.seed_user(&username, &password);
}

#[given("I have admin credentials:")]
fn admin_credentials(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run(|harness, ctx| user::admin_credentials(harness, ctx, datatable))
}

#[given("I have user details:")]
fn user_details(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run(|_, ctx| user::user_details(ctx, datatable))
}

#[given("an existing user {username:string}")]
fn existing_user(world: &TestWorld, username: String) -> Result<()> {
    world.run(|_, ctx| user::existing_user(ctx, &username))
}

#[given("I have login credentials:")]
fn login_credentials(world: &TestWorld, datatable: Vec<Vec<String>>) -> Result<()> {
    world.run(|_, ctx| user::login_credentials(ctx, datatable))
}

#[when("I create the user")]
fn create_user(world: &TestWorld) -> Result<()> {
    world.run(user::create_user)
}

#[when("I log in with the user credentials")]
fn login(world: &TestWorld) -> Result<()> {
    world.run(user::login)
}

#[when("I delete the user")]
fn delete_user(world: &TestWorld) -> Result<()> {
    world.run(user::delete_user)
}

#[then("the user should be created successfully")]
fn user_created(world: &TestWorld) -> Result<()> {
    world.run(user::user_created)
}

#[then("the login should succeed")]
fn login_succeeded(world: &TestWorld) -> Result<()> {
    world.run(user::login_succeeded)
}

#[then("the login should fail with status {status:u16}")]
fn login_rejected(world: &TestWorld, status: u16) -> Result<()> {
    world.run(|harness, ctx| user::login_rejected(harness, ctx, status))
}

#[then("the user should be deleted successfully")]
fn user_deleted(world: &TestWorld) -> Result<()> {
    world.run(user::user_deleted)
}
