//! Scripted smoke journeys.

use crate::context::ScenarioContext;
use crate::error::Result;
use crate::steps::{Harness, pet, store, user};
use time::OffsetDateTime;

fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
        .collect()
}

/// Suffix that keeps journey-created users apart on a shared sandbox.
fn unique_suffix() -> String {
    OffsetDateTime::now_utc().unix_timestamp_nanos().to_string()
}

pub(super) fn pet_create(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    pet::pet_details(
        ctx,
        table(&[
            &["name", "category", "status", "tags"],
            &["Smoke Rex", "Dogs", "available", "smoke,journey"],
        ]),
    )?;
    pet::add_pet(harness, ctx)?;
    pet::pet_created(harness, ctx)?;
    pet::response_matches_request(harness, ctx)?;
    pet::pet_status_is(harness, ctx, "available")
}

pub(super) fn known_pet(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    pet::known_pet(harness, ctx)?;
    pet::get_pet(harness, ctx)?;
    pet::correct_pet_information(harness, ctx)
}

pub(super) fn order_lifecycle(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    store::authenticate_store_manager(
        harness,
        ctx,
        table(&[&["username", "password"], &["manager", "manager"]]),
    )?;
    store::order_details(
        harness,
        ctx,
        table(&[
            &["petId", "quantity", "status", "complete"],
            &["10", "1", "placed", "false"],
        ]),
    )?;
    store::place_order(harness, ctx)?;
    store::order_created(harness, ctx)?;
    store::valid_order_id(harness, ctx)?;
    store::retrieve_order(harness, ctx)?;
    store::status_code_is(harness, ctx, 200)?;
    store::order_matches_request(harness, ctx)?;
    store::update_order_status(harness, ctx, "approved")?;
    store::order_updated(harness, ctx)?;
    store::updated_status_is(harness, ctx, "approved")?;
    store::delete_order(harness, ctx)?;
    store::order_deleted(harness, ctx)?;
    store::retrieve_order(harness, ctx)?;
    store::status_code_is(harness, ctx, 404)
}

pub(super) fn user_lifecycle(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    let username = format!("smoke_{}", unique_suffix());
    user::admin_credentials(
        harness,
        ctx,
        table(&[&["username", "password"], &["admin", "admin"]]),
    )?;
    user::user_details(
        ctx,
        table(&[
            &["username", "firstName", "lastName", "email", "password", "userStatus"],
            &[
                username.as_str(),
                "Smoke",
                "Journey",
                "smoke@example.com",
                "smoke-pass",
                "1",
            ],
        ]),
    )?;
    user::create_user(harness, ctx)?;
    user::user_created(harness, ctx)?;
    user::login(harness, ctx)?;
    user::login_succeeded(harness, ctx)?;
    user::delete_user(harness, ctx)?;
    user::user_deleted(harness, ctx)?;
    user::login(harness, ctx)?;
    user::login_rejected(harness, ctx, 400)
}

pub(super) fn inventory(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    store::authenticate_store_manager(
        harness,
        ctx,
        table(&[&["username", "password"], &["manager", "manager"]]),
    )?;
    store::request_inventory(harness, ctx)?;
    store::inventory_received(harness, ctx)?;
    store::inventory_has_counts(harness, ctx)
}
