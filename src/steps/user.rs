//! User scenario clauses.

use super::{Harness, step};
use crate::client::{ApiCall, Endpoint};
use crate::context::{ScenarioContext, StepKind};
use crate::error::Result;
use crate::model::{ApiMessage, Credentials, UserRequest};
use crate::table::parse_first;

/// Given I have admin credentials.
///
/// Like store-manager authentication, this selects the configured API key.
/// User writes carry that key whether or not this step ran.
///
/// # Errors
///
/// Returns a configuration error when the table lacks `username` or
/// `password`.
pub fn admin_credentials(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    table: Vec<Vec<String>>,
) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        let admin: Credentials = parse_first(table)?;
        ctx.set_api_key(harness.api_key());
        harness.record(
            "Admin Authentication",
            &format!("Admin authenticated: {}", admin.username),
        );
        Ok(())
    })
}

/// Given I have user details.
///
/// # Errors
///
/// Returns a configuration error for missing or unparseable columns.
pub fn user_details(ctx: &mut ScenarioContext, table: Vec<Vec<String>>) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        let request: UserRequest = parse_first(table)?;
        ctx.set_credentials(request.credentials());
        ctx.user.set_id(request.username.clone());
        ctx.user.set_request(request);
        Ok(())
    })
}

/// Given I have an existing user `username`.
///
/// # Errors
///
/// Only fails when the step arrives out of order.
pub fn existing_user(ctx: &mut ScenarioContext, username: &str) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        ctx.user.set_id(username.to_owned());
        Ok(())
    })
}

/// Given the user logs in with `credentials` rather than those of a created
/// user.
///
/// # Errors
///
/// Returns a configuration error when the table lacks `username` or
/// `password`.
pub fn login_credentials(ctx: &mut ScenarioContext, table: Vec<Vec<String>>) -> Result<()> {
    step(ctx, StepKind::Given, |ctx| {
        let credentials: Credentials = parse_first(table)?;
        ctx.set_credentials(credentials);
        Ok(())
    })
}

/// When I send a request to create a new user.
///
/// # Errors
///
/// Returns transport errors, or a missing-state error when no user details
/// were given.
pub fn create_user(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let call = ApiCall::new(Endpoint::CreateUser)
            .with_api_key(Some(harness.api_key()))
            .with_json(ctx.user.require_request()?)?;
        let response = harness.send(ctx, &call, "User Creation Error")?;
        harness.record("User Creation Response", response.body());
        store_message(ctx, response.json("user creation message").ok());
        Ok(())
    })
}

/// When I log in with the user credentials: captures any status.
///
/// # Errors
///
/// Returns transport errors, or a missing-state error when no credentials
/// are known.
pub fn login(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let credentials = ctx.require_credentials()?;
        let call = ApiCall::new(Endpoint::Login {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        });
        let response = harness.send(ctx, &call, "Login Error")?;
        tracing::debug!(status = response.status(), "login attempted");
        Ok(())
    })
}

/// When I send a request to delete the user.
///
/// # Errors
///
/// Returns transport errors, or a missing-state error when no username is
/// known.
pub fn delete_user(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::When, |ctx| {
        let username = ctx.user.require_id()?.clone();
        let call =
            ApiCall::new(Endpoint::DeleteUser(username)).with_api_key(Some(harness.api_key()));
        let response = harness.send(ctx, &call, "User Deletion Error")?;
        harness.record("User Deletion Response", response.body());
        store_message(ctx, response.json("user deletion message").ok());
        Ok(())
    })
}

/// Then the user should be created successfully.
///
/// # Errors
///
/// Returns an assertion error unless the creation answered 200 with a
/// message envelope whose code is 200.
pub fn user_created(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let verify = harness.verify();
        verify.status_code(ctx.require_last_response()?.status(), 200)?;
        let envelope = ctx.user.require_response()?;
        verify.number_equals("Response Code", envelope.code, 200_i32)
    })
}

/// Then the login should succeed.
///
/// # Errors
///
/// Returns an assertion error unless the login answered 200.
pub fn login_succeeded(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    expect_status(harness, ctx, "Login Status code", 200)
}

/// Then the login should be rejected with status `expected`.
///
/// # Errors
///
/// Returns an assertion error when the login answered anything else.
pub fn login_rejected(harness: &Harness, ctx: &mut ScenarioContext, expected: u16) -> Result<()> {
    expect_status(harness, ctx, "Failed Login Status code", expected)
}

/// Then the user should be deleted successfully.
///
/// # Errors
///
/// Returns an assertion error unless the deletion answered 200 with a
/// message envelope naming the deleted user.
pub fn user_deleted(harness: &Harness, ctx: &mut ScenarioContext) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        let verify = harness.verify();
        verify.status_code(ctx.require_last_response()?.status(), 200)?;
        let username = ctx.user.require_id()?;
        let envelope = ctx.user.require_response()?;
        verify.number_equals("Response Code", envelope.code, 200_i32)?;
        verify.string_equals(
            "Deleted Username",
            envelope.message.as_deref(),
            username.as_str(),
        )
    })
}

fn expect_status(
    harness: &Harness,
    ctx: &mut ScenarioContext,
    label: &str,
    expected: u16,
) -> Result<()> {
    step(ctx, StepKind::Then, |ctx| {
        harness
            .verify()
            .number_equals(label, ctx.require_last_response()?.status(), expected)
    })
}

fn store_message(ctx: &mut ScenarioContext, message: Option<ApiMessage>) {
    match message {
        Some(envelope) => ctx.user.set_response(envelope),
        None => ctx.user.clear_response(),
    }
}
