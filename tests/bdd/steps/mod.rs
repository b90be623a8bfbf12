//! Step bindings for the pet-store scenarios.
//!
//! Bindings translate Gherkin clauses into calls on the harness step
//! handlers. Steps that inspect the stub service directly live alongside
//! them.

#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes data tables and captured strings by value"
)]

pub mod pet;
pub mod store;
pub mod user;

use crate::bdd::fixtures::TestWorld;
use anyhow::{Context, Result, ensure};
use petstore_bdd::steps::store as store_steps;
use rstest_bdd_macros::then;

#[then("the response status code should be {code:u16}")]
fn response_status_code(world: &TestWorld, code: u16) -> Result<()> {
    world.run(|harness, ctx| store_steps::status_code_is(harness, ctx, code))
}

#[then("the scenario input should be rejected mentioning {fragment:string}")]
fn input_rejected(world: &TestWorld, fragment: String) -> Result<()> {
    let error = world
        .step_error
        .get()
        .context("no step failure was captured")?;
    ensure!(
        error.starts_with("invalid scenario input"),
        "expected a scenario input error, got: {error}"
    );
    ensure!(
        error.contains(&fragment),
        "expected '{fragment}' in: {error}"
    );
    Ok(())
}

#[then("the evidence should include {heading:string}")]
fn evidence_includes(world: &TestWorld, heading: String) -> Result<()> {
    ensure!(
        world.evidence.contains_heading(&heading),
        "no evidence recorded under '{heading}': {:?}",
        world.evidence.entries()
    );
    Ok(())
}
