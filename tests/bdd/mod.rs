//! BDD test module providing the scenario world and step bindings.
//!
//! Step bindings are registered via `#[given]`, `#[when]` and `#[then]`
//! attribute macros from rstest-bdd and delegate to the harness handlers in
//! `petstore_bdd::steps`.

pub mod fixtures;
pub mod steps;
