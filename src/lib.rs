//! Behaviour-driven verification harness for the Swagger pet-store API.
//!
//! Scenario clauses map onto [`steps`] handlers that build typed requests
//! from Gherkin tables, call the service through [`client`], keep
//! per-scenario state in [`context`] and check outcomes with [`verify`],
//! recording every comparison as [`evidence`]. The `petstore-bdd` binary
//! runs the same handlers as scripted smoke journeys via [`runner`].

pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod evidence;
pub mod fixture;
pub mod model;
pub mod runner;
pub mod steps;
pub mod table;
pub mod verify;
