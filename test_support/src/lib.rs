//! Test utilities for the pet-store harness.
//!
//! Provides an in-process stub of the pet-store API, a helper that wires a
//! [`Harness`] to it with an in-memory evidence sink, and a runner for the
//! compiled binary.

pub mod binary;
pub mod petstore;

pub use binary::{BinaryRun, run_petstore_bdd};
pub use petstore::{RecordedRequest, StubPetStore};

use camino::Utf8PathBuf;
use petstore_bdd::config::HarnessConfig;
use petstore_bdd::evidence::MemorySink;
use petstore_bdd::steps::Harness;
use std::sync::Arc;
use std::time::Duration;

/// Directory holding the checked-in reference payloads.
#[must_use]
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../fixtures/payloads")
}

/// Configuration pointing at `base_url` with the checked-in fixtures and a
/// short timeout.
///
/// # Panics
///
/// Panics when `base_url` is not a usable URL.
#[must_use]
pub fn config_for(base_url: &str) -> HarnessConfig {
    HarnessConfig::default()
        .with_base_url(base_url)
        .expect("stub base url is valid")
        .with_timeout(Duration::from_secs(5))
        .with_fixtures_dir(fixtures_dir())
}

/// Build a [`Harness`] against `stub` that records evidence in memory.
#[must_use]
pub fn harness_for(stub: &StubPetStore) -> (Harness, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let harness = Harness::new(&config_for(stub.base_url()), sink.clone());
    (harness, sink)
}
