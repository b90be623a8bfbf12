//! Scenario world for the pet-store BDD suite.
//!
//! Each scenario gets its own stub pet store, harness and
//! [`ScenarioContext`]. The context sits behind a `RefCell` because step
//! bindings only receive `&TestWorld`.

// The `#[fixture]` macro generates types that cannot have doc comments attached
#![allow(
    missing_docs,
    reason = "Generated fixture types cannot have doc comments attached"
)]

use anyhow::{Result, anyhow};
use petstore_bdd::context::ScenarioContext;
use petstore_bdd::error::HarnessError;
use petstore_bdd::evidence::MemorySink;
use petstore_bdd::steps::Harness;
use rstest::fixture;
use rstest_bdd::Slot;
use std::cell::RefCell;
use std::sync::Arc;
use test_support::{StubPetStore, harness_for};

/// State shared by the steps of one scenario.
pub struct TestWorld {
    /// Stub service the harness talks to.
    pub stub: StubPetStore,
    /// Harness wired to [`Self::stub`].
    pub harness: Harness,
    /// Evidence recorded during the scenario.
    pub evidence: Arc<MemorySink>,
    /// Per-scenario harness state.
    pub ctx: RefCell<ScenarioContext>,
    /// Rendered error from a step that was expected to fail.
    pub step_error: Slot<String>,
    /// Status carried by the expected failure, when it was a status error.
    pub failed_status: Slot<u16>,
}

impl Default for TestWorld {
    fn default() -> Self {
        let stub = StubPetStore::start();
        let (harness, evidence) = harness_for(&stub);
        Self {
            stub,
            harness,
            evidence,
            ctx: RefCell::new(ScenarioContext::new("bdd scenario")),
            step_error: Slot::default(),
            failed_status: Slot::default(),
        }
    }
}

impl TestWorld {
    /// Run a harness handler against this world's context.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error with the scenario phase attached.
    pub fn run<F>(&self, handler: F) -> Result<()>
    where
        F: FnOnce(&Harness, &mut ScenarioContext) -> petstore_bdd::error::Result<()>,
    {
        let mut ctx = self.ctx.borrow_mut();
        handler(&self.harness, &mut *ctx)
            .map_err(|err| anyhow!(err).context(format!("scenario phase {}", ctx.phase())))
    }

    /// Run a handler that the scenario expects to fail and keep its error
    /// for later inspection.
    ///
    /// # Errors
    ///
    /// Returns an error when the handler unexpectedly succeeds.
    pub fn run_expecting_failure<F>(&self, handler: F) -> Result<()>
    where
        F: FnOnce(&Harness, &mut ScenarioContext) -> petstore_bdd::error::Result<()>,
    {
        let mut ctx = self.ctx.borrow_mut();
        match handler(&self.harness, &mut *ctx) {
            Ok(()) => Err(anyhow!("step was expected to fail but succeeded")),
            Err(err) => {
                if let HarnessError::UnexpectedStatus { status, .. } = &err {
                    self.failed_status.set(*status);
                }
                self.step_error.set(err.to_string());
                Ok(())
            }
        }
    }
}

/// Fixture providing a fresh `TestWorld` for each scenario.
#[fixture]
pub fn world() -> TestWorld {
    TestWorld::default()
}
