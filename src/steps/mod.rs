//! Step handlers shared by the BDD bindings and the journey runner.
//!
//! Each public function implements one scenario clause. Handlers enter the
//! phase of their clause on the [`ScenarioContext`] before doing any work and
//! mark the scenario failed when they return an error, so a scenario driven
//! by the feature runner and one driven by [`crate::runner`] behave alike.
//!
//! Action handlers issue exactly one HTTP call and store the raw response in
//! the context. Transport failures, unreadable statuses and undecodable
//! bodies are recorded as evidence before they are returned.

pub mod pet;
pub mod store;
pub mod user;

use crate::client::{ApiCall, ApiClient, ApiResponse};
use crate::config::HarnessConfig;
use crate::context::{ScenarioContext, StepKind};
use crate::error::{HarnessError, Result};
use crate::evidence::{EvidenceSink, Reporter};
use crate::fixture::FixtureLoader;
use crate::verify::Verifier;
use serde::de::DeserializeOwned;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Collaborators shared by every scenario of a run.
#[derive(Clone)]
pub struct Harness {
    client: ApiClient,
    reporter: Reporter,
    fixtures: FixtureLoader,
    api_key: String,
}

impl Harness {
    /// Wire a harness from configuration and an evidence destination.
    #[must_use]
    pub fn new(config: &HarnessConfig, reporter: Reporter) -> Self {
        Self {
            client: ApiClient::new(config),
            reporter,
            fixtures: FixtureLoader::new(config.fixtures_dir()),
            api_key: config.api_key().to_owned(),
        }
    }

    /// HTTP client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Evidence destination.
    #[must_use]
    pub fn reporter(&self) -> &dyn EvidenceSink {
        self.reporter.as_ref()
    }

    /// Reference fixture loader.
    #[must_use]
    pub const fn fixtures(&self) -> &FixtureLoader {
        &self.fixtures
    }

    /// Configured store-manager key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Assertion helpers bound to this harness's reporter.
    #[must_use]
    pub fn verify(&self) -> Verifier<'_> {
        Verifier::new(self.reporter())
    }

    fn record(&self, title: &str, content: &str) {
        self.reporter.record(title, content);
    }

    /// Execute `call`, store the response as the latest one and return it.
    ///
    /// Failures to obtain a response are recorded under `error_title`.
    fn send(
        &self,
        ctx: &mut ScenarioContext,
        call: &ApiCall,
        error_title: &str,
    ) -> Result<ApiResponse> {
        match self.client.execute(call) {
            Ok(response) => {
                ctx.set_last_response(response.clone());
                Ok(response)
            }
            Err(err) => Err(self.exception(error_title, err)),
        }
    }

    /// Decode a successful response body, recording a failure under
    /// `error_title`.
    fn decode<T: DeserializeOwned>(
        &self,
        response: &ApiResponse,
        entity: &'static str,
        error_title: &str,
    ) -> Result<T> {
        response
            .json(entity)
            .map_err(|err| self.exception(error_title, err))
    }

    /// Reject any status other than 2xx and 404 on a read, recording the
    /// rejection under `error_title`.
    fn ensure_readable(
        &self,
        operation: &'static str,
        error_title: &str,
        response: &ApiResponse,
    ) -> Result<()> {
        if response.is_success() || response.is_not_found() {
            return Ok(());
        }
        Err(self.exception(
            error_title,
            HarnessError::UnexpectedStatus {
                operation,
                status: response.status(),
                body: response.body().to_owned(),
            },
        ))
    }

    fn exception(&self, title: &str, err: HarnessError) -> HarnessError {
        self.record(title, &format!("Exception: {err}"));
        err
    }
}

/// Run `body` as a step of `kind`, failing the scenario if it errors.
///
/// A step arriving out of order fails the scenario as well.
fn step<T>(
    ctx: &mut ScenarioContext,
    kind: StepKind,
    body: impl FnOnce(&mut ScenarioContext) -> Result<T>,
) -> Result<T> {
    let outcome = ctx.enter(kind).and_then(|()| body(ctx));
    if let Err(err) = &outcome {
        tracing::debug!(scenario = ctx.name(), step = kind.as_str(), %err, "step failed");
        ctx.fail();
    }
    outcome
}

/// Current time as an RFC 3339 timestamp, used for order ship dates.
///
/// # Errors
///
/// Returns [`HarnessError::Timestamp`] when the clock value cannot be
/// formatted.
pub fn ship_date_now() -> Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
