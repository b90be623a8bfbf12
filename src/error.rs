//! Error types shared by every harness component.
//!
//! All variants surface as scenario failures. The only condition the harness
//! absorbs is a not-found pet lookup, which is modelled as a lookup outcome in
//! [`crate::context`] rather than as an error.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
// FIXME(rust-lang/rust#130021): remove once upstream is fixed.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Observed value that did not match its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Field or check being verified.
    pub label: String,
    /// Rendered expected value.
    pub expected: String,
    /// Rendered actual value.
    pub actual: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' - expected: '{}', actual: '{}'",
            self.label, self.expected, self.actual
        )
    }
}

/// Errors raised while driving a scenario against the pet store.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    /// Scenario input or harness configuration is malformed.
    #[error("invalid scenario input: {message}")]
    #[diagnostic(code(petstore_bdd::configuration))]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// The HTTP call could not be completed.
    #[error("{method} {url} failed: {source}")]
    #[diagnostic(code(petstore_bdd::transport))]
    Transport {
        /// HTTP method of the failed call.
        method: &'static str,
        /// Absolute URL of the failed call.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body could not be read from the connection.
    #[error("failed to read response body from {url}: {source}")]
    #[diagnostic(code(petstore_bdd::response_body))]
    ResponseBody {
        /// Absolute URL of the call.
        url: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A response body did not match the expected entity shape.
    #[error("failed to decode {entity} from response body: {source}")]
    #[diagnostic(code(petstore_bdd::decode))]
    Decode {
        /// Entity that was being decoded.
        entity: &'static str,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// The service answered with a status outside the expected set.
    #[error("{operation} returned unexpected status {status}: {body}")]
    #[diagnostic(code(petstore_bdd::unexpected_status))]
    UnexpectedStatus {
        /// Operation being performed, for example `get pet`.
        operation: &'static str,
        /// Observed HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// An observed value did not match its expectation.
    #[error("assertion failed: {0}")]
    #[diagnostic(code(petstore_bdd::assertion))]
    Assertion(AssertionFailure),

    /// A named reference fixture does not exist.
    #[error("fixture '{name}' not found in {dir}")]
    #[diagnostic(
        code(petstore_bdd::fixture_not_found),
        help("set PETSTORE_FIXTURES_DIR or pass --fixtures to point at the payload directory")
    )]
    FixtureNotFound {
        /// Fixture file name.
        name: String,
        /// Directory that was searched.
        dir: Utf8PathBuf,
    },

    /// A reference fixture exists but does not match the entity shape.
    #[error("fixture '{name}' is malformed: {source}")]
    #[diagnostic(code(petstore_bdd::fixture_parse))]
    FixtureParse {
        /// Fixture file name.
        name: String,
        /// Underlying JSON failure.
        #[source]
        source: serde_json::Error,
    },

    /// A reference fixture could not be read.
    #[error("failed to read fixture '{name}': {source}")]
    #[diagnostic(code(petstore_bdd::fixture_read))]
    FixtureRead {
        /// Fixture file name.
        name: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A step ran before the state it depends on was established.
    #[error("no {kind} {what} recorded for this scenario")]
    #[diagnostic(code(petstore_bdd::missing_state))]
    MissingState {
        /// Entity kind the state belongs to, for example `pet`.
        kind: &'static str,
        /// Missing piece of state, for example `response`.
        what: &'static str,
    },

    /// A step was applied in a phase that does not allow it.
    #[error("cannot apply a {step} step while the scenario is {phase}")]
    #[diagnostic(code(petstore_bdd::out_of_order))]
    OutOfOrder {
        /// Step kind that was rejected.
        step: &'static str,
        /// Phase the scenario was in.
        phase: &'static str,
    },

    /// A pattern assertion was given an invalid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    #[diagnostic(code(petstore_bdd::invalid_pattern))]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Underlying regex failure.
        #[source]
        source: Box<regex::Error>,
    },

    /// The current time could not be rendered as an ISO-8601 timestamp.
    #[error("failed to format timestamp: {0}")]
    #[diagnostic(code(petstore_bdd::timestamp))]
    Timestamp(#[from] time::error::Format),
}

impl HarnessError {
    /// Build a [`HarnessError::Configuration`] from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Return the assertion failure when this error is one.
    #[must_use]
    pub const fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Assertion(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Result alias used across the harness.
pub type Result<T, E = HarnessError> = std::result::Result<T, E>;
