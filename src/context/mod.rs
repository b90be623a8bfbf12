//! Per-scenario mutable state.
//!
//! A [`ScenarioContext`] is created for each scenario and dropped when it
//! ends, so no state leaks between scenarios. Besides the entity slots it
//! tracks the scenario phase and rejects steps that arrive out of order: a
//! verification before any action, or a precondition after an action.
//!
//! ```rust
//! use petstore_bdd::context::{ScenarioContext, ScenarioPhase, StepKind};
//!
//! let mut ctx = ScenarioContext::new("add a pet");
//! ctx.enter(StepKind::Given).expect("first step");
//! ctx.enter(StepKind::When).expect("action after precondition");
//! ctx.enter(StepKind::Then).expect("verification after action");
//! assert!(ctx.enter(StepKind::Given).is_err());
//! ctx.finish();
//! assert_eq!(ctx.phase(), ScenarioPhase::Done);
//! ```

mod entity;

pub use entity::{EntityState, Lookup};

use crate::client::ApiResponse;
use crate::error::{HarnessError, Result};
use crate::model::{ApiMessage, Credentials, Inventory, Order, OrderRequest, Pet, PetRequest, UserRequest};
use std::fmt;

/// Lifecycle phase of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioPhase {
    /// No step has run yet.
    #[default]
    Init,
    /// Preconditions are being established.
    Given,
    /// An action has been performed.
    When,
    /// Outcomes are being verified.
    Then,
    /// The scenario completed.
    Done,
    /// A step failed.
    Failed,
}

impl ScenarioPhase {
    /// Lower-case phase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` once no further steps are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for ScenarioPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a step. `And`/`But` steps take the role of the step they follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Establishes preconditions.
    Given,
    /// Performs one action.
    When,
    /// Verifies outcomes.
    Then,
}

impl StepKind {
    /// Lower-case step name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        }
    }

    const fn phase(self) -> ScenarioPhase {
        match self {
            Self::Given => ScenarioPhase::Given,
            Self::When => ScenarioPhase::When,
            Self::Then => ScenarioPhase::Then,
        }
    }
}

/// Pet slots: identifiers are numeric and the reference is a full pet.
pub type PetState = EntityState<PetRequest, Pet, i64>;
/// Order slots.
pub type OrderState = EntityState<OrderRequest, Order, i64>;
/// User slots: the service answers user writes with a message envelope and
/// users are addressed by username.
pub type UserState = EntityState<UserRequest, ApiMessage, String>;

/// State owned by one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    name: String,
    phase: ScenarioPhase,
    api_key: Option<String>,
    last_response: Option<ApiResponse>,
    credentials: Option<Credentials>,
    inventory: Option<Inventory>,
    /// Pet request, response, reference fixture and identifier.
    pub pet: PetState,
    /// Order request, response and identifier.
    pub order: OrderState,
    /// User request, response and username.
    pub user: UserState,
}

impl Default for ScenarioContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl ScenarioContext {
    /// Fresh context for the scenario called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: ScenarioPhase::Init,
            api_key: None,
            last_response: None,
            credentials: None,
            inventory: None,
            pet: EntityState::new("pet"),
            order: EntityState::new("order"),
            user: EntityState::new("user"),
        }
    }

    /// Scenario name, used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// Move to the phase of a step about to run.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::OutOfOrder`] for a `Then` before any `When`,
    /// a `Given` after a `When`, or any step after the scenario ended.
    pub fn enter(&mut self, kind: StepKind) -> Result<()> {
        use ScenarioPhase as P;
        let allowed = match (self.phase, kind) {
            (P::Done | P::Failed, _)
            | (P::Init, StepKind::Then)
            | (P::When | P::Then, StepKind::Given)
            | (P::Given, StepKind::Then) => false,
            (P::Init | P::Given, StepKind::Given | StepKind::When)
            | (P::When | P::Then, StepKind::When | StepKind::Then) => true,
        };
        if !allowed {
            return Err(HarnessError::OutOfOrder {
                step: kind.as_str(),
                phase: self.phase.as_str(),
            });
        }
        self.phase = kind.phase();
        Ok(())
    }

    /// Mark the scenario complete.
    pub fn finish(&mut self) {
        if self.phase != ScenarioPhase::Failed {
            self.phase = ScenarioPhase::Done;
        }
    }

    /// Mark the scenario failed.
    pub fn fail(&mut self) {
        self.phase = ScenarioPhase::Failed;
    }

    /// Store the store-manager key used on authenticated calls.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    /// Store-manager key, once authenticated.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Store the raw response of the latest action.
    pub fn set_last_response(&mut self, response: ApiResponse) {
        self.last_response = Some(response);
    }

    /// Raw response of the latest action, if any.
    #[must_use]
    pub const fn last_response(&self) -> Option<&ApiResponse> {
        self.last_response.as_ref()
    }

    /// Raw response of the latest action.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when no action has run.
    pub fn require_last_response(&self) -> Result<&ApiResponse> {
        self.last_response
            .as_ref()
            .ok_or(HarnessError::MissingState {
                kind: "HTTP",
                what: "response",
            })
    }

    /// Store the credentials used for login attempts.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Login credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when none were set.
    pub fn require_credentials(&self) -> Result<&Credentials> {
        self.credentials
            .as_ref()
            .ok_or(HarnessError::MissingState {
                kind: "user",
                what: "credentials",
            })
    }

    /// Store the latest inventory snapshot.
    pub fn set_inventory(&mut self, inventory: Inventory) {
        self.inventory = Some(inventory);
    }

    /// Latest inventory snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when the inventory was not
    /// requested.
    pub fn require_inventory(&self) -> Result<&Inventory> {
        self.inventory
            .as_ref()
            .ok_or(HarnessError::MissingState {
                kind: "store",
                what: "inventory",
            })
    }
}
