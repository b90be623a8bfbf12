//! CLI execution and journey dispatch.
//!
//! A journey is a fixed scenario script built from the same step handlers
//! the feature files use. Running journeys from the binary gives a quick
//! smoke check of a deployment without the test harness.

mod journeys;

use crate::cli::{Cli, Commands};
use crate::config::HarnessConfig;
use crate::context::ScenarioContext;
use crate::evidence::{JsonLinesSink, Reporter, TeeSink, TracingSink};
use crate::steps::Harness;
use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span};

/// Built-in smoke journeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Journey {
    /// Add a pet and check the echoed details.
    PetCreate,
    /// Read the reference pet, falling back to the fixture on 404.
    KnownPet,
    /// Place, retrieve, update and delete an order.
    OrderLifecycle,
    /// Create a user, log in, delete the user and check login is refused.
    UserLifecycle,
    /// Fetch the store inventory.
    Inventory,
}

impl Journey {
    /// Every journey, in canonical order.
    pub const ALL: [Self; 5] = [
        Self::PetCreate,
        Self::KnownPet,
        Self::OrderLifecycle,
        Self::UserLifecycle,
        Self::Inventory,
    ];

    /// Kebab-case name, as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PetCreate => "pet-create",
            Self::KnownPet => "known-pet",
            Self::OrderLifecycle => "order-lifecycle",
            Self::UserLifecycle => "user-lifecycle",
            Self::Inventory => "inventory",
        }
    }

    /// Run this journey as one scenario.
    ///
    /// # Errors
    ///
    /// Returns the first step error; the scenario is then marked failed.
    pub fn run(self, harness: &Harness) -> crate::error::Result<ScenarioContext> {
        let span = info_span!("journey", name = self.name());
        let _guard = span.enter();
        let mut ctx = ScenarioContext::new(self.name());
        match self {
            Self::PetCreate => journeys::pet_create(harness, &mut ctx)?,
            Self::KnownPet => journeys::known_pet(harness, &mut ctx)?,
            Self::OrderLifecycle => journeys::order_lifecycle(harness, &mut ctx)?,
            Self::UserLifecycle => journeys::user_lifecycle(harness, &mut ctx)?,
            Self::Inventory => journeys::inventory(harness, &mut ctx)?,
        }
        ctx.finish();
        Ok(ctx)
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one journey.
#[derive(Debug)]
pub struct JourneyOutcome {
    /// Journey that ran.
    pub journey: Journey,
    /// Failure, when the journey did not pass.
    pub error: Option<crate::error::HarnessError>,
}

impl JourneyOutcome {
    /// Returns `true` when the journey passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `journeys` in order, continuing past failures.
#[must_use]
pub fn run_journeys(harness: &Harness, journeys: &[Journey]) -> Vec<JourneyOutcome> {
    journeys
        .iter()
        .map(|&journey| {
            let error = journey.run(harness).err();
            match &error {
                None => info!(journey = journey.name(), "journey passed"),
                Some(err) => tracing::error!(journey = journey.name(), error = %err, "journey failed"),
            }
            JourneyOutcome { journey, error }
        })
        .collect()
}

/// Build the evidence destination for `config`: tracing events, plus a
/// JSON-lines log when one is configured.
///
/// # Errors
///
/// Returns an error when the evidence log cannot be opened.
pub fn reporter_for(config: &HarnessConfig) -> Result<Reporter> {
    let mut tee = TeeSink::new(vec![Arc::new(TracingSink)]);
    if let Some(path) = config.evidence_log() {
        let sink = JsonLinesSink::open(path)
            .with_context(|| format!("open evidence log {path}"))?;
        tee = tee.with(Arc::new(sink));
    }
    Ok(Arc::new(tee))
}

/// Execute the parsed [`Cli`] commands.
///
/// # Errors
///
/// Returns an error when configuration is invalid, the fixture cannot be
/// loaded, or any selected journey fails.
pub fn run(cli: &Cli) -> Result<()> {
    let config = HarnessConfig::from_cli(cli).context("validate configuration")?;
    let harness = Harness::new(&config, reporter_for(&config)?);
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Run(crate::cli::RunArgs::default()));
    match command {
        Commands::Fixture => {
            let pet = harness
                .fixtures()
                .load_known_pet()
                .context("load reference pet")?;
            info!(
                id = pet.id,
                name = pet.name.as_deref(),
                dir = %harness.fixtures().dir(),
                "reference pet fixture is valid"
            );
            Ok(())
        }
        Commands::Run(args) => {
            let selected = args.selected();
            info!(base_url = %config.base_url(), journeys = selected.len(), "starting run");
            let outcomes = run_journeys(&harness, &selected);
            let failed = outcomes.iter().filter(|outcome| !outcome.passed()).count();
            if failed > 0 {
                bail!("{failed} of {} journeys failed", outcomes.len());
            }
            info!(journeys = outcomes.len(), "all journeys passed");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
