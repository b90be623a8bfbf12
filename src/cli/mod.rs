//! Command line interface definition using clap.
//!
//! [`Cli`] doubles as the layered configuration: `OrthoConfig` merges the
//! built-in defaults, `PETSTORE_*` environment variables and explicit flags,
//! in that order of precedence. Without a subcommand every smoke journey
//! runs.

mod parsing;

use crate::runner::Journey;
use clap::parser::ValueSource;
use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use ortho_config::declarative::LayerComposition;
use ortho_config::figment::{Figment, providers::Env};
use ortho_config::uncased::Uncased;
use ortho_config::{MergeComposer, OrthoConfig, OrthoMergeExt, OrthoResult, sanitize_value};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use parsing::parse_timeout_secs;

const ENV_PREFIX: &str = "PETSTORE_";

/// Behaviour-driven smoke checks for a Swagger pet-store deployment.
#[derive(Debug, Clone, PartialEq, Eq, Parser, Serialize, Deserialize, OrthoConfig)]
#[command(author, version, about, long_about = None)]
#[ortho_config(prefix = "PETSTORE")]
pub struct Cli {
    /// Base URL of the pet-store API, for example `http://localhost:8080/v2`.
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Store-manager API key sent on authorised calls.
    #[arg(long, value_name = "KEY", global = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in whole seconds.
    #[arg(
        long = "timeout",
        value_name = "SECS",
        value_parser = parse_timeout_secs,
        global = true
    )]
    pub timeout_secs: Option<u64>,

    /// Directory holding reference fixtures.
    #[arg(long = "fixtures", value_name = "DIR", global = true)]
    pub fixtures_dir: Option<PathBuf>,

    /// Append evidence to this JSON-lines file.
    #[arg(long, value_name = "FILE", global = true)]
    pub evidence_log: Option<PathBuf>,

    /// Enable verbose diagnostic logging.
    #[arg(short, long, global = true)]
    #[ortho_config(default = false)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `run` when omitted.
    ///
    /// `OrthoConfig` merging ignores this field; CLI parsing supplies it.
    #[serde(skip)]
    #[command(subcommand)]
    #[ortho_config(skip_cli)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Run(RunArgs::default()));
        }
        self
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: None,
            fixtures_dir: None,
            evidence_log: None,
            verbose: false,
            command: None,
        }
        .with_default_command()
    }
}

/// Arguments accepted by the `run` command.
#[derive(Debug, Clone, Default, Args, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArgs {
    /// Journeys to run; all of them when none are named.
    #[arg(value_enum, value_name = "JOURNEY")]
    #[serde(default)]
    pub journeys: Vec<Journey>,
}

impl RunArgs {
    /// Journeys selected for this run, in the order given.
    #[must_use]
    pub fn selected(&self) -> Vec<Journey> {
        if self.journeys.is_empty() {
            Journey::ALL.to_vec()
        } else {
            self.journeys.clone()
        }
    }
}

/// Available top-level commands.
#[derive(Debug, Clone, Subcommand, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Commands {
    /// Run smoke journeys against the configured service.
    Run(RunArgs),

    /// Check that the reference pet fixture loads.
    Fixture,
}

/// Parse CLI arguments, keeping the `ArgMatches` needed for configuration
/// merging.
///
/// # Errors
///
/// Returns a `clap::Error` when parsing fails.
pub fn parse_from<I, T>(iter: I) -> Result<(Cli, ArgMatches), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = Cli::command();
    let matches = command.try_get_matches_from_mut(iter)?;
    let cli = Cli::from_arg_matches(&matches).map_err(|err| err.with_cmd(&command))?;
    Ok((cli, matches))
}

/// Return the prefixed environment provider for CLI configuration.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
}

/// Return `true` when no CLI overrides were supplied.
fn is_empty_value(value: &serde_json::Value) -> bool {
    matches!(value, serde_json::Value::Object(map) if map.is_empty())
}

fn cli_overrides_from_matches(cli: &Cli, matches: &ArgMatches) -> OrthoResult<serde_json::Value> {
    let mut map = match sanitize_value(cli)? {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(Arc::new(ortho_config::OrthoError::Validation {
                key: String::from("cli"),
                message: format!("expected parsed CLI values to serialize to an object, got {other:?}"),
            }));
        }
    };
    map.remove("command");
    if matches.value_source("verbose") != Some(ValueSource::CommandLine) {
        map.remove("verbose");
    }
    Ok(serde_json::Value::Object(map))
}

/// Merge the defaults and environment layers under the parsed CLI values.
///
/// # Errors
///
/// Returns an [`ortho_config::OrthoError`] if an environment value cannot
/// be read or the layers do not merge into a [`Cli`].
pub fn merge_with_config(cli: &Cli, matches: &ArgMatches) -> OrthoResult<Cli> {
    let command = cli.command.clone();
    let mut errors = Vec::new();
    let mut composer = MergeComposer::with_capacity(3);

    match sanitize_value(&Cli::default()) {
        Ok(value) => composer.push_defaults(value),
        Err(err) => errors.push(err),
    }

    let env_provider = env_provider()
        .map(|key| Uncased::new(key.as_str().to_ascii_uppercase()))
        .split("__");
    match Figment::from(env_provider)
        .extract::<serde_json::Value>()
        .into_ortho_merge()
    {
        Ok(value) => composer.push_environment(value),
        Err(err) => errors.push(err),
    }

    match cli_overrides_from_matches(cli, matches) {
        Ok(value) if !is_empty_value(&value) => composer.push_cli(value),
        Ok(_) => {}
        Err(err) => errors.push(err),
    }

    let composition = LayerComposition::new(composer.layers(), errors);
    let mut merged = composition.into_merge_result(Cli::merge_from_layers)?;
    merged.command = command;
    Ok(merged)
}
