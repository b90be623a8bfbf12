//! Journey runner tests against the stub pet store.

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use petstore_bdd::context::ScenarioPhase;
use petstore_bdd::error::HarnessError;
use petstore_bdd::runner::{Journey, reporter_for, run_journeys};
use petstore_bdd::steps::Harness;
use rstest::rstest;
use std::fs;
use test_support::{StubPetStore, config_for, harness_for};

#[rstest]
fn every_journey_passes_against_the_stub() -> Result<()> {
    let stub = StubPetStore::start();
    let (harness, evidence) = harness_for(&stub);
    let outcomes = run_journeys(&harness, &Journey::ALL);
    for outcome in &outcomes {
        ensure!(
            outcome.passed(),
            "{} failed: {:?}",
            outcome.journey,
            outcome.error
        );
    }
    ensure!(outcomes.len() == Journey::ALL.len(), "every journey should run");
    ensure!(
        evidence.contains_heading("Using Local Pet Data"),
        "known-pet journey should fall back on the unseeded stub"
    );
    ensure!(stub.order_count() == 0, "order journey should clean up");
    Ok(())
}

#[rstest]
fn journey_finishes_its_scenario() -> Result<()> {
    let stub = StubPetStore::start();
    let (harness, _) = harness_for(&stub);
    let ctx = Journey::Inventory.run(&harness)?;
    ensure!(ctx.phase() == ScenarioPhase::Done, "phase was {}", ctx.phase());
    ensure!(ctx.name() == "inventory", "scenario named after journey");
    Ok(())
}

#[rstest]
fn server_errors_fail_only_the_affected_journey() -> Result<()> {
    let stub = StubPetStore::start();
    stub.fail_pet_reads(Some(500));
    let (harness, _) = harness_for(&stub);
    let outcomes = run_journeys(&harness, &[Journey::KnownPet, Journey::Inventory]);
    let known = outcomes.first().context("known-pet outcome")?;
    ensure!(
        matches!(
            known.error,
            Some(HarnessError::UnexpectedStatus {
                operation: "get pet",
                status: 500,
                ..
            })
        ),
        "unexpected outcome: {:?}",
        known.error
    );
    ensure!(
        outcomes.get(1).is_some_and(|outcome| outcome.passed()),
        "inventory should still pass"
    );
    Ok(())
}

#[rstest]
fn evidence_log_collects_json_lines() -> Result<()> {
    let stub = StubPetStore::start();
    let temp = tempfile::tempdir().context("create temp dir")?;
    let path = Utf8PathBuf::from_path_buf(temp.path().join("evidence.jsonl"))
        .map_err(|p| anyhow::anyhow!("non UTF-8 temp path {}", p.display()))?;
    let config = config_for(stub.base_url()).with_evidence_log(path.clone());
    let harness = Harness::new(&config, reporter_for(&config)?);
    Journey::PetCreate.run(&harness)?;
    let text = fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()
        .context("every line is JSON")?;
    ensure!(!lines.is_empty(), "evidence should be written");
    ensure!(
        lines
            .iter()
            .any(|line| line["kind"] == "comparison" && line["label"] == "Pet Name"),
        "pet name comparison missing from {text}"
    );
    Ok(())
}
