//! Tests for the checked-in reference payloads.

use anyhow::{Context, Result, ensure};
use petstore_bdd::fixture::FixtureLoader;
use petstore_bdd::model::Pet;
use rstest::rstest;
use test_support::fixtures_dir;

#[rstest]
fn known_pet_fixture_is_complete() -> Result<()> {
    let pet = FixtureLoader::new(fixtures_dir()).load_known_pet()?;
    ensure!(pet.id == Some(10), "reference pet id should be 10");
    ensure!(pet.name.as_deref() == Some("doggie"), "reference pet name");
    ensure!(pet.category_name() == Some("Dogs"), "reference category");
    let tags = pet.tags.context("reference pet has tags")?;
    ensure!(tags.len() == 1, "one tag expected, got {}", tags.len());
    let photos = pet.photo_urls.context("reference pet has photos")?;
    ensure!(photos.len() == 1, "one photo expected, got {}", photos.len());
    Ok(())
}

#[rstest]
fn generic_loader_reads_the_same_payload() -> Result<()> {
    let loader = FixtureLoader::new(fixtures_dir());
    let generic: Pet = loader.load_reference(petstore_bdd::fixture::KNOWN_PET)?;
    ensure!(generic == loader.load_known_pet()?, "loaders should agree");
    Ok(())
}
