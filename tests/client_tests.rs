//! Integration tests for the HTTP client against the stub pet store.

use anyhow::{Context, Result, ensure};
use petstore_bdd::client::{ApiCall, ApiClient, Endpoint};
use petstore_bdd::error::HarnessError;
use petstore_bdd::model::{Pet, PetRequest};
use rstest::{fixture, rstest};
use serde_json::json;
use test_support::{StubPetStore, config_for};

#[fixture]
fn stub() -> StubPetStore {
    StubPetStore::start()
}

fn client(stub: &StubPetStore) -> ApiClient {
    ApiClient::new(&config_for(stub.base_url()))
}

#[rstest]
fn added_pet_is_echoed_with_an_id(stub: StubPetStore) -> Result<()> {
    let request = PetRequest {
        name: String::from("Biscuit"),
        status: String::from("pending"),
        ..PetRequest::default()
    };
    let call = ApiCall::new(Endpoint::AddPet).with_json(&request)?;
    let response = client(&stub).execute(&call)?;
    ensure!(response.is_success(), "unexpected status {}", response.status());
    let pet: Pet = response.json("pet")?;
    ensure!(pet.id.is_some_and(|id| id > 0), "pet should get an id");
    ensure!(pet.name.as_deref() == Some("Biscuit"), "name should echo");
    Ok(())
}

#[rstest]
fn not_found_is_a_response_not_an_error(stub: StubPetStore) -> Result<()> {
    let response = client(&stub).execute(&ApiCall::new(Endpoint::GetPet(404_404)))?;
    ensure!(response.is_not_found(), "expected 404, got {}", response.status());
    ensure!(response.message() == "Pet not found", "message: {}", response.message());
    Ok(())
}

#[rstest]
fn api_key_is_sent_only_when_given(stub: StubPetStore) -> Result<()> {
    let client = client(&stub);
    client.execute(&ApiCall::new(Endpoint::DeleteOrder(1)).with_api_key(Some("special-key")))?;
    let unauthorised = client.execute(&ApiCall::new(Endpoint::DeleteOrder(1)))?;
    ensure!(unauthorised.status() == 401, "delete without key should be refused");
    let keys: Vec<_> = stub
        .requests()
        .into_iter()
        .map(|request| request.api_key)
        .collect();
    ensure!(
        keys == vec![Some(String::from("special-key")), None],
        "unexpected keys: {keys:?}"
    );
    Ok(())
}

#[rstest]
fn login_credentials_travel_in_the_query(stub: StubPetStore) -> Result<()> {
    stub.seed_user("amy", "p&ss word");
    let response = client(&stub).execute(&ApiCall::new(Endpoint::Login {
        username: String::from("amy"),
        password: String::from("p&ss word"),
    }))?;
    ensure!(response.is_success(), "login failed: {}", response.body());
    Ok(())
}

#[rstest]
fn seeded_pet_round_trips(stub: StubPetStore) -> Result<()> {
    stub.seed_pet(json!({ "id": 55, "name": "Tama", "photoUrls": [], "status": "sold" }));
    let response = client(&stub).execute(&ApiCall::new(Endpoint::GetPet(55)))?;
    let pet: Pet = response.json("pet")?;
    ensure!(pet.status.as_deref() == Some("sold"), "status should round trip");
    Ok(())
}

#[rstest]
fn unreachable_service_is_a_transport_error() -> Result<()> {
    let base_url = {
        let stub = StubPetStore::start();
        stub.base_url().to_owned()
    };
    let err = ApiClient::new(&config_for(&base_url))
        .execute(&ApiCall::new(Endpoint::Inventory))
        .err()
        .context("closed port should not answer")?;
    ensure!(
        matches!(err, HarnessError::Transport { method: "GET", .. }),
        "unexpected error: {err}"
    );
    Ok(())
}
