//! In-memory pet-store stub served over HTTP.
//!
//! The stub implements the subset of the Swagger pet-store v2 API the
//! scenarios exercise, with the same status codes and `{code, type, message}`
//! error envelopes as the public deployment. State lives behind a mutex so
//! tests can seed pets and users or inject read failures while the server
//! thread handles requests.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tiny_http::{Header, Request, Response, Server};
use url::Url;

/// Path prefix under which the stub serves the API.
pub const API_PREFIX: &str = "v2";

/// First identifier handed out for pets and orders.
const FIRST_ID: i64 = 1000;

/// Statuses always reported by the inventory endpoint.
const INVENTORY_STATUSES: [&str; 3] = ["available", "pending", "sold"];

/// One request observed by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method, upper case.
    pub method: String,
    /// Path below [`API_PREFIX`], for example `store/order/3`.
    pub path: String,
    /// Value of the `api_key` header, when sent.
    pub api_key: Option<String>,
}

#[derive(Debug)]
struct StoreState {
    next_id: i64,
    pets: BTreeMap<i64, Value>,
    orders: BTreeMap<i64, Value>,
    users: BTreeMap<String, Value>,
    pet_read_failure: Option<u16>,
    requests: Vec<RecordedRequest>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            next_id: FIRST_ID,
            pets: BTreeMap::new(),
            orders: BTreeMap::new(),
            users: BTreeMap::new(),
            pet_read_failure: None,
            requests: Vec::new(),
        }
    }
}

impl StoreState {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Running stub server.
///
/// Dropping the handle stops the server and joins its thread.
#[must_use]
pub struct StubPetStore {
    base_url: String,
    server: Arc<Server>,
    state: Arc<Mutex<StoreState>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubPetStore {
    /// Start a stub on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics when no port can be bound.
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind stub pet store"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("stub listens on an IP socket");
        let state = Arc::new(Mutex::new(StoreState::default()));
        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::spawn(move || serve(&server, &state))
        };
        Self {
            base_url: format!("http://{addr}/{API_PREFIX}"),
            server,
            state,
            handle: Some(handle),
        }
    }

    /// Base URL including the API prefix.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store `pet` as if it had been created earlier. The pet must carry an
    /// `id`.
    ///
    /// # Panics
    ///
    /// Panics when `pet` has no integer `id`.
    pub fn seed_pet(&self, pet: Value) {
        let id = pet
            .get("id")
            .and_then(Value::as_i64)
            .expect("seeded pet needs an id");
        lock(&self.state).pets.insert(id, pet);
    }

    /// Register a user that can log in with `password`.
    pub fn seed_user(&self, username: &str, password: &str) {
        lock(&self.state).users.insert(
            username.to_owned(),
            json!({ "username": username, "password": password, "userStatus": 0 }),
        );
    }

    /// Answer every pet read with `status` until reset with `None`.
    pub fn fail_pet_reads(&self, status: Option<u16>) {
        lock(&self.state).pet_read_failure = status;
    }

    /// Requests observed so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Number of orders currently stored.
    #[must_use]
    pub fn order_count(&self) -> usize {
        lock(&self.state).orders.len()
    }
}

impl std::fmt::Debug for StubPetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubPetStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Drop for StubPetStore {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn serve(server: &Server, state: &Mutex<StoreState>) {
    for mut request in server.incoming_requests() {
        let mut body = String::new();
        let (status, payload) = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => handle(state, &request, &body),
            Err(_) => (400, envelope(400, "unknown", "unreadable request body")),
        };
        // A client that hung up needs no answer.
        request.respond(json_response(status, &payload)).ok();
    }
}

fn json_response(status: u16, payload: &Value) -> Response<std::io::Cursor<Vec<u8>>> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("static header is valid");
    Response::from_string(payload.to_string())
        .with_status_code(status)
        .with_header(header)
}

fn envelope(code: i64, kind: &str, message: &str) -> Value {
    json!({ "code": code, "type": kind, "message": message })
}

fn handle(state: &Mutex<StoreState>, request: &Request, body: &str) -> (u16, Value) {
    let Ok(url) = Url::parse(&format!("http://stub{}", request.url())) else {
        return (400, envelope(400, "unknown", "bad request"));
    };
    let segments: Vec<String> = url
        .path_segments()
        .map(|parts| parts.filter(|p| !p.is_empty()).map(str::to_owned).collect())
        .unwrap_or_default();
    let api_key = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("api_key"))
        .map(|header| header.value.as_str().to_owned());
    let method = request.method().as_str().to_owned();
    let mut guard = lock(state);
    let store = &mut *guard;
    let path: Vec<&str> = segments.iter().map(String::as_str).collect();
    let Some((&API_PREFIX, route)) = path.split_first() else {
        return (404, envelope(404, "unknown", "not found"));
    };
    store.requests.push(RecordedRequest {
        method: method.clone(),
        path: route.join("/"),
        api_key: api_key.clone(),
    });
    match (method.as_str(), route) {
        ("POST", ["pet"]) => add_pet(store, body),
        ("GET", ["pet", id]) => get_pet(store, id),
        ("POST", ["store", "order"]) => place_order(store, body),
        ("GET", ["store", "order", id]) => get_order(store, id),
        ("DELETE", ["store", "order", id]) => delete_order(store, id, api_key.as_deref()),
        ("GET", ["store", "inventory"]) => (200, inventory(store)),
        ("POST", ["user"]) => create_user(store, body),
        ("GET", ["user", "login"]) => login(store, &url),
        ("DELETE", ["user", username]) => delete_user(store, username),
        _ => (404, envelope(404, "unknown", "not found")),
    }
}

fn parse_object(body: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn add_pet(store: &mut StoreState, body: &str) -> (u16, Value) {
    let Some(mut pet) = parse_object(body) else {
        return (405, envelope(405, "unknown", "Invalid input"));
    };
    let id = match pet.get("id").and_then(Value::as_i64) {
        Some(id) if id > 0 => id,
        _ => store.allocate_id(),
    };
    pet.insert(String::from("id"), json!(id));
    let pet = Value::Object(pet);
    store.pets.insert(id, pet.clone());
    (200, pet)
}

fn get_pet(store: &StoreState, id: &str) -> (u16, Value) {
    if let Some(status) = store.pet_read_failure {
        return (status, envelope(i64::from(status), "unknown", "something bad happened"));
    }
    id.parse::<i64>()
        .ok()
        .and_then(|id| store.pets.get(&id))
        .map_or_else(
            || (404, envelope(1, "error", "Pet not found")),
            |pet| (200, pet.clone()),
        )
}

fn place_order(store: &mut StoreState, body: &str) -> (u16, Value) {
    let Some(mut order) = parse_object(body) else {
        return (400, envelope(400, "error", "invalid order: malformed body"));
    };
    if order.get("petId").and_then(Value::as_i64).is_none() {
        return (400, envelope(400, "error", "invalid order: missing petId"));
    }
    let id = match order.get("id").and_then(Value::as_i64) {
        Some(id) if id > 0 => id,
        _ => store.allocate_id(),
    };
    order.insert(String::from("id"), json!(id));
    order
        .entry(String::from("complete"))
        .or_insert(Value::Bool(false));
    let order = Value::Object(order);
    store.orders.insert(id, order.clone());
    (200, order)
}

fn get_order(store: &StoreState, id: &str) -> (u16, Value) {
    id.parse::<i64>()
        .ok()
        .and_then(|id| store.orders.get(&id))
        .map_or_else(
            || (404, envelope(1, "error", "Order not found")),
            |order| (200, order.clone()),
        )
}

fn delete_order(store: &mut StoreState, id: &str, api_key: Option<&str>) -> (u16, Value) {
    if api_key.is_none() {
        return (401, envelope(401, "error", "missing api_key header"));
    }
    match id.parse::<i64>().ok().and_then(|id| store.orders.remove(&id)) {
        Some(_) => (200, envelope(200, "unknown", id)),
        None => (404, envelope(404, "unknown", "Order Not Found")),
    }
}

fn inventory(store: &StoreState) -> Value {
    let mut counts = Map::new();
    for status in INVENTORY_STATUSES {
        counts.insert(status.to_owned(), json!(0));
    }
    for pet in store.pets.values() {
        if let Some(status) = pet.get("status").and_then(Value::as_str) {
            let entry = counts.entry(status.to_owned()).or_insert(json!(0));
            *entry = json!(entry.as_i64().unwrap_or_default() + 1);
        }
    }
    Value::Object(counts)
}

fn create_user(store: &mut StoreState, body: &str) -> (u16, Value) {
    let Some(user) = parse_object(body) else {
        return (400, envelope(400, "unknown", "Invalid user supplied"));
    };
    let Some(username) = user.get("username").and_then(Value::as_str).map(str::to_owned) else {
        return (400, envelope(400, "unknown", "Invalid user supplied"));
    };
    store.users.insert(username, Value::Object(user));
    let id = store.allocate_id();
    (200, envelope(200, "unknown", &id.to_string()))
}

fn login(store: &StoreState, url: &Url) -> (u16, Value) {
    let mut username = None;
    let mut password = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "username" => username = Some(value.into_owned()),
            "password" => password = Some(value.into_owned()),
            _ => {}
        }
    }
    let accepted = username
        .as_deref()
        .and_then(|name| store.users.get(name))
        .and_then(|user| user.get("password"))
        .and_then(Value::as_str)
        .is_some_and(|stored| Some(stored) == password.as_deref());
    if accepted {
        (200, envelope(200, "unknown", "logged in user session:1"))
    } else {
        (400, envelope(400, "unknown", "Invalid username/password supplied"))
    }
}

fn delete_user(store: &mut StoreState, username: &str) -> (u16, Value) {
    match store.users.remove(username) {
        Some(_) => (200, envelope(200, "unknown", username)),
        None => (404, envelope(404, "unknown", "User not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn get(url: &str) -> (u16, String) {
        match ureq::get(url).call() {
            Ok(resp) => (resp.status(), resp.into_string().expect("body")),
            Err(ureq::Error::Status(code, resp)) => (code, resp.into_string().expect("body")),
            Err(err) => panic!("transport failure: {err}"),
        }
    }

    #[rstest]
    fn unknown_pet_is_not_found() {
        let stub = StubPetStore::start();
        let (status, body) = get(&format!("{}/pet/42", stub.base_url()));
        assert_eq!(status, 404);
        assert!(body.contains("Pet not found"));
    }

    #[rstest]
    fn seeded_pet_is_served_and_counted() {
        let stub = StubPetStore::start();
        stub.seed_pet(json!({ "id": 7, "name": "Rex", "status": "pending" }));
        let (status, body) = get(&format!("{}/pet/7", stub.base_url()));
        assert_eq!(status, 200);
        assert!(body.contains("Rex"));
        let (_, inventory) = get(&format!("{}/store/inventory", stub.base_url()));
        let counts: Value = serde_json::from_str(&inventory).expect("json inventory");
        assert_eq!(counts["pending"], json!(1));
        assert_eq!(counts["sold"], json!(0));
    }

    #[rstest]
    fn injected_failure_applies_to_pet_reads() {
        let stub = StubPetStore::start();
        stub.fail_pet_reads(Some(503));
        let (status, _) = get(&format!("{}/pet/1", stub.base_url()));
        assert_eq!(status, 503);
        assert_eq!(stub.requests().len(), 1);
    }
}
