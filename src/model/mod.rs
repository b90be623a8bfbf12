//! Pet-store API entities in their request and response shapes.
//!
//! Request shapes are what the harness submits; response shapes are what the
//! service returns. Response fields are `Option`s so that a field missing from
//! the wire is never confused with one explicitly set to an empty or zero
//! value. Request fields that are `None` are omitted from the serialised JSON.
//!
//! ```rust
//! use petstore_bdd::model::Pet;
//!
//! let json = r#"{"id": 7, "name": "Rex", "photoUrls": []}"#;
//! let pet: Pet = serde_json::from_str(json).expect("parse pet");
//! assert_eq!(pet.id, Some(7));
//! assert_eq!(pet.photo_urls, Some(Vec::new()));
//! assert!(pet.tags.is_none());
//! ```

mod pet;
mod store;
mod user;

pub use pet::{Category, Pet, PetRequest, Tag};
pub use store::{Inventory, Order, OrderRequest};
pub use user::{Credentials, UserRequest};

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope returned by user operations and most error responses.
///
/// The service answers with `{"code": 200, "type": "unknown", "message": "..."}`
/// for successful user writes and with the same shape for failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Numeric code echoed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Free-form classification such as `error` or `unknown`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Decode a JSON entity, accepting only a non-empty object.
///
/// Entity fields all default when missing, so `[]` or `{}` would otherwise
/// decode into an entity that carries nothing.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] for malformed JSON, for any value other
/// than a non-empty object and for objects that do not match `T`.
pub fn decode_entity<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) if map.is_empty() => {
            Err(serde_json::Error::custom("expected an object with fields, found {}"))
        }
        value @ Value::Object(_) => serde_json::from_value(value),
        other => Err(serde_json::Error::custom(format!(
            "expected a JSON object, found {}",
            kind_of(&other)
        ))),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
