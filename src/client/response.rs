//! Captured HTTP responses.

use crate::error::{HarnessError, Result};
use crate::model::{ApiMessage, decode_entity};
use serde::de::DeserializeOwned;

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    body: String,
}

impl ApiResponse {
    /// Capture a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// Returns `true` for a 404 status.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Decode`] naming `entity` when the body is not
    /// a non-empty JSON object matching `T`.
    pub fn json<T: DeserializeOwned>(&self, entity: &'static str) -> Result<T> {
        decode_entity(&self.body).map_err(|source| HarnessError::Decode { entity, source })
    }

    /// Human-readable message: the envelope's `message` field when the body
    /// is an [`ApiMessage`], otherwise the raw body.
    #[must_use]
    pub fn message(&self) -> String {
        serde_json::from_str::<ApiMessage>(&self.body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pet;
    use rstest::rstest;

    #[rstest]
    #[case(200, true, false)]
    #[case(204, true, false)]
    #[case(404, false, true)]
    #[case(500, false, false)]
    fn classifies_status(#[case] status: u16, #[case] success: bool, #[case] not_found: bool) {
        let response = ApiResponse::new(status, "");
        assert_eq!(response.is_success(), success);
        assert_eq!(response.is_not_found(), not_found);
    }

    #[rstest]
    #[case(r#"{"code":1,"type":"error","message":"Order Not Found"}"#, "Order Not Found")]
    #[case(r#"{"code":1,"type":"error"}"#, r#"{"code":1,"type":"error"}"#)]
    #[case("plain failure", "plain failure")]
    fn message_prefers_envelope(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(ApiResponse::new(404, body).message(), expected);
    }

    #[rstest]
    #[case("[]")]
    #[case("{}")]
    #[case(r#"{"id":"seven"}"#)]
    fn decode_failure_names_entity(#[case] body: &str) {
        let err = ApiResponse::new(200, body)
            .json::<Pet>("pet")
            .expect_err("body is not a pet");
        assert!(matches!(err, HarnessError::Decode { entity: "pet", .. }));
    }
}
