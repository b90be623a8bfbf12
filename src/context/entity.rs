//! Per-entity scenario state.

use crate::error::{HarnessError, Result};

/// Outcome of the most recent read of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The service returned the entity.
    Live,
    /// The service answered 404 and nothing replaced the missing entity.
    NotFound,
    /// The service answered 404 and the reference fixture stands in.
    Fallback,
}

/// Request, response, reference fixture and identifier for one entity kind.
///
/// Each slot holds at most one value; setting a slot replaces its previous
/// content.
#[derive(Debug, Clone)]
pub struct EntityState<Req, Resp, Id> {
    kind: &'static str,
    request: Option<Req>,
    response: Option<Resp>,
    reference: Option<Resp>,
    id: Option<Id>,
    lookup: Option<Lookup>,
}

impl<Req, Resp, Id> EntityState<Req, Resp, Id> {
    /// Empty state for the entity kind named `kind`.
    #[must_use]
    pub const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            request: None,
            response: None,
            reference: None,
            id: None,
            lookup: None,
        }
    }

    /// Entity kind used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    const fn missing(&self, what: &'static str) -> HarnessError {
        HarnessError::MissingState {
            kind: self.kind,
            what,
        }
    }

    /// Store the request built by a Given step.
    pub fn set_request(&mut self, request: Req) {
        self.request = Some(request);
    }

    /// Current request, if any.
    #[must_use]
    pub const fn request(&self) -> Option<&Req> {
        self.request.as_ref()
    }

    /// Current request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when no request was set.
    pub fn require_request(&self) -> Result<&Req> {
        self.request.as_ref().ok_or_else(|| self.missing("request"))
    }

    /// Store the decoded response of a When step.
    pub fn set_response(&mut self, response: Resp) {
        self.response = Some(response);
    }

    /// Forget the decoded response, for example after a failed read.
    pub fn clear_response(&mut self) {
        self.response = None;
    }

    /// Current decoded response, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&Resp> {
        self.response.as_ref()
    }

    /// Current decoded response.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when no response was decoded.
    pub fn require_response(&self) -> Result<&Resp> {
        self.response.as_ref().ok_or_else(|| self.missing("response"))
    }

    /// Store the reference fixture the response is compared with.
    pub fn set_reference(&mut self, reference: Resp) {
        self.reference = Some(reference);
    }

    /// Reference fixture, if any.
    #[must_use]
    pub const fn reference(&self) -> Option<&Resp> {
        self.reference.as_ref()
    }

    /// Reference fixture.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when no fixture was loaded.
    pub fn require_reference(&self) -> Result<&Resp> {
        self.reference.as_ref().ok_or_else(|| self.missing("reference"))
    }

    /// Store the identifier subsequent steps address the entity by.
    pub fn set_id(&mut self, id: Id) {
        self.id = Some(id);
    }

    /// Current identifier, if any.
    #[must_use]
    pub const fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    /// Current identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingState`] when no identifier was set.
    pub fn require_id(&self) -> Result<&Id> {
        self.id.as_ref().ok_or_else(|| self.missing("identifier"))
    }

    /// Record the outcome of the latest read.
    pub fn set_lookup(&mut self, lookup: Lookup) {
        self.lookup = Some(lookup);
    }

    /// Outcome of the latest read, if a read happened.
    #[must_use]
    pub const fn lookup(&self) -> Option<Lookup> {
        self.lookup
    }
}
