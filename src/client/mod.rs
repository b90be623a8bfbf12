//! HTTP access to the pet-store service.
//!
//! [`Endpoint`] names every operation the scenarios exercise and knows its
//! method and path. [`ApiClient`] executes an [`ApiCall`] synchronously and
//! captures the status and body whatever the status was; deciding whether a
//! status is acceptable is left to the step that issued the call. Only
//! transport failures (DNS, refused connections, timeouts) become errors.

mod response;

pub use response::ApiResponse;

use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use serde::Serialize;
use std::fmt;
use ureq::{Agent, AgentBuilder};
use url::Url;

/// Header carrying the store-manager key.
pub const API_KEY_HEADER: &str = "api_key";
const JSON: &str = "application/json";

/// HTTP methods used by the pet-store API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pet-store operations, each with its method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /pet`
    AddPet,
    /// `GET /pet/{id}`
    GetPet(i64),
    /// `POST /store/order`, used both to place and to update orders.
    PlaceOrder,
    /// `GET /store/order/{id}`
    GetOrder(i64),
    /// `DELETE /store/order/{id}`
    DeleteOrder(i64),
    /// `GET /store/inventory`
    Inventory,
    /// `POST /user`
    CreateUser,
    /// `GET /user/login?username=&password=`
    Login {
        /// Login name.
        username: String,
        /// Login password.
        password: String,
    },
    /// `DELETE /user/{username}`
    DeleteUser(String),
}

impl Endpoint {
    /// HTTP method for this operation.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::AddPet | Self::PlaceOrder | Self::CreateUser => Method::Post,
            Self::GetPet(_) | Self::GetOrder(_) | Self::Inventory | Self::Login { .. } => {
                Method::Get
            }
            Self::DeleteOrder(_) | Self::DeleteUser(_) => Method::Delete,
        }
    }

    /// Path segments below the base URL.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::AddPet => fixed(&["pet"]),
            Self::GetPet(id) => vec![String::from("pet"), id.to_string()],
            Self::PlaceOrder => fixed(&["store", "order"]),
            Self::GetOrder(id) | Self::DeleteOrder(id) => {
                vec![String::from("store"), String::from("order"), id.to_string()]
            }
            Self::Inventory => fixed(&["store", "inventory"]),
            Self::CreateUser => fixed(&["user"]),
            Self::Login { .. } => fixed(&["user", "login"]),
            Self::DeleteUser(username) => vec![String::from("user"), username.clone()],
        }
    }

    /// Query parameters, in order.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Login { username, password } => {
                vec![("username", username.as_str()), ("password", password.as_str())]
            }
            _ => Vec::new(),
        }
    }

    /// Resolve the absolute URL of this operation against `base`.
    ///
    /// Path segments are percent-encoded, so usernames containing `/` or
    /// spaces stay a single segment.
    ///
    /// ```rust
    /// use petstore_bdd::client::Endpoint;
    /// use url::Url;
    ///
    /// let base = Url::parse("http://localhost:8080/v2/").expect("base url");
    /// let url = Endpoint::GetOrder(5).url(&base).expect("resolvable");
    /// assert_eq!(url.as_str(), "http://localhost:8080/v2/store/order/5");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when `base` cannot carry path
    /// segments.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                HarnessError::configuration(format!("base URL '{base}' cannot carry a path"))
            })?
            .pop_if_empty()
            .extend(self.segments());
        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn fixed(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| (*part).to_owned()).collect()
}

/// One request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    endpoint: Endpoint,
    api_key: Option<String>,
    body: Option<String>,
}

impl ApiCall {
    /// Call `endpoint` without a body or API key.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            api_key: None,
            body: None,
        }
    }

    /// Attach the store-manager key, when one is known.
    #[must_use]
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = key.map(str::to_owned);
        self
    }

    /// Serialise `payload` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] when `payload` cannot be
    /// serialised.
    pub fn with_json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload).map_err(|err| {
            HarnessError::configuration(format!("request body cannot be serialised: {err}"))
        })?;
        self.body = Some(body);
        Ok(self)
    }

    /// Target operation.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Synchronous pet-store client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: Agent,
    base_url: Url,
}

impl ApiClient {
    /// Build a client honouring the configured base URL and timeout.
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        let agent = AgentBuilder::new().timeout(config.timeout()).build();
        Self {
            agent,
            base_url: config.base_url().clone(),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send `call` and capture the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Transport`] when no response was received and
    /// [`HarnessError::ResponseBody`] when the body could not be read.
    pub fn execute(&self, call: &ApiCall) -> Result<ApiResponse> {
        let method = call.endpoint.method();
        let url = call.endpoint.url(&self.base_url)?;
        let mut request = self
            .agent
            .request_url(method.as_str(), &url)
            .set("Accept", JSON)
            .set("Content-Type", JSON);
        if let Some(key) = &call.api_key {
            request = request.set(API_KEY_HEADER, key);
        }
        tracing::debug!(%method, %url, "sending request");
        let outcome = match &call.body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };
        let response = match outcome {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                tracing::error!(%method, %url, error = %transport, "request failed");
                return Err(HarnessError::Transport {
                    method: method.as_str(),
                    url: url.to_string(),
                    source: Box::new(transport),
                });
            }
        };
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|source| HarnessError::ResponseBody {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(%method, %url, status, "received response");
        Ok(ApiResponse::new(status, body))
    }
}
