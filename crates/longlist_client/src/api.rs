//! Transport seam between the client state machine and the list service.
//!
//! [`HttpApi`] talks to a running server; [`LocalApi`] calls a [`ListStore`]
//! in-process. Both implement [`ListApi`], which is all the backend worker
//! needs.

use longlist_core::models::state::{ItemsPage, StateSnapshot, UpdateStateRequest};
use longlist_core::{AppError, ListStore};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a [`ListApi`] call.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{action} failed ({status}): {message}")]
    Status {
        action: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Core(#[from] AppError),
}

/// The three wire operations of the list protocol.
pub trait ListApi: Send + 'static {
    /// `GetItems(offset, limit, search)`.
    fn get_items(&self, offset: usize, limit: usize, search: &str)
        -> Result<ItemsPage, ClientError>;

    /// `GetState()`.
    fn get_state(&self) -> Result<StateSnapshot, ClientError>;

    /// `UpdateState({sorted?, selected?})`.
    fn update_state(&self, request: &UpdateStateRequest) -> Result<(), ClientError>;
}

/// In-process transport backed directly by a shared [`ListStore`].
#[derive(Clone)]
pub struct LocalApi {
    store: Arc<ListStore>,
}

impl LocalApi {
    pub fn new(store: Arc<ListStore>) -> Self {
        Self { store }
    }
}

impl ListApi for LocalApi {
    fn get_items(
        &self,
        offset: usize,
        limit: usize,
        search: &str,
    ) -> Result<ItemsPage, ClientError> {
        Ok(self.store.get_window(offset, limit, search)?)
    }

    fn get_state(&self) -> Result<StateSnapshot, ClientError> {
        Ok(self.store.get_initial_state()?)
    }

    fn update_state(&self, request: &UpdateStateRequest) -> Result<(), ClientError> {
        Ok(self.store.update_state(request)?)
    }
}

/// Blocking HTTP transport for the `/api` routes.
pub struct HttpApi {
    client: reqwest::blocking::Client,
    base: reqwest::Url,
}

/// Normalize a user-supplied server address into a base URL.
///
/// A missing scheme defaults to `http://`; trailing slashes are dropped.
pub fn normalize_server(server: &str) -> String {
    let trimmed = server.trim();
    let mut normalized = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    while normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

fn ensure_success(
    res: reqwest::blocking::Response,
    action: &'static str,
) -> Result<reqwest::blocking::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = match res.text() {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    Err(ClientError::Status {
        action,
        status,
        message: error_message_for_response(status, &body),
    })
}

impl HttpApi {
    /// Build a client for the server at `server`.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUrl`] for an unparsable address, or an
    /// HTTP error if the underlying client cannot be built.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, ClientError> {
        let normalized = normalize_server(server);
        let base = reqwest::Url::parse(&normalized).map_err(|err| ClientError::InvalidUrl {
            url: server.to_string(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: server.to_string(),
                reason: "URL cannot be used as an API base".to_string(),
            });
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    fn api_url(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.push("api");
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }
}

impl ListApi for HttpApi {
    fn get_items(
        &self,
        offset: usize,
        limit: usize,
        search: &str,
    ) -> Result<ItemsPage, ClientError> {
        let res = self
            .client
            .get(self.api_url(&["items"]))
            .query(&[
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
                ("search", search.to_string()),
            ])
            .send()?;
        Ok(ensure_success(res, "GetItems")?.json()?)
    }

    fn get_state(&self) -> Result<StateSnapshot, ClientError> {
        let res = self.client.get(self.api_url(&["state"])).send()?;
        Ok(ensure_success(res, "GetState")?.json()?)
    }

    fn update_state(&self, request: &UpdateStateRequest) -> Result<(), ClientError> {
        let res = self
            .client
            .post(self.api_url(&["state"]))
            .json(request)
            .send()?;
        ensure_success(res, "UpdateState")?;
        Ok(())
    }
}
