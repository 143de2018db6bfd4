//! A client bound to a transport, with the access token attached for you.
//!
//! # Design
//! `Session` fetches one client-credentials token on first use and reuses it
//! until shortly before the `expires_in` Marketo advertised has passed, then
//! fetches a new one. It does not retry calls that fail with an expired or invalid token;
//! those come back as a normal `success: false` envelope.

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

use crate::client::MarketoClient;
use crate::command::Command;
use crate::error::MarketoError;
use crate::http::HttpResponse;
use crate::transport::Transport;

/// Seconds shaved off `expires_in` so a token is not sent as it lapses.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct Session<T> {
    client: MarketoClient,
    transport: T,
    token: Mutex<Option<CachedToken>>,
}

impl<T: Transport> Session<T> {
    pub fn new(client: MarketoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            token: Mutex::new(None),
        }
    }

    pub fn client(&self) -> &MarketoClient {
        &self.client
    }

    /// Execute `command` and decode the typed response.
    pub fn send<R>(&self, command: &Command<R>) -> Result<R, MarketoError> {
        let response = self.dispatch(command)?;
        command.parse(response)
    }

    /// Execute `command` and return the response body unparsed.
    pub fn send_raw<R>(&self, command: &Command<R>) -> Result<String, MarketoError> {
        let response = self.dispatch(command)?;
        command.parse_raw(response)
    }

    /// The current access token, fetching a new one when none is cached or
    /// the cached one has expired.
    pub fn access_token(&self) -> Result<String, MarketoError> {
        let mut cached = self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Utc::now()) {
            return Ok(token.value.clone());
        }

        let command = self.client.access_token_request();
        let request = self.client.prepare(&command, None)?;
        let token = command.parse(self.transport.execute(&request)?)?;
        log::info!("fetched Marketo access token, expires in {}s", token.expires_in);

        let expires_at = TimeDelta::try_seconds(token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS))
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                MarketoError::Deserialization(format!("access token expires_in {} is out of range", token.expires_in))
            })?;

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });
        Ok(value)
    }

    fn dispatch<R>(&self, command: &Command<R>) -> Result<HttpResponse, MarketoError> {
        let token = self.access_token()?;
        let request = self.client.prepare(command, Some(&token))?;
        self.transport.execute(&request)
    }
}
