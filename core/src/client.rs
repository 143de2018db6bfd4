//! Request preparation for the Marketo REST API.
//!
//! # Design
//! `MarketoClient` holds only its configuration and carries no mutable
//! state between calls. The per-operation facade methods (see `api/`)
//! produce `Command` values; `prepare` turns any command into an
//! `HttpRequest` by interpreting the command's `Operation` descriptor. The
//! caller (or a `Session`) executes the round trip and hands the response
//! back to `Command::parse`.

use serde_json::Value;
use uuid::Uuid;

use crate::command::{Attachment, Command, Params};
use crate::config::ClientConfig;
use crate::error::MarketoError;
use crate::http::{encode_query, HttpRequest};
use crate::operation::{self, BodyKind, Family};
use crate::types::AccessToken;

const JSON: &str = "application/json";

/// Stateless request builder for one Marketo instance.
#[derive(Debug, Clone)]
pub struct MarketoClient {
    config: ClientConfig,
    instance_url: String,
}

impl MarketoClient {
    /// Fails with `MarketoError::Config` when neither a URL nor a munchkin
    /// id is configured.
    pub fn new(config: ClientConfig) -> Result<Self, MarketoError> {
        let instance_url = config.instance_url()?;
        Ok(Self { config, instance_url })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Base URL operations of `family` are relative to.
    pub fn base_url(&self, family: Family) -> String {
        match family {
            Family::Base => {
                let kind = if self.config.bulk { "bulk" } else { "rest" };
                format!("{}/{kind}/v{}", self.instance_url, self.config.version)
            }
            Family::Asset => format!("{}/rest/asset/v1", self.instance_url),
            Family::Identity => format!("{}/identity", self.instance_url),
        }
    }

    /// Client-credentials grant against the identity endpoint.
    pub fn access_token_request(&self) -> Command<AccessToken> {
        let mut params = Params::new();
        params.insert("grant_type".into(), "client_credentials".into());
        params.insert("client_id".into(), self.config.client_id.clone().into());
        params.insert("client_secret".into(), self.config.client_secret.clone().into());
        Command::new(&operation::GET_ACCESS_TOKEN, params)
    }

    /// Build the HTTP request for `command`, attaching `access_token` as a
    /// bearer token when given.
    pub fn prepare<R>(&self, command: &Command<R>, access_token: Option<&str>) -> Result<HttpRequest, MarketoError> {
        let op = command.operation();
        let placeholders: Vec<&str> = op.placeholders().collect();

        let mut path = op.path.to_string();
        for name in &placeholders {
            let value = command
                .param(name)
                .filter(|v| !v.is_null())
                .ok_or_else(|| MarketoError::invalid(format!("missing path parameter \"{name}\"")))?;
            let value = path_value(name, value)?;
            if op.is_reserved(name) {
                path = path.replace(&format!("{{+{name}}}"), &value);
            } else {
                path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(&value));
            }
        }

        let mut query = Params::new();
        let mut body = Params::new();
        for (key, value) in command.params() {
            if placeholders.contains(&key.as_str()) {
                continue;
            }
            if op.is_query_param(key) {
                query.insert(key.clone(), value.clone());
            } else {
                body.insert(key.clone(), value.clone());
            }
        }

        let mut url = format!("{}/{path}", self.base_url(op.family));
        let query = encode_query(&query, command.array_encoding())?;
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let mut headers = Vec::new();
        let body = match op.body {
            BodyKind::None => {
                headers.push(("content-type".to_string(), JSON.to_string()));
                None
            }
            BodyKind::Json => {
                headers.push(("content-type".to_string(), JSON.to_string()));
                if body.is_empty() {
                    None
                } else {
                    Some(serde_json::to_vec(&body).map_err(|e| MarketoError::Serialization(e.to_string()))?)
                }
            }
            BodyKind::Multipart => {
                let boundary = format!("marketo-{}", Uuid::new_v4().simple());
                headers.push((
                    "content-type".to_string(),
                    format!("multipart/form-data; boundary={boundary}"),
                ));
                Some(multipart_body(&boundary, &body, command.attachment()))
            }
        };
        if let Some(token) = access_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        log::debug!(
            "prepared {} {} {}",
            op.name,
            op.method.as_str(),
            url.split('?').next().unwrap_or_default()
        );

        Ok(HttpRequest {
            method: op.method,
            url,
            headers,
            body,
        })
    }
}

fn path_value(name: &str, value: &Value) -> Result<String, MarketoError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(MarketoError::invalid(format!(
            "path parameter \"{name}\" must be a non-empty string or a number"
        ))),
    }
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Percent-escapes `"`, CR and LF inside a `Content-Disposition` parameter.
fn disposition_value(value: &str) -> String {
    value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

fn multipart_body(boundary: &str, fields: &Params, attachment: Option<&Attachment>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        if value.is_null() {
            continue;
        }
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                disposition_value(name),
                form_value(value)
            )
            .as_bytes(),
        );
    }
    if let Some(file) = attachment {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                disposition_value(&file.field),
                disposition_value(&file.file_name),
                file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.contents);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
