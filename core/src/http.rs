//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values; a
//! `Transport` (see `transport.rs`) performs the actual I/O.
//!
//! Query strings are serialized here rather than by the transport. Marketo
//! expects collections as repeated flat keys (`id=1&id=2`), while most
//! generic HTTP stacks emit bracketed indices (`id[0]=1&id[1]=2`), so the
//! encoding is an explicit per-command choice.

use serde_json::Value;

use crate::error::MarketoError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `MarketoClient::prepare`. `url` is absolute and already carries
/// the serialized query string. Multipart bodies carry uploaded file
/// contents byte for byte, so the body is raw bytes.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// The serialized query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }

    /// The body as text, when there is one and it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref().and_then(|body| std::str::from_utf8(body).ok())
    }

    /// First header value with the given (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by a `Transport` after executing an `HttpRequest`, then
/// passed to `Command::parse` or `Command::parse_raw`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// How array values are written into a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayEncoding {
    /// `id%5B0%5D=1&id%5B1%5D=2`
    #[default]
    Indexed,
    /// `id=1&id=2`
    Repeated,
}

/// Serialize query parameters into an `application/x-www-form-urlencoded`
/// string. `null` values are dropped; nested objects use `key[field]`.
pub fn encode_query<'a, I>(params: I, encoding: ArrayEncoding) -> Result<String, MarketoError>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten(key.clone(), value, encoding, &mut pairs);
    }
    serde_html_form::to_string(&pairs).map_err(|e| MarketoError::Serialization(e.to_string()))
}

fn flatten(key: String, value: &Value, encoding: ArrayEncoding, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key, b.to_string())),
        Value::Number(n) => out.push((key, n.to_string())),
        Value::String(s) => out.push((key, s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let item_key = match encoding {
                    ArrayEncoding::Repeated => key.clone(),
                    ArrayEncoding::Indexed => format!("{key}[{index}]"),
                };
                flatten(item_key, item, encoding, out);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten(format!("{key}[{field}]"), item, encoding, out);
            }
        }
    }
}
