//! The seam between request building and network I/O.
//!
//! # Design
//! The core never opens a socket itself. Anything that can execute an
//! `HttpRequest` and describe the reply as an `HttpResponse` can drive a
//! `Session`: a real HTTP client, a recorded fixture, or a test double.
//! Non-2xx responses must be returned as data, not as errors, so that
//! `Command::parse` decides how to report them.

use crate::error::MarketoError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, MarketoError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, MarketoError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::Transport;
    use crate::error::MarketoError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    // Bulk extract files can be far larger than ureq's default body limit.
    const MAX_BODY_BYTES: u64 = 1024 * 1024 * 1024;

    /// Blocking transport backed by a `ureq::Agent`.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, MarketoError> {
            let url = request.url.as_str();
            let headers = &request.headers;
            let result = match (request.method, request.body.as_deref()) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
                (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
                (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
                (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
                (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body),
                (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            };
            let mut response = result.map_err(|e| MarketoError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .with_config()
                .limit(MAX_BODY_BYTES)
                .read_to_string()
                .map_err(|e| MarketoError::Transport(e.to_string()))?;
            log::debug!("{} {} -> {status}", request.method.as_str(), url.split('?').next().unwrap_or_default());

            Ok(HttpResponse { status, headers, body })
        }
    }
}
