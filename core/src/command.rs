//! Request descriptors produced by the `MarketoClient` facade.
//!
//! # Design
//! A `Command<R>` is an operation plus its parameters, built fresh for each
//! call. It knows how to decode its own response into `R`, so the session
//! and the host can dispatch any command without per-operation code. Raw
//! body mode is `parse_raw`, available on every command.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::MarketoError;
use crate::http::{ArrayEncoding, HttpResponse};
use crate::operation::Operation;

/// Ordered parameter mapping. Later inserts of the same key overwrite.
pub type Params = Map<String, Value>;

/// A file sent as one part of a multipart upload. `contents` is sent
/// unchanged, whatever its encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub contents: Vec<u8>,
}

pub struct Command<R> {
    operation: &'static Operation,
    params: Params,
    array_encoding: ArrayEncoding,
    attachment: Option<Attachment>,
    decode: fn(&str) -> Result<R, MarketoError>,
}

impl<R: DeserializeOwned> Command<R> {
    pub(crate) fn new(operation: &'static Operation, params: Params) -> Self {
        Self::with_decoder(operation, params, decode_json::<R>)
    }
}

impl Command<String> {
    /// A command whose successful response is a file (CSV) rather than JSON.
    pub(crate) fn file(operation: &'static Operation, params: Params) -> Self {
        Self::with_decoder(operation, params, |body| Ok(body.to_string()))
    }
}

impl<R> Command<R> {
    fn with_decoder(
        operation: &'static Operation,
        params: Params,
        decode: fn(&str) -> Result<R, MarketoError>,
    ) -> Self {
        Self {
            operation,
            params,
            array_encoding: ArrayEncoding::Indexed,
            attachment: None,
            decode,
        }
    }

    /// Encode array parameters as repeated flat keys in the query string.
    pub(crate) fn flatten_arrays(mut self) -> Self {
        self.array_encoding = ArrayEncoding::Repeated;
        self
    }

    pub(crate) fn attach(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn name(&self) -> &'static str {
        self.operation.name
    }

    pub fn operation(&self) -> &'static Operation {
        self.operation
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn array_encoding(&self) -> ArrayEncoding {
        self.array_encoding
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Decode a response into the typed wrapper.
    pub fn parse(&self, response: HttpResponse) -> Result<R, MarketoError> {
        check_status(&response)?;
        (self.decode)(&response.body)
    }

    /// Return the unparsed response body.
    pub fn parse_raw(&self, response: HttpResponse) -> Result<String, MarketoError> {
        check_status(&response)?;
        Ok(response.body)
    }
}

impl<R> fmt::Debug for Command<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("operation", &self.operation.name)
            .field("params", &self.params)
            .field("array_encoding", &self.array_encoding)
            .field("attachment", &self.attachment.as_ref().map(|a| &a.file_name))
            .finish()
    }
}

fn decode_json<R: DeserializeOwned>(body: &str) -> Result<R, MarketoError> {
    serde_json::from_str(body).map_err(|e| MarketoError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to `MarketoError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), MarketoError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(MarketoError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{GET_BULK_LEAD_EXTRACT_JOB_RESULTS, GET_LIST};
    use crate::types::{ApiResponse, StaticList};

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn parse_decodes_json_envelope() {
        let cmd: Command<ApiResponse<StaticList>> = Command::new(&GET_LIST, Params::new());
        let parsed = cmd
            .parse(response(200, r#"{"requestId":"a#1","success":true,"result":[{"id":7,"name":"VIP"}]}"#))
            .unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.result[0].name, "VIP");
    }

    #[test]
    fn parse_raw_returns_body_untouched() {
        let cmd: Command<ApiResponse<StaticList>> = Command::new(&GET_LIST, Params::new());
        let raw = cmd.parse_raw(response(200, "{\"success\":true}")).unwrap();
        assert_eq!(raw, "{\"success\":true}");
    }

    #[test]
    fn file_commands_return_csv_as_is() {
        let cmd = Command::file(&GET_BULK_LEAD_EXTRACT_JOB_RESULTS, Params::new());
        let csv = cmd.parse(response(200, "id,email\n1,a@b.com\n")).unwrap();
        assert_eq!(csv, "id,email\n1,a@b.com\n");
    }

    #[test]
    fn non_2xx_is_http_error() {
        let cmd: Command<ApiResponse<StaticList>> = Command::new(&GET_LIST, Params::new());
        let err = cmd.parse(response(503, "unavailable")).unwrap_err();
        assert!(matches!(err, MarketoError::Http { status: 503, ref body } if body == "unavailable"));
        let err = cmd.parse_raw(response(404, "")).unwrap_err();
        assert!(matches!(err, MarketoError::Http { status: 404, .. }));
    }

    #[test]
    fn bad_json_is_deserialization_error() {
        let cmd: Command<ApiResponse<StaticList>> = Command::new(&GET_LIST, Params::new());
        let err = cmd.parse(response(200, "not json")).unwrap_err();
        assert!(matches!(err, MarketoError::Deserialization(_)));
    }

    #[test]
    fn commands_default_to_indexed_arrays() {
        let cmd: Command<ApiResponse<StaticList>> = Command::new(&GET_LIST, Params::new());
        assert_eq!(cmd.array_encoding(), ArrayEncoding::Indexed);
        assert_eq!(cmd.flatten_arrays().array_encoding(), ArrayEncoding::Repeated);
    }
}
