//! Synchronous client core for the Marketo REST API.
//!
//! # Overview
//! `MarketoClient` turns each API operation into a `Command`: the operation
//! descriptor plus its ordered parameters. `MarketoClient::prepare` renders a
//! command into an `HttpRequest` and `Command::parse` decodes the matching
//! `HttpResponse`, so the core is deterministic and testable without a
//! network. `Session` pairs a client with a `Transport` and manages the
//! access token when you do want the round trip done for you.
//!
//! # Design
//! - Operations are data (`operation.rs`): method, endpoint family, path
//!   template and body encoding. Adding an endpoint means adding a row.
//! - `MarketoClient` is immutable after construction and can be shared
//!   across threads.
//! - Response envelopes are typed (`ApiResponse<T>`); records without a
//!   fixed schema (leads, custom objects) stay as JSON maps.
//! - Marketo reports most failures with HTTP 200 and `success: false`.
//!   Those are returned as data; only non-2xx statuses become errors.

pub mod api;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod http;
pub mod object;
pub mod operation;
pub mod session;
pub mod transport;
pub mod types;

pub use client::MarketoClient;
pub use command::{Attachment, Command, Params};
pub use config::ClientConfig;
pub use error::MarketoError;
pub use http::{ArrayEncoding, HttpMethod, HttpRequest, HttpResponse};
pub use object::{MarketoObject, SyncAction};
pub use session::Session;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    AccessToken, ApiResponse, Campaign, CampaignToken, Channel, ExportJob, ImportBatch, LeadPartition, Program,
    Record, RecordStatus, RemoteError, StaticList, SyncResponse,
};
