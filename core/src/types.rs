//! Response types for the Marketo REST API.
//!
//! # Design
//! Every REST response shares one envelope (`ApiResponse<T>`); only the
//! record type inside `result` varies. Records with a stable schema get a
//! struct, open-ended ones (leads, describe output, activities) stay as a
//! JSON object (`Record`) because their fields depend on the instance's
//! custom field configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object with instance-defined fields (a lead, a company, ...).
pub type Record = Map<String, Value>;

/// The `{requestId, success, result, errors, ...}` envelope returned by
/// every REST endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
    #[serde(default)]
    pub errors: Vec<RemoteError>,
    #[serde(default)]
    pub warnings: Vec<Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub more_result: Option<bool>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn first(&self) -> Option<&T> {
        self.result.first()
    }

    pub fn into_result(self) -> Vec<T> {
        self.result
    }

    pub fn has_more(&self) -> bool {
        self.more_result.unwrap_or(false)
    }
}

/// An error or skip reason reported by Marketo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteError {
    pub code: String,
    pub message: String,
}

/// Per-record outcome of a sync, list-membership, push or activity call.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatus {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub seq: Option<i64>,
    #[serde(default, rename = "marketoGUID")]
    pub marketo_guid: Option<String>,
    pub status: String,
    #[serde(default)]
    pub reasons: Vec<RemoteError>,
}

/// Response to every sync-style call.
pub type SyncResponse = ApiResponse<RecordStatus>;

impl SyncResponse {
    /// Status of the record with `id`, or of the first record when `id` is
    /// `None`. Always `None` for an unsuccessful call.
    pub fn status_of(&self, id: Option<i64>) -> Option<&str> {
        if !self.success {
            return None;
        }
        let record = match id {
            None => self.result.first(),
            Some(id) => self.result.iter().find(|r| r.id == Some(id)),
        };
        record.map(|r| r.status.as_str())
    }

    /// Whether `isMemberOfList` reported the lead as a member.
    pub fn is_member(&self, id: i64) -> bool {
        self.status_of(Some(id)) == Some("memberof")
    }
}

/// A static list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticList {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A smart campaign.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub campaign_type: Option<String>,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LeadPartition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// State of a bulk extract job.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    pub export_id: String,
    pub status: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub queued_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub number_of_records: Option<i64>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub file_checksum: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
}

impl ExportJob {
    pub fn is_completed(&self) -> bool {
        self.status == "Completed"
    }
}

/// State of a bulk lead import batch.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub batch_id: i64,
    pub status: String,
    #[serde(default)]
    pub import_id: Option<String>,
    #[serde(default)]
    pub num_of_leads_processed: Option<i64>,
    #[serde(default)]
    pub num_of_rows_failed: Option<i64>,
    #[serde(default)]
    pub num_of_rows_with_warning: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub program_type: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub applicable_program_type: Option<String>,
    #[serde(default)]
    pub progression_statuses: Vec<Record>,
}

/// A token override passed to `requestCampaign` / `scheduleCampaign`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignToken {
    pub name: String,
    pub value: String,
}

impl CampaignToken {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Client-credentials token issued by the identity endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}
