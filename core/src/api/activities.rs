//! Custom activities and the paged activity and lead-change feeds.
//!
//! Feeds are read with a `nextPageToken`; get the first one from
//! `get_paging_token` with a start datetime. Custom activities are checked
//! locally, and a missing `activityDate` defaults to now.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use super::{iso8601, join, parse_datetime};
use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::error::MarketoError;
use crate::operation;
use crate::types::{ApiResponse, Record, SyncResponse};

const REQUIRED_ACTIVITY_FIELDS: [&str; 3] = ["leadId", "activityTypeId", "primaryAttributeValue"];
const REQUIRED_ATTRIBUTE_FIELDS: [&str; 2] = ["name", "value"];

impl MarketoClient {
    /// Log custom activities.
    ///
    /// Each activity needs `leadId`, `activityTypeId` and
    /// `primaryAttributeValue`. `activityDate` defaults to now and otherwise
    /// must be an RFC 3339 timestamp. `attributes`, when present, must be an
    /// array of `{name, value, apiName?}` objects. Every activity is checked
    /// before the command is built.
    pub fn add_custom_activities(
        &self,
        activities: Vec<Record>,
        options: Params,
    ) -> Result<Command<SyncResponse>, MarketoError> {
        let input = activities
            .iter()
            .map(|activity| activity_input(activity).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;

        let mut params = options;
        params.insert("input".into(), Value::Array(input));
        Ok(Command::new(&operation::ADD_CUSTOM_ACTIVITIES, params))
    }

    /// Paging token for activity and lead-change reads starting at `since`.
    pub fn get_paging_token(&self, since: DateTime<FixedOffset>, options: Params) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("sinceDatetime".into(), iso8601(&since).into());
        Command::new(&operation::GET_PAGING_TOKEN, params)
    }

    pub fn get_lead_changes(
        &self,
        next_page_token: &str,
        fields: &[&str],
        options: Params,
    ) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("nextPageToken".into(), next_page_token.into());
        params.insert("fields".into(), join(fields).into());
        Command::new(&operation::GET_LEAD_CHANGES, params).flatten_arrays()
    }

    pub fn get_lead_activity(
        &self,
        next_page_token: &str,
        lead_ids: &[i64],
        activity_type_ids: &[i64],
        options: Params,
    ) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("nextPageToken".into(), next_page_token.into());
        params.insert("leadIds".into(), join(lead_ids).into());
        params.insert("activityTypeIds".into(), join(activity_type_ids).into());
        Command::new(&operation::GET_LEAD_ACTIVITY, params).flatten_arrays()
    }
}

fn activity_input(activity: &Record) -> Result<Record, MarketoError> {
    for field in REQUIRED_ACTIVITY_FIELDS {
        present(activity, field)
            .ok_or_else(|| MarketoError::invalid(format!("required parameter \"{field}\" is missing")))?;
    }

    let activity_date = match present(activity, "activityDate") {
        None => iso8601(&Utc::now()),
        Some(Value::String(s)) => parse_datetime(s)
            .map(|at| iso8601(&at))
            .ok_or_else(invalid_activity_date)?,
        Some(_) => return Err(invalid_activity_date()),
    };

    let mut input = Record::new();
    input.insert("leadId".into(), integer(activity, "leadId")?.into());
    input.insert("activityTypeId".into(), integer(activity, "activityTypeId")?.into());
    input.insert("primaryAttributeValue".into(), text(activity, "primaryAttributeValue")?.into());
    input.insert("activityDate".into(), activity_date.into());
    for optional in ["apiName", "status"] {
        if present(activity, optional).is_some() {
            input.insert(optional.into(), text(activity, optional)?.into());
        }
    }

    if let Some(attributes) = present(activity, "attributes") {
        let Value::Array(attributes) = attributes else {
            return Err(MarketoError::invalid("optional parameter \"attributes\" must be an array"));
        };
        let attributes = attributes
            .iter()
            .map(attribute_input)
            .collect::<Result<Vec<_>, _>>()?;
        input.insert("attributes".into(), Value::Array(attributes));
    }
    Ok(input)
}

fn attribute_input(attribute: &Value) -> Result<Value, MarketoError> {
    let Value::Object(attribute) = attribute else {
        return Err(MarketoError::invalid("the \"attributes\" parameter must contain objects"));
    };
    for field in REQUIRED_ATTRIBUTE_FIELDS {
        present(attribute, field).ok_or_else(|| {
            MarketoError::invalid(format!(
                "required key \"{field}\" is missing in the \"attributes\" parameter"
            ))
        })?;
    }

    let mut input = Record::new();
    input.insert("name".into(), text(attribute, "name")?.into());
    input.insert("value".into(), text(attribute, "value")?.into());
    if present(attribute, "apiName").is_some() {
        input.insert("apiName".into(), text(attribute, "apiName")?.into());
    }
    Ok(Value::Object(input))
}

fn invalid_activity_date() -> MarketoError {
    MarketoError::invalid("parameter \"activityDate\" must be a date/time value")
}

/// The value of `key`, treating explicit nulls as absent.
fn present<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key).filter(|v| !v.is_null())
}

fn integer(record: &Record, key: &str) -> Result<i64, MarketoError> {
    let parsed = match present(record, key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| MarketoError::invalid(format!("parameter \"{key}\" must be an integer")))
}

fn text(record: &Record, key: &str) -> Result<String, MarketoError> {
    match present(record, key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(MarketoError::invalid(format!("parameter \"{key}\" must be a string"))),
    }
}
