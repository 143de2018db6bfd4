//! Programs, channels, and pushing leads into a program.

use serde_json::Value;

use super::is_blank;
use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::error::MarketoError;
use crate::operation;
use crate::types::{ApiResponse, Channel, Program, Record, SyncResponse};

const DEFAULT_MAX_RETURN: i64 = 200;

/// `{maxReturn: 200, offset: 0}` with `options` merged over it.
fn paged(options: Params) -> Params {
    let mut params = Params::new();
    params.insert("maxReturn".into(), DEFAULT_MAX_RETURN.into());
    params.insert("offset".into(), 0.into());
    params.extend(options);
    params
}

impl MarketoClient {
    /// Programs, optionally filtered. `filterType` and `filterValues` must be
    /// given together; `earliestUpdatedAt` / `latestUpdatedAt` pass through.
    pub fn get_programs(&self, options: Params) -> Result<Command<ApiResponse<Program>>, MarketoError> {
        let params = paged(options);
        if is_blank(params.get("filterType")) != is_blank(params.get("filterValues")) {
            return Err(MarketoError::invalid(
                "\"filterType\" and \"filterValues\" must be given together",
            ));
        }
        Ok(Command::new(&operation::GET_PROGRAMS, params))
    }

    pub fn get_channels(&self, options: Params) -> Command<ApiResponse<Channel>> {
        Command::new(&operation::GET_CHANNELS, paged(options))
    }

    /// Push leads into Marketo, deduped on `email` unless `options` sets
    /// `lookupField`. `programName`, `programStatus`, `partitionName`,
    /// `reason` and `source` pass through.
    pub fn push_leads(&self, leads: Vec<Record>, options: Params) -> Result<Command<SyncResponse>, MarketoError> {
        if leads.is_empty() {
            return Err(MarketoError::invalid("leads cannot be empty"));
        }
        let mut params = Params::new();
        params.insert("input".into(), records(leads));
        params.insert("lookupField".into(), "email".into());
        params.extend(options);
        Ok(Command::new(&operation::PUSH_LEADS, params))
    }

    /// Move leads (`[{id}]` records) to `status` within a program.
    pub fn update_program_status(
        &self,
        leads: Vec<Record>,
        program_id: i64,
        status: &str,
        options: Params,
    ) -> Result<Command<SyncResponse>, MarketoError> {
        if leads.is_empty() {
            return Err(MarketoError::invalid("leads cannot be empty"));
        }
        if program_id <= 0 {
            return Err(MarketoError::invalid("program id cannot be empty"));
        }
        if status.trim().is_empty() {
            return Err(MarketoError::invalid("program status cannot be empty"));
        }
        let mut params = Params::new();
        params.insert("input".into(), records(leads));
        params.insert("programId".into(), program_id.into());
        params.insert("lookupField".into(), "id".into());
        params.insert("status".into(), status.into());
        params.extend(options);
        Ok(Command::new(&operation::UPDATE_PROGRAM_STATUS, params))
    }
}

fn records(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;

    fn client() -> MarketoClient {
        MarketoClient::new(ClientConfig::new("id", "secret").with_url("https://test.mktorest.com")).unwrap()
    }

    fn params(value: Value) -> Params {
        let Value::Object(params) = value else { unreachable!() };
        params
    }

    fn lead(id: i64) -> Record {
        params(json!({ "id": id }))
    }

    #[test]
    fn get_programs_defaults() {
        let c = client();
        let cmd = c.get_programs(Params::new()).unwrap();
        let req = c.prepare(&cmd, None).unwrap();
        assert_eq!(
            req.url,
            "https://test.mktorest.com/rest/asset/v1/programs.json?maxReturn=200&offset=0"
        );
    }

    #[test]
    fn get_programs_needs_filter_type_and_values_together() {
        let c = client();
        let err = c.get_programs(params(json!({"filterType": "id"}))).unwrap_err();
        assert!(matches!(err, MarketoError::InvalidArgument(_)));
        let err = c.get_programs(params(json!({"filterValues": "1,2"}))).unwrap_err();
        assert!(matches!(err, MarketoError::InvalidArgument(_)));
        let err = c.get_programs(params(json!({"filterType": "id", "filterValues": ""}))).unwrap_err();
        assert!(matches!(err, MarketoError::InvalidArgument(_)));
    }

    #[test]
    fn get_programs_merges_options_over_defaults() {
        let cmd = client()
            .get_programs(params(json!({"filterType": "id", "filterValues": "1001,1002", "maxReturn": 50})))
            .unwrap();
        assert_eq!(
            cmd.params(),
            &params(json!({"maxReturn": 50, "offset": 0, "filterType": "id", "filterValues": "1001,1002"}))
        );
    }

    #[test]
    fn get_channels_defaults() {
        let cmd = client().get_channels(params(json!({"offset": 200})));
        assert_eq!(cmd.param("maxReturn"), Some(&json!(200)));
        assert_eq!(cmd.param("offset"), Some(&json!(200)));
    }

    #[test]
    fn push_leads_defaults_lookup_field() {
        let c = client();
        let cmd = c
            .push_leads(vec![params(json!({"email": "a@b.com"}))], params(json!({"programName": "Webinar"})))
            .unwrap();
        assert_eq!(cmd.param("lookupField"), Some(&json!("email")));
        assert_eq!(cmd.param("programName"), Some(&json!("Webinar")));
        let req = c.prepare(&cmd, None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/v1/leads/push.json");
    }

    #[test]
    fn push_leads_lookup_field_can_be_overridden() {
        let cmd = client().push_leads(vec![lead(1)], params(json!({"lookupField": "id"}))).unwrap();
        assert_eq!(cmd.param("lookupField"), Some(&json!("id")));
    }

    #[test]
    fn push_leads_rejects_empty_input() {
        let err = client().push_leads(vec![], Params::new()).unwrap_err();
        assert!(matches!(err, MarketoError::InvalidArgument(_)));
    }

    #[test]
    fn update_program_status_validation() {
        let c = client();
        assert!(c.update_program_status(vec![], 1, "Registered", Params::new()).is_err());
        assert!(c.update_program_status(vec![lead(1)], 0, "Registered", Params::new()).is_err());
        assert!(c.update_program_status(vec![lead(1)], 1, "", Params::new()).is_err());
    }

    #[test]
    fn update_program_status_request() {
        let c = client();
        let cmd = c
            .update_program_status(vec![lead(1), lead(2)], 1044, "Webinar.Registered", Params::new())
            .unwrap();
        let req = c.prepare(&cmd, None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/v1/leads/programs/1044/status.json");
        let body: Value = serde_json::from_str(req.body_str().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"input": [{"id": 1}, {"id": 2}], "lookupField": "id", "status": "Webinar.Registered"})
        );
    }
}
