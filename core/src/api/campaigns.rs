//! Smart campaigns: listing, scheduling and requesting runs for leads.
//!
//! `schedule_campaign` sends `runAt` as ISO-8601 with an offset. Token
//! overrides go in `input.tokens` for both runs and schedules.

use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};

use super::{ids, iso8601};
use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::error::MarketoError;
use crate::operation;
use crate::types::{ApiResponse, Campaign, CampaignToken, Record};

impl MarketoClient {
    pub fn get_campaign(&self, id: i64, options: Params) -> Command<ApiResponse<Campaign>> {
        let mut params = options;
        params.insert("id".into(), id.into());
        Command::new(&operation::GET_CAMPAIGN, params)
    }

    /// All campaigns, or only those in `campaign_ids` when non-empty.
    pub fn get_campaigns(&self, campaign_ids: &[i64], options: Params) -> Command<ApiResponse<Campaign>> {
        let mut params = options;
        if campaign_ids.is_empty() {
            return Command::new(&operation::GET_CAMPAIGNS, params);
        }
        params.insert("id".into(), ids(campaign_ids));
        Command::new(&operation::GET_CAMPAIGNS, params).flatten_arrays()
    }

    /// Trigger a campaign for the given leads, optionally overriding
    /// program tokens.
    pub fn request_campaign(
        &self,
        id: i64,
        lead_ids: &[i64],
        tokens: &[CampaignToken],
        options: Params,
    ) -> Result<Command<ApiResponse<Record>>, MarketoError> {
        let mut input = Params::new();
        let leads: Vec<Value> = lead_ids.iter().map(|id| json!({ "id": id })).collect();
        input.insert("leads".into(), Value::Array(leads));
        if !tokens.is_empty() {
            input.insert("tokens".into(), tokens_value(tokens)?);
        }

        let mut params = options;
        params.insert("id".into(), id.into());
        params.insert("input".into(), Value::Object(input));
        Ok(Command::new(&operation::REQUEST_CAMPAIGN, params))
    }

    /// Schedule a batch campaign. Without `run_at` Marketo runs it in five
    /// minutes; without `run_at` and `tokens` no `input` is sent at all.
    pub fn schedule_campaign(
        &self,
        id: i64,
        run_at: Option<DateTime<FixedOffset>>,
        tokens: &[CampaignToken],
        options: Params,
    ) -> Result<Command<ApiResponse<Record>>, MarketoError> {
        let mut input = Params::new();
        if let Some(run_at) = run_at {
            input.insert("runAt".into(), iso8601(&run_at).into());
        }
        if !tokens.is_empty() {
            input.insert("tokens".into(), tokens_value(tokens)?);
        }

        let mut params = options;
        params.insert("id".into(), id.into());
        if !input.is_empty() {
            params.insert("input".into(), Value::Object(input));
        }
        Ok(Command::new(&operation::SCHEDULE_CAMPAIGN, params))
    }
}

fn tokens_value(tokens: &[CampaignToken]) -> Result<Value, MarketoError> {
    serde_json::to_value(tokens).map_err(|e| MarketoError::Serialization(e.to_string()))
}
