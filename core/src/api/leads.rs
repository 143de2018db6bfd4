//! Lead sync, lookup, filtering, deletion and lead-change feeds.

use serde_json::Value;

use super::{ids, join};
use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::object::SyncAction;
use crate::operation;
use crate::types::{ApiResponse, LeadPartition, Record, SyncResponse};

impl MarketoClient {
    pub fn create_leads(&self, leads: Vec<Record>, lookup_field: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync_leads(SyncAction::CreateOnly, leads, lookup_field, options)
    }

    pub fn update_leads(&self, leads: Vec<Record>, lookup_field: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync_leads(SyncAction::UpdateOnly, leads, lookup_field, options)
    }

    pub fn create_or_update_leads(
        &self,
        leads: Vec<Record>,
        lookup_field: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync_leads(SyncAction::CreateOrUpdate, leads, lookup_field, options)
    }

    pub fn create_duplicate_leads(
        &self,
        leads: Vec<Record>,
        lookup_field: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync_leads(SyncAction::CreateDuplicate, leads, lookup_field, options)
    }

    /// `createOrUpdateLeads` with an explicit action. Without a lookup field
    /// Marketo dedupes on `email`.
    pub fn sync_leads(
        &self,
        action: SyncAction,
        leads: Vec<Record>,
        lookup_field: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        let mut params = options;
        params.insert("input".into(), Value::Array(leads.into_iter().map(Value::Object).collect()));
        params.insert("action".into(), action.as_str().into());
        if let Some(field) = lookup_field {
            params.insert("lookupField".into(), field.into());
        }
        Command::new(&operation::CREATE_OR_UPDATE_LEADS, params)
    }

    /// A single lead by id. An empty `fields` returns Marketo's default set.
    pub fn get_lead(&self, id: i64, fields: &[&str], options: Params) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("id".into(), id.into());
        if !fields.is_empty() {
            params.insert("fields".into(), join(fields).into());
        }
        Command::new(&operation::GET_LEAD, params)
    }

    pub fn get_leads_by_filter_type(
        &self,
        filter_type: &str,
        filter_values: &[&str],
        fields: &[&str],
        next_page_token: Option<&str>,
    ) -> Command<ApiResponse<Record>> {
        let mut params = Params::new();
        params.insert("filterType".into(), filter_type.into());
        params.insert("filterValues".into(), join(filter_values).into());
        if let Some(token) = next_page_token.filter(|t| !t.is_empty()) {
            params.insert("nextPageToken".into(), token.into());
        }
        if !fields.is_empty() {
            params.insert("fields".into(), join(fields).into());
        }
        Command::new(&operation::GET_LEADS_BY_FILTER_TYPE, params)
    }

    /// Like `get_leads_by_filter_type` for a single filter value.
    pub fn get_lead_by_filter_type(
        &self,
        filter_type: &str,
        filter_value: &str,
        fields: &[&str],
    ) -> Command<ApiResponse<Record>> {
        let mut params = Params::new();
        params.insert("filterType".into(), filter_type.into());
        params.insert("filterValues".into(), filter_value.into());
        if !fields.is_empty() {
            params.insert("fields".into(), join(fields).into());
        }
        Command::new(&operation::GET_LEAD_BY_FILTER_TYPE, params)
    }

    pub fn get_leads_by_list(&self, list_id: i64, options: Params) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("listId".into(), list_id.into());
        Command::new(&operation::GET_LEADS_BY_LIST, params)
    }

    pub fn get_lead_partitions(&self, options: Params) -> Command<ApiResponse<LeadPartition>> {
        Command::new(&operation::GET_LEAD_PARTITIONS, options)
    }

    pub fn delete_leads(&self, lead_ids: &[i64], options: Params) -> Command<SyncResponse> {
        let mut params = options;
        params.insert("id".into(), ids(lead_ids));
        Command::new(&operation::DELETE_LEAD, params).flatten_arrays()
    }

    /// Associate a known lead with a Munchkin tracking cookie.
    pub fn associate_lead(&self, id: i64, cookie: Option<&str>, options: Params) -> Command<ApiResponse<Record>> {
        let mut params = options;
        params.insert("id".into(), id.into());
        if let Some(cookie) = cookie.filter(|c| !c.is_empty()) {
            params.insert("cookie".into(), cookie.into());
        }
        Command::new(&operation::ASSOCIATE_LEAD, params)
    }
}
