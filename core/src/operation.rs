//! Static descriptions of every remote operation.
//!
//! # Design
//! Each operation is data: verb, endpoint family, path template and where
//! its parameters go. `MarketoClient::prepare` interprets these descriptors,
//! so adding an endpoint never means adding request-building code.
//!
//! Path templates use `{name}` placeholders filled from (and removed from)
//! the command's parameters. Values are percent-encoded as one path
//! segment; `{+name}` inserts the value as-is and is reserved for values the
//! client itself produces, such as registry path segments. Whatever is left goes to the query string for
//! body-less operations, or to the body otherwise; names listed in `query`
//! always go to the query string.

use crate::http::HttpMethod;

/// Which base URL an operation's path is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// `/rest/v{n}`, or `/bulk/v{n}` on a bulk-configured client.
    Base,
    /// `/rest/asset/v1`
    Asset,
    /// `/identity`
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Json,
    Multipart,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    pub family: Family,
    pub path: &'static str,
    pub query: &'static [&'static str],
    pub body: BodyKind,
}

macro_rules! operation {
    ($ident:ident, $name:literal, $method:ident, $family:ident, $path:literal) => {
        operation!($ident, $name, $method, $family, $path, [], None);
    };
    ($ident:ident, $name:literal, $method:ident, $family:ident, $path:literal, $body:ident) => {
        operation!($ident, $name, $method, $family, $path, [], $body);
    };
    ($ident:ident, $name:literal, $method:ident, $family:ident, $path:literal, [$($q:literal),*], $body:ident) => {
        pub static $ident: Operation = Operation {
            name: $name,
            method: HttpMethod::$method,
            family: Family::$family,
            path: $path,
            query: &[$($q),*],
            body: BodyKind::$body,
        };
    };
}

// Authentication
operation!(GET_ACCESS_TOKEN, "getAccessToken", Get, Identity, "oauth/token");

// Lead database
operation!(CREATE_OR_UPDATE_LEADS, "createOrUpdateLeads", Post, Base, "leads.json", Json);
operation!(CREATE_OR_UPDATE_OBJECT, "createOrUpdateObject", Post, Base, "{+objectName}.json", Json);
operation!(DESCRIBE_OBJECT, "describeObject", Get, Base, "{+objectName}/describe.json");
operation!(GET_LEAD, "getLead", Get, Base, "lead/{id}.json");
operation!(GET_LEADS_BY_FILTER_TYPE, "getLeadsByFilterType", Get, Base, "leads.json");
operation!(GET_LEAD_BY_FILTER_TYPE, "getLeadByFilterType", Get, Base, "leads.json");
operation!(GET_LEAD_PARTITIONS, "getLeadPartitions", Get, Base, "leads/partitions.json");
operation!(GET_LEADS_BY_LIST, "getLeadsByList", Get, Base, "list/{listId}/leads.json");
operation!(DELETE_LEAD, "deleteLead", Delete, Base, "leads.json");
operation!(ASSOCIATE_LEAD, "associateLead", Post, Base, "leads/{id}/associate.json", ["cookie"], Json);
operation!(PUSH_LEADS, "pushLeads", Post, Base, "leads/push.json", Json);
operation!(UPDATE_PROGRAM_STATUS, "updateProgramStatus", Post, Base, "leads/programs/{programId}/status.json", Json);

// Static lists
operation!(GET_LISTS, "getLists", Get, Base, "lists.json");
operation!(GET_LIST, "getList", Get, Base, "lists/{id}.json");
operation!(IS_MEMBER_OF_LIST, "isMemberOfList", Get, Base, "lists/{listId}/leads/ismember.json");
operation!(ADD_LEADS_TO_LIST, "addLeadsToList", Post, Base, "lists/{listId}/leads.json", ["id"], Json);
operation!(REMOVE_LEADS_FROM_LIST, "removeLeadsFromList", Delete, Base, "lists/{listId}/leads.json");

// Campaigns
operation!(GET_CAMPAIGN, "getCampaign", Get, Base, "campaigns/{id}.json");
operation!(GET_CAMPAIGNS, "getCampaigns", Get, Base, "campaigns.json");
operation!(REQUEST_CAMPAIGN, "requestCampaign", Post, Base, "campaigns/{id}/trigger.json", Json);
operation!(SCHEDULE_CAMPAIGN, "scheduleCampaign", Post, Base, "campaigns/{id}/schedule.json", Json);

// Activities
operation!(GET_PAGING_TOKEN, "getPagingToken", Get, Base, "activities/pagingtoken.json");
operation!(GET_LEAD_CHANGES, "getLeadChanges", Get, Base, "activities/leadchanges.json");
operation!(GET_LEAD_ACTIVITY, "getLeadActivity", Get, Base, "activities.json");
operation!(ADD_CUSTOM_ACTIVITIES, "addCustomActivities", Post, Base, "activities/external.json", Json);

// Bulk import
operation!(IMPORT_LEADS_CSV, "importLeadsCsv", Post, Base, "leads.json", Multipart);
operation!(GET_BULK_UPLOAD_STATUS, "getBulkUploadStatus", Get, Base, "leads/batch/{batchId}.json");
operation!(GET_BULK_UPLOAD_FAILURES, "getBulkUploadFailures", Get, Base, "leads/batch/{batchId}/failures.json");
operation!(GET_BULK_UPLOAD_WARNINGS, "getBulkUploadWarnings", Get, Base, "leads/batch/{batchId}/warnings.json");

// Bulk extract
operation!(CREATE_BULK_LEAD_EXTRACT_JOB, "createBulkLeadExtractJob", Post, Base, "leads/export/create.json", Json);
operation!(ENQUEUE_BULK_LEAD_EXTRACT_JOB, "enqueueBulkLeadExtractJob", Post, Base, "leads/export/{exportId}/enqueue.json", Json);
operation!(GET_BULK_LEAD_EXTRACT_JOB_STATUS, "getBulkLeadExtractJobStatus", Get, Base, "leads/export/{exportId}/status.json");
operation!(GET_BULK_LEAD_EXTRACT_JOB_RESULTS, "getBulkLeadExtractJobResults", Get, Base, "leads/export/{exportId}/file.json");
operation!(CREATE_BULK_ACTIVITIES_EXTRACT_JOB, "createBulkActivitiesExtractJob", Post, Base, "activities/export/create.json", Json);
operation!(ENQUEUE_BULK_ACTIVITIES_EXTRACT_JOB, "enqueueBulkActivitiesExtractJob", Post, Base, "activities/export/{exportId}/enqueue.json", Json);
operation!(GET_BULK_ACTIVITIES_EXTRACT_JOB_STATUS, "getBulkActivitiesExtractJobStatus", Get, Base, "activities/export/{exportId}/status.json");
operation!(GET_BULK_ACTIVITIES_EXTRACT_JOB_RESULTS, "getBulkActivitiesExtractJobResults", Get, Base, "activities/export/{exportId}/file.json");

// Assets
operation!(GET_PROGRAMS, "getPrograms", Get, Asset, "programs.json");
operation!(GET_CHANNELS, "getChannels", Get, Asset, "channels.json");
operation!(UPDATE_EMAIL_CONTENT, "updateEmailContent", Post, Asset, "email/{id}/content.json", Json);
operation!(UPDATE_EMAIL_CONTENT_IN_EDITABLE_SECTION, "updateEmailContentInEditableSection", Post, Asset, "email/{id}/content/{htmlId}.json", Json);
operation!(APPROVE_EMAIL, "approveEmailbyId", Post, Asset, "email/{id}/approveDraft.json", Json);

impl Operation {
    /// Placeholder names in the path template, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        let path: &'static str = self.path;
        path.split('{')
            .skip(1)
            .filter_map(|rest| rest.split_once('}').map(|(name, _)| name.trim_start_matches('+')))
    }

    /// Whether `name` is written `{+name}` and so substituted unencoded.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.path.contains(&format!("{{+{name}}}"))
    }

    pub fn is_query_param(&self, name: &str) -> bool {
        self.body == BodyKind::None || self.query.contains(&name)
    }
}
