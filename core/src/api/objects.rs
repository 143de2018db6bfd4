//! Companies, opportunities, opportunity roles and sales persons, plus `describe`.

use serde_json::Value;

use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::error::MarketoError;
use crate::object::{MarketoObject, SyncAction};
use crate::operation;
use crate::types::{ApiResponse, Record, SyncResponse};

const DEFAULT_DEDUPE_BY: &str = "dedupeFields";

impl MarketoClient {
    /// Sync records of the object with logical name `object` ("Companies",
    /// "Opportunities", ...). Unknown names fail before anything is built.
    /// `dedupe_by` defaults to `dedupeFields`.
    pub fn sync_objects(
        &self,
        object: &str,
        action: SyncAction,
        records: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Result<Command<SyncResponse>, MarketoError> {
        let object: MarketoObject = object.parse()?;
        Ok(self.sync(object, action, records, dedupe_by, options))
    }

    pub fn create_companies(&self, companies: Vec<Record>, dedupe_by: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync(MarketoObject::Companies, SyncAction::CreateOnly, companies, dedupe_by, options)
    }

    pub fn update_companies(&self, companies: Vec<Record>, dedupe_by: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync(MarketoObject::Companies, SyncAction::UpdateOnly, companies, dedupe_by, options)
    }

    pub fn create_or_update_companies(
        &self,
        companies: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync(MarketoObject::Companies, SyncAction::CreateOrUpdate, companies, dedupe_by, options)
    }

    pub fn create_opportunities(
        &self,
        opportunities: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync(MarketoObject::Opportunities, SyncAction::CreateOnly, opportunities, dedupe_by, options)
    }

    pub fn update_opportunities(
        &self,
        opportunities: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync(MarketoObject::Opportunities, SyncAction::UpdateOnly, opportunities, dedupe_by, options)
    }

    pub fn create_or_update_opportunities(
        &self,
        opportunities: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync(MarketoObject::Opportunities, SyncAction::CreateOrUpdate, opportunities, dedupe_by, options)
    }

    pub fn create_opportunity_roles(&self, roles: Vec<Record>, dedupe_by: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync(MarketoObject::OpportunityRoles, SyncAction::CreateOnly, roles, dedupe_by, options)
    }

    pub fn update_opportunity_roles(&self, roles: Vec<Record>, dedupe_by: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync(MarketoObject::OpportunityRoles, SyncAction::UpdateOnly, roles, dedupe_by, options)
    }

    pub fn create_or_update_opportunity_roles(
        &self,
        roles: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync(MarketoObject::OpportunityRoles, SyncAction::CreateOrUpdate, roles, dedupe_by, options)
    }

    pub fn create_sales_persons(&self, people: Vec<Record>, dedupe_by: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync(MarketoObject::SalesPersons, SyncAction::CreateOnly, people, dedupe_by, options)
    }

    pub fn update_sales_persons(&self, people: Vec<Record>, dedupe_by: Option<&str>, options: Params) -> Command<SyncResponse> {
        self.sync(MarketoObject::SalesPersons, SyncAction::UpdateOnly, people, dedupe_by, options)
    }

    pub fn create_or_update_sales_persons(
        &self,
        people: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        self.sync(MarketoObject::SalesPersons, SyncAction::CreateOrUpdate, people, dedupe_by, options)
    }

    /// Field metadata for the object with logical name `object`.
    pub fn describe_object(&self, object: &str) -> Result<Command<ApiResponse<Record>>, MarketoError> {
        let object: MarketoObject = object.parse()?;
        Ok(self.describe(object))
    }

    pub fn describe_leads(&self) -> Command<ApiResponse<Record>> {
        self.describe(MarketoObject::Leads)
    }

    pub fn describe_companies(&self) -> Command<ApiResponse<Record>> {
        self.describe(MarketoObject::Companies)
    }

    pub fn describe_opportunities(&self) -> Command<ApiResponse<Record>> {
        self.describe(MarketoObject::Opportunities)
    }

    pub fn describe_opportunity_roles(&self) -> Command<ApiResponse<Record>> {
        self.describe(MarketoObject::OpportunityRoles)
    }

    pub fn describe_sales_persons(&self) -> Command<ApiResponse<Record>> {
        self.describe(MarketoObject::SalesPersons)
    }

    fn sync(
        &self,
        object: MarketoObject,
        action: SyncAction,
        records: Vec<Record>,
        dedupe_by: Option<&str>,
        options: Params,
    ) -> Command<SyncResponse> {
        let mut params = options;
        params.insert("objectName".into(), object.path_segment().into());
        params.insert("action".into(), action.as_str().into());
        params.insert("input".into(), Value::Array(records.into_iter().map(Value::Object).collect()));
        params.insert("dedupeBy".into(), dedupe_by.unwrap_or(DEFAULT_DEDUPE_BY).into());
        Command::new(&operation::CREATE_OR_UPDATE_OBJECT, params)
    }

    fn describe(&self, object: MarketoObject) -> Command<ApiResponse<Record>> {
        let mut params = Params::new();
        params.insert("objectName".into(), object.path_segment().into());
        Command::new(&operation::DESCRIBE_OBJECT, params)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::MarketoClient;
    use crate::command::Params;
    use crate::config::ClientConfig;
    use crate::error::MarketoError;
    use crate::http::HttpMethod;
    use crate::object::{MarketoObject, SyncAction};
    use crate::types::Record;
    use serde_json::{json, Value};

    fn client() -> MarketoClient {
        MarketoClient::new(ClientConfig::new("id", "secret").with_url("https://test.mktorest.com")).unwrap()
    }

    fn company(name: &str) -> Record {
        let Value::Object(record) = json!({"externalCompanyId": name, "company": name}) else { unreachable!() };
        record
    }

    #[test]
    fn unknown_object_fails_sync_and_describe() {
        for name in ["Contacts", "leads", ""] {
            let err = client()
                .sync_objects(name, SyncAction::CreateOnly, vec![], None, Params::new())
                .unwrap_err();
            assert!(matches!(err, MarketoError::InvalidArgument(_)), "{name}");
            let err = client().describe_object(name).unwrap_err();
            assert!(matches!(err, MarketoError::InvalidArgument(_)), "{name}");
        }
    }

    #[test]
    fn every_registered_object_can_be_described() {
        let c = client();
        for object in MarketoObject::ALL {
            let req = c.prepare(&c.describe_object(object.name()).unwrap(), None).unwrap();
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(
                req.url,
                format!("https://test.mktorest.com/rest/v1/{}/describe.json", object.path_segment())
            );
        }
    }

    #[test]
    fn sync_objects_defaults_dedupe_by() {
        let cmd = client()
            .sync_objects("Companies", SyncAction::CreateOrUpdate, vec![company("Acme")], None, Params::new())
            .unwrap();
        assert_eq!(cmd.param("objectName"), Some(&json!("companies")));
        assert_eq!(cmd.param("action"), Some(&json!("createOrUpdate")));
        assert_eq!(cmd.param("dedupeBy"), Some(&json!("dedupeFields")));
    }

    #[test]
    fn opportunity_roles_post_to_nested_path() {
        let c = client();
        let cmd = c.update_opportunity_roles(vec![], Some("idField"), Params::new());
        let req = c.prepare(&cmd, None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/v1/opportunities/roles.json");
        let body: Value = serde_json::from_str(req.body_str().unwrap()).unwrap();
        assert_eq!(body, json!({"action": "updateOnly", "input": [], "dedupeBy": "idField"}));
    }

    #[test]
    fn typed_helpers_pick_object_and_action() {
        let c = client();
        let cases = [
            (c.create_companies(vec![], None, Params::new()), "companies", "createOnly"),
            (c.update_opportunities(vec![], None, Params::new()), "opportunities", "updateOnly"),
            (c.create_or_update_sales_persons(vec![], None, Params::new()), "salespersons", "createOrUpdate"),
        ];
        for (cmd, object, action) in cases {
            assert_eq!(cmd.param("objectName"), Some(&json!(object)));
            assert_eq!(cmd.param("action"), Some(&json!(action)));
        }
    }
}
