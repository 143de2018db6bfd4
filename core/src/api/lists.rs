//! Static lists and their membership.

use super::ids;
use crate::client::MarketoClient;
use crate::command::{Command, Params};
use crate::operation;
use crate::types::{ApiResponse, StaticList, SyncResponse};

// Marketo reads collections as `id=1&id=2`, so every command here whose `id`
// parameter is a collection asks for repeated-key encoding.
impl MarketoClient {
    /// All static lists, or only those in `list_ids` when non-empty.
    pub fn get_lists(&self, list_ids: &[i64], options: Params) -> Command<ApiResponse<StaticList>> {
        let mut params = options;
        if list_ids.is_empty() {
            return Command::new(&operation::GET_LISTS, params);
        }
        params.insert("id".into(), ids(list_ids));
        Command::new(&operation::GET_LISTS, params).flatten_arrays()
    }

    pub fn get_list(&self, id: i64, options: Params) -> Command<ApiResponse<StaticList>> {
        let mut params = options;
        params.insert("id".into(), id.into());
        Command::new(&operation::GET_LIST, params)
    }

    pub fn is_member_of_list(&self, list_id: i64, lead_ids: &[i64], options: Params) -> Command<SyncResponse> {
        self.membership(&operation::IS_MEMBER_OF_LIST, list_id, lead_ids, options)
    }

    pub fn add_leads_to_list(&self, list_id: i64, lead_ids: &[i64], options: Params) -> Command<SyncResponse> {
        self.membership(&operation::ADD_LEADS_TO_LIST, list_id, lead_ids, options)
    }

    pub fn remove_leads_from_list(&self, list_id: i64, lead_ids: &[i64], options: Params) -> Command<SyncResponse> {
        self.membership(&operation::REMOVE_LEADS_FROM_LIST, list_id, lead_ids, options)
    }

    fn membership(
        &self,
        op: &'static operation::Operation,
        list_id: i64,
        lead_ids: &[i64],
        options: Params,
    ) -> Command<SyncResponse> {
        let mut params = options;
        params.insert("listId".into(), list_id.into());
        params.insert("id".into(), ids(lead_ids));
        Command::new(op, params).flatten_arrays()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::MarketoClient;
    use crate::command::Params;
    use crate::config::ClientConfig;
    use crate::http::{ArrayEncoding, HttpMethod};

    fn client() -> MarketoClient {
        MarketoClient::new(ClientConfig::new("id", "secret").with_url("https://test.mktorest.com")).unwrap()
    }

    #[test]
    fn is_member_of_list_repeats_id_keys() {
        let c = client();
        let req = c.prepare(&c.is_member_of_list(42, &[1, 2, 3], Params::new()), None).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.query(), Some("id=1&id=2&id=3"));
        assert!(!req.url.contains("%5B"));
        assert_eq!(req.url.matches("id=").count(), 3);
        assert!(req.url.starts_with("https://test.mktorest.com/rest/v1/lists/42/leads/ismember.json?"));
    }

    #[test]
    fn single_member_is_still_a_collection() {
        let c = client();
        let cmd = c.add_leads_to_list(42, &[9], Params::new());
        assert_eq!(cmd.array_encoding(), ArrayEncoding::Repeated);
        let req = c.prepare(&cmd, None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/v1/lists/42/leads.json?id=9");
    }

    #[test]
    fn remove_leads_is_a_delete() {
        let c = client();
        let req = c.prepare(&c.remove_leads_from_list(42, &[1, 2], Params::new()), None).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.query(), Some("id=1&id=2"));
    }

    #[test]
    fn get_lists_with_ids_flattens() {
        let c = client();
        let req = c.prepare(&c.get_lists(&[10, 11], Params::new()), None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/v1/lists.json?id=10&id=11");
    }

    #[test]
    fn get_lists_without_ids_sends_no_id() {
        let c = client();
        let mut options = Params::new();
        options.insert("batchSize".into(), 50.into());
        let cmd = c.get_lists(&[], options);
        assert_eq!(cmd.array_encoding(), ArrayEncoding::Indexed);
        let req = c.prepare(&cmd, None).unwrap();
        assert_eq!(req.query(), Some("batchSize=50"));
    }

    #[test]
    fn get_list_by_id() {
        let c = client();
        let req = c.prepare(&c.get_list(1001, Params::new()), None).unwrap();
        assert_eq!(req.url, "https://test.mktorest.com/rest/v1/lists/1001.json");
    }
}
