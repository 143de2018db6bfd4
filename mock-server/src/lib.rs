//! In-memory stand-in for the parts of the Marketo REST API the client's
//! integration tests exercise: token issue, lead sync and lookup, static
//! list membership, lead deletion and custom activities.
//!
//! Responses follow Marketo's envelope (`requestId`, `success`, `result`,
//! `errors`). Like Marketo, request-level failures such as a bad token are
//! reported with HTTP 200 and `success: false`.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub type Lead = Map<String, Value>;

const TOKEN_TTL_SECS: i64 = 3599;
const DEFAULT_FIELDS: [&str; 4] = ["email", "firstName", "lastName", "updatedAt"];

#[derive(Debug, Default)]
pub struct Store {
    next_lead_id: i64,
    next_activity_id: i64,
    leads: BTreeMap<i64, Lead>,
    lists: HashMap<i64, BTreeSet<i64>>,
    tokens: HashSet<String>,
}

impl Store {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Json<Value>> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match token {
            None => Err(failure("600", "Access token not specified")),
            Some(token) if !self.tokens.contains(token) => Err(failure("601", "Access token invalid")),
            Some(_) => Ok(()),
        }
    }

    fn find(&self, field: &str, value: &Value) -> Option<i64> {
        let wanted = text(value);
        self.leads
            .iter()
            .find(|(_, lead)| lead.get(field).map(text).as_deref() == Some(wanted.as_str()))
            .map(|(id, _)| *id)
    }

    fn insert(&mut self, mut lead: Lead) -> i64 {
        self.next_lead_id += 1;
        let id = self.next_lead_id;
        lead.insert("id".into(), id.into());
        self.leads.insert(id, lead);
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/identity/oauth/token", get(issue_token))
        .route("/rest/v1/leads.json", get(leads_by_filter).post(sync_leads).delete(delete_leads))
        .route("/rest/v1/lead/{file}", get(lead_by_id))
        .route(
            "/rest/v1/lists/{list_id}/leads.json",
            post(add_to_list).delete(remove_from_list),
        )
        .route("/rest/v1/lists/{list_id}/leads/ismember.json", get(is_member))
        .route("/rest/v1/activities/external.json", post(add_activities))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn request_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}#{}", &id[..4], &id[4..15])
}

fn success(result: Vec<Value>) -> Json<Value> {
    Json(json!({ "requestId": request_id(), "success": true, "result": result }))
}

fn failure(code: &str, message: &str) -> Json<Value> {
    Json(json!({
        "requestId": request_id(),
        "success": false,
        "errors": [{ "code": code, "message": message }],
    }))
}

fn skipped(id: Option<i64>, seq: Option<usize>, code: &str, message: &str) -> Value {
    let mut record = json!({ "status": "skipped", "reasons": [{ "code": code, "message": message }] });
    if let Some(id) = id {
        record["id"] = id.into();
    }
    if let Some(seq) = seq {
        record["seq"] = seq.into();
    }
    record
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every `id` value in a query string, whether repeated or comma-joined.
fn query_ids(query: &[(String, String)]) -> Vec<i64> {
    query
        .iter()
        .filter(|(key, _)| key == "id")
        .flat_map(|(_, value)| value.split(','))
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

async fn issue_token(State(db): State<Db>, Query(input): Query<TokenRequest>) -> (StatusCode, Json<Value>) {
    if input.grant_type != "client_credentials" || input.client_id.is_empty() || input.client_secret.is_empty() {
        let body = json!({ "error": "unauthorized", "error_description": "Bad client credentials" });
        return (StatusCode::UNAUTHORIZED, Json(body));
    }
    let token = format!("{}:ab", Uuid::new_v4());
    db.write().await.tokens.insert(token.clone());
    log::debug!("issued token for client {}", input.client_id);
    let body = json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": TOKEN_TTL_SECS,
        "scope": "api@mock.marketo",
    });
    (StatusCode::OK, Json(body))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLeads {
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_lookup_field")]
    pub lookup_field: String,
    pub input: Vec<Lead>,
}

fn default_action() -> String {
    "createOrUpdate".to_string()
}

fn default_lookup_field() -> String {
    "email".to_string()
}

async fn sync_leads(State(db): State<Db>, headers: HeaderMap, Json(input): Json<SyncLeads>) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }

    let mut result = Vec::with_capacity(input.input.len());
    for (seq, lead) in input.input.into_iter().enumerate() {
        let existing = lead.get(&input.lookup_field).and_then(|key| store.find(&input.lookup_field, key));
        let record = match (input.action.as_str(), existing) {
            ("createOnly", Some(id)) => skipped(Some(id), Some(seq), "1005", "Lead already exists"),
            ("updateOnly", None) => skipped(None, Some(seq), "1004", "Lead not found"),
            ("createDuplicate", _) | (_, None) => {
                let id = store.insert(lead);
                json!({ "seq": seq, "id": id, "status": "created" })
            }
            (_, Some(id)) => {
                if let Some(stored) = store.leads.get_mut(&id) {
                    stored.extend(lead.into_iter().filter(|(k, _)| k != "id"));
                }
                json!({ "seq": seq, "id": id, "status": "updated" })
            }
        };
        result.push(record);
    }
    success(result)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub filter_type: String,
    pub filter_values: String,
    pub fields: Option<String>,
}

fn project(lead: &Lead, fields: Option<&str>) -> Value {
    let mut out = Map::new();
    out.insert("id".into(), lead.get("id").cloned().unwrap_or(Value::Null));
    let wanted: Vec<&str> = match fields {
        Some(fields) if !fields.is_empty() => fields.split(',').collect(),
        _ => DEFAULT_FIELDS.to_vec(),
    };
    for field in wanted {
        out.insert(field.to_string(), lead.get(field).cloned().unwrap_or(Value::Null));
    }
    Value::Object(out)
}

async fn leads_by_filter(State(db): State<Db>, headers: HeaderMap, Query(filter): Query<FilterQuery>) -> Json<Value> {
    let store = db.read().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }
    let values: HashSet<&str> = filter.filter_values.split(',').collect();
    let result = store
        .leads
        .values()
        .filter(|lead| {
            lead.get(&filter.filter_type)
                .map(text)
                .is_some_and(|v| values.contains(v.as_str()))
        })
        .map(|lead| project(lead, filter.fields.as_deref()))
        .collect();
    success(result)
}

#[derive(Debug, Deserialize)]
pub struct FieldsQuery {
    pub fields: Option<String>,
}

async fn lead_by_id(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(file): Path<String>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<Value>, StatusCode> {
    let id: i64 = file
        .strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    if let Err(denied) = store.authorize(&headers) {
        return Ok(denied);
    }
    let result = store
        .leads
        .get(&id)
        .map(|lead| project(lead, query.fields.as_deref()))
        .into_iter()
        .collect();
    Ok(success(result))
}

async fn delete_leads(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }
    let result = query_ids(&query)
        .into_iter()
        .map(|id| match store.leads.remove(&id) {
            Some(_) => {
                for members in store.lists.values_mut() {
                    members.remove(&id);
                }
                json!({ "id": id, "status": "deleted" })
            }
            None => skipped(Some(id), None, "1004", "Lead not found"),
        })
        .collect();
    success(result)
}

async fn add_to_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(list_id): Path<i64>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }
    let mut result = Vec::new();
    for id in query_ids(&query) {
        if !store.leads.contains_key(&id) {
            result.push(skipped(Some(id), None, "1004", "Lead not found"));
            continue;
        }
        store.lists.entry(list_id).or_default().insert(id);
        result.push(json!({ "id": id, "status": "added" }));
    }
    success(result)
}

async fn remove_from_list(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(list_id): Path<i64>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }
    let members = store.lists.entry(list_id).or_default();
    let result = query_ids(&query)
        .into_iter()
        .map(|id| {
            if members.remove(&id) {
                json!({ "id": id, "status": "removed" })
            } else {
                skipped(Some(id), None, "1015", "Lead not in list")
            }
        })
        .collect();
    success(result)
}

async fn is_member(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(list_id): Path<i64>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<Value> {
    let store = db.read().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }
    let members = store.lists.get(&list_id);
    let result = query_ids(&query)
        .into_iter()
        .map(|id| {
            if !store.leads.contains_key(&id) {
                return skipped(Some(id), None, "1004", "Lead not found");
            }
            let status = if members.is_some_and(|m| m.contains(&id)) {
                "memberof"
            } else {
                "notmemberof"
            };
            json!({ "id": id, "status": status })
        })
        .collect();
    success(result)
}

#[derive(Debug, Deserialize)]
pub struct ActivityInput {
    pub input: Vec<Map<String, Value>>,
}

async fn add_activities(State(db): State<Db>, headers: HeaderMap, Json(input): Json<ActivityInput>) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(denied) = store.authorize(&headers) {
        return denied;
    }
    let mut result = Vec::with_capacity(input.input.len());
    for activity in input.input {
        let lead_id = activity.get("leadId").and_then(Value::as_i64);
        if !lead_id.is_some_and(|id| store.leads.contains_key(&id)) {
            result.push(skipped(None, None, "1004", "Lead not found"));
            continue;
        }
        store.next_activity_id += 1;
        let id = store.next_activity_id;
        log::debug!("lead {:?} logged activity {id}: {:?}", lead_id, activity.get("primaryAttributeValue"));
        result.push(json!({ "id": id, "marketoGUID": id.to_string(), "status": "added" }));
    }
    success(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_ids_accepts_repeated_and_joined() {
        let query = vec![
            ("id".to_string(), "1".to_string()),
            ("id".to_string(), "2,3".to_string()),
            ("other".to_string(), "9".to_string()),
        ];
        assert_eq!(query_ids(&query), vec![1, 2, 3]);
    }

    #[test]
    fn sync_defaults() {
        let input: SyncLeads = serde_json::from_str(r#"{"input":[{"email":"a@b.com"}]}"#).unwrap();
        assert_eq!(input.action, "createOrUpdate");
        assert_eq!(input.lookup_field, "email");
    }

    #[test]
    fn project_always_includes_id() {
        let Value::Object(lead) = json!({"id": 4, "email": "a@b.com", "title": "CTO"}) else {
            unreachable!()
        };
        assert_eq!(project(&lead, Some("title")), json!({"id": 4, "title": "CTO"}));
        let default = project(&lead, None);
        assert_eq!(default["email"], "a@b.com");
        assert!(default.get("title").is_none());
    }

    #[test]
    fn store_finds_by_any_field() {
        let mut store = Store::default();
        let Value::Object(lead) = json!({"email": "a@b.com", "score": 7}) else {
            unreachable!()
        };
        let id = store.insert(lead);
        assert_eq!(store.find("email", &json!("a@b.com")), Some(id));
        assert_eq!(store.find("score", &json!(7)), Some(id));
        assert_eq!(store.find("email", &json!("x@y.com")), None);
    }

    #[test]
    fn missing_bearer_token_is_rejected() {
        let store = Store::default();
        let Err(Json(body)) = store.authorize(&HeaderMap::new()) else {
            panic!("expected rejection")
        };
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0]["code"], "600");
    }
}
