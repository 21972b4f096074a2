//! An in-memory stand-in for the finance REST API.

use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use crate::{
    error::ApiError,
    http::{HttpRequest, HttpResponse, Method, Transport},
};

pub const USERNAME: &str = "joy";
pub const PASSWORD: &str = "aaa";
pub const ACCESS_TOKEN: &str = "access-token";
pub const REFRESH_TOKEN: &str = "refresh-token";
pub const TIMESTAMP: &str = "2025-09-02T10:00:00Z";

const COLLECTIONS: [&str; 5] = ["accounts", "categories", "transactions", "budgets", "goals"];

struct ServerState {
    collections: HashMap<&'static str, BTreeMap<i64, Value>>,
    next_id: i64,
    current_month: NaiveDate,
    requests: Vec<HttpRequest>,
    failures: HashMap<String, u16>,
    disconnected: bool,
}

/// Serves every collection from memory. Requests need `Bearer access-token`
/// except login and register; transactions adjust their account's balance
/// the way the real server does.
pub struct FakeServer {
    state: RefCell<ServerState>,
}

impl Default for FakeServer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeServer {
    pub fn new() -> Self {
        let collections = COLLECTIONS
            .iter()
            .map(|name| (*name, BTreeMap::new()))
            .collect();

        Self {
            state: RefCell::new(ServerState {
                collections,
                next_id: 1,
                current_month: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                requests: Vec::new(),
                failures: HashMap::new(),
                disconnected: false,
            }),
        }
    }

    /// The month `budgets/current/` reports on.
    pub fn current_month(&self) -> NaiveDate {
        self.state.borrow().current_month
    }

    /// Insert a raw object, assigning an id if it has none. Returns the id.
    pub fn seed(&self, collection: &str, value: Value) -> i64 {
        let mut state = self.state.borrow_mut();
        let mut object = match value {
            Value::Object(object) => object,
            other => panic!("seed expects an object, got {other}"),
        };
        let id = match object.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => {
                let id = state.next_id;
                object.insert("id".to_string(), json!(id));
                id
            }
        };
        state.next_id = state.next_id.max(id + 1);
        add_timestamps(&mut object);

        let key = collection_key(collection).expect("unknown collection");
        state
            .collections
            .get_mut(key)
            .expect("collection exists")
            .insert(id, Value::Object(object));
        id
    }

    pub fn stored(&self, collection: &str, id: i64) -> Option<Value> {
        let key = collection_key(collection)?;
        self.state.borrow().collections[key].get(&id).cloned()
    }

    /// Answer every request to `path` with `status` from now on.
    pub fn fail_path(&self, path: &str, status: u16) {
        self.state
            .borrow_mut()
            .failures
            .insert(path.to_string(), status);
    }

    pub fn heal_path(&self, path: &str) {
        self.state.borrow_mut().failures.remove(path);
    }

    /// Make every request fail without a response.
    pub fn disconnect(&self) {
        self.state.borrow_mut().disconnected = true;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.borrow().requests.last().cloned()
    }

    pub fn clear_requests(&self) {
        self.state.borrow_mut().requests.clear();
    }

    /// Paths of the GET requests received so far, in order.
    pub fn fetched_paths(&self) -> Vec<String> {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method == Method::Get)
            .map(|r| r.path.clone())
            .collect()
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let mut state = self.state.borrow_mut();

        if let Some(status) = state.failures.get(&request.path) {
            return respond(*status, json!({ "detail": "injected failure" }));
        }

        match (request.method, request.path.as_str()) {
            (Method::Post, "auth/register/") => {
                let body = request.body.clone().unwrap_or(Value::Null);
                let id = state.next_id;
                state.next_id += 1;
                return respond(
                    201,
                    json!({ "id": id, "email": body["email"], "username": body["username"] }),
                );
            }
            (Method::Post, "auth/login/") => {
                let body = request.body.clone().unwrap_or(Value::Null);
                if body["username"] == USERNAME && body["password"] == PASSWORD {
                    return respond(
                        200,
                        json!({
                            "id": 1,
                            "email": "joy@example.com",
                            "username": USERNAME,
                            "access": ACCESS_TOKEN,
                            "refresh": REFRESH_TOKEN,
                        }),
                    );
                }
                return respond(401, json!({ "detail": "No active account found" }));
            }
            _ => {}
        }

        if request.bearer.as_deref() != Some(ACCESS_TOKEN) {
            return respond(401, json!({ "detail": "Given token not valid" }));
        }

        match (request.method, request.path.as_str()) {
            (Method::Get, "auth/me/") => {
                return respond(
                    200,
                    json!({ "id": 1, "email": "joy@example.com", "username": USERNAME }),
                );
            }
            (Method::Get, "budgets/current/") => {
                let month = state.current_month.format("%Y-%m-%d").to_string();
                let current: Vec<Value> = state.collections["budgets"]
                    .values()
                    .filter(|b| b["month"] == month.as_str())
                    .cloned()
                    .collect();
                return respond(200, Value::Array(current));
            }
            _ => {}
        }

        let segments: Vec<&str> = request
            .path
            .trim_end_matches('/')
            .split('/')
            .collect();
        let Some(collection) = collection_key(segments[0]) else {
            return respond(404, json!({ "detail": "Not found." }));
        };
        let id = match segments.get(1).map(|raw| raw.parse::<i64>()) {
            None => None,
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => return respond(404, json!({ "detail": "Not found." })),
        };

        match (request.method, id) {
            (Method::Get, None) => {
                let items: Vec<Value> = state.collections[collection]
                    .values()
                    .filter(|item| matches_query(item, &request.query))
                    .cloned()
                    .collect();
                respond(200, Value::Array(items))
            }
            (Method::Post, None) => {
                let Some(Value::Object(mut object)) = request.body.clone() else {
                    return respond(400, json!({ "detail": "expected an object" }));
                };
                let id = state.next_id;
                state.next_id += 1;
                object.insert("id".to_string(), json!(id));
                object.insert("user".to_string(), json!(1));
                add_timestamps(&mut object);
                let created = Value::Object(object);
                if collection == "transactions" {
                    apply_to_balance(&mut state, &created, Decimal::ONE);
                }
                state
                    .collections
                    .get_mut(collection)
                    .expect("collection exists")
                    .insert(id, created.clone());
                respond(201, created)
            }
            (method, Some(id)) => {
                let Some(existing) = state.collections[collection].get(&id).cloned() else {
                    return respond(404, json!({ "detail": "Not found." }));
                };
                match method {
                    Method::Get => respond(200, existing),
                    Method::Delete => {
                        if collection == "transactions" {
                            apply_to_balance(&mut state, &existing, Decimal::NEGATIVE_ONE);
                        }
                        state
                            .collections
                            .get_mut(collection)
                            .expect("collection exists")
                            .remove(&id);
                        HttpResponse {
                            status: 204,
                            body: String::new(),
                        }
                    }
                    Method::Put | Method::Patch => {
                        let Some(Value::Object(changes)) = request.body.clone() else {
                            return respond(400, json!({ "detail": "expected an object" }));
                        };
                        let mut object = match (method, existing) {
                            (Method::Patch, Value::Object(object)) => object,
                            (_, existing) => {
                                let mut kept = Map::new();
                                for key in ["user", "created_at"] {
                                    if let Some(value) = existing.get(key) {
                                        kept.insert(key.to_string(), value.clone());
                                    }
                                }
                                kept
                            }
                        };
                        object.extend(changes);
                        object.insert("id".to_string(), json!(id));
                        object.insert("updated_at".to_string(), json!("2025-09-03T08:30:00Z"));
                        add_timestamps(&mut object);
                        let updated = Value::Object(object);
                        state
                            .collections
                            .get_mut(collection)
                            .expect("collection exists")
                            .insert(id, updated.clone());
                        respond(200, updated)
                    }
                    Method::Post => respond(405, json!({ "detail": "Method not allowed." })),
                }
            }
            _ => respond(405, json!({ "detail": "Method not allowed." })),
        }
    }
}

impl Transport for FakeServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.state.borrow_mut().requests.push(request.clone());
        if self.state.borrow().disconnected {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(self.handle(&request))
    }
}

fn collection_key(name: &str) -> Option<&'static str> {
    COLLECTIONS.iter().copied().find(|c| *c == name)
}

fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn add_timestamps(object: &mut Map<String, Value>) {
    for key in ["created_at", "updated_at"] {
        object
            .entry(key.to_string())
            .or_insert_with(|| json!(TIMESTAMP));
    }
}

fn reference_id(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.get("id").and_then(Value::as_i64))
}

fn decimal_of(value: &Value) -> Decimal {
    match value {
        Value::String(raw) => raw.parse().unwrap_or_default(),
        Value::Number(number) => number.to_string().parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

fn matches_query(item: &Value, query: &[(String, String)]) -> bool {
    query.iter().all(|(key, value)| match key.as_str() {
        "type" => item["type"] == value.as_str(),
        "category__id" => reference_id(&item["category"]).map(|id| id.to_string()).as_deref()
            == Some(value.as_str()),
        "date" => item["date"] == value.as_str(),
        _ => true,
    })
}

fn apply_to_balance(state: &mut ServerState, transaction: &Value, sign: Decimal) {
    let Some(account_id) = reference_id(&transaction["account"]) else {
        return;
    };
    let amount = decimal_of(&transaction["amount"]);
    let delta = match transaction["type"].as_str() {
        Some("income") => amount * sign,
        _ => -amount * sign,
    };
    if let Some(account) = state
        .collections
        .get_mut("accounts")
        .and_then(|accounts| accounts.get_mut(&account_id))
    {
        let balance = decimal_of(&account["balance"]) + delta;
        account["balance"] = json!(balance.to_string());
    }
}
