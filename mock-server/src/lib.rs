use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SYNC_PATH: &str = "/sync/v9/sync";
pub const DEFAULT_TOKEN: &str = "test-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub content: String,
    pub checked: bool,
    pub priority: u8,
    pub project_id: String,
}

impl Item {
    pub fn new(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
            checked: false,
            priority: 1,
            project_id: "inbox".to_string(),
        }
    }
}

/// Form fields accepted by the sync endpoint. A request carries either a
/// read (`sync_token` + `resource_types`) or a write (`commands`).
#[derive(Debug, Deserialize)]
pub struct SyncForm {
    pub sync_token: Option<String>,
    pub resource_types: Option<String>,
    pub commands: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Command {
    #[serde(rename = "type")]
    pub kind: String,
    pub uuid: Uuid,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub token: String,
    pub items: Vec<Item>,
    /// Command uuids already applied; replays are acknowledged, not re-run.
    pub processed: HashSet<Uuid>,
    pub sync_requests: usize,
    pub command_requests: usize,
}

impl MockState {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            ..Self::default()
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }
}

pub type Db = Arc<RwLock<MockState>>;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with(MockState::new(DEFAULT_TOKEN))
}

pub fn app_with(state: MockState) -> Router {
    router(Arc::new(RwLock::new(state)))
}

/// Build the router over shared state so tests can inspect it afterwards.
pub fn router(db: Db) -> Router {
    Router::new().route(SYNC_PATH, post(sync)).with_state(db)
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, router(db)).await
}

/// Authenticates before the body is decoded, so a bad token is a 401 whatever
/// the body holds.
async fn sync(State(db): State<Db>, request: Request) -> Response {
    let token = db.read().await.token.clone();
    if !authorized(request.headers(), &token) {
        return failure(StatusCode::UNAUTHORIZED, "Invalid token").into_response();
    }

    match Form::<SyncForm>::from_request(request, &()).await {
        Ok(Form(form)) => dispatch(&db, form).await.into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

async fn dispatch(db: &Db, form: SyncForm) -> ApiResult {
    let mut state = db.write().await;
    if let Some(commands) = form.commands {
        state.command_requests += 1;
        return apply_commands(&mut state, &commands);
    }
    if form.sync_token.is_some() {
        state.sync_requests += 1;
        return read_resources(&state, form.resource_types.as_deref());
    }
    Err(failure(
        StatusCode::BAD_REQUEST,
        "Either sync_token or commands is required",
    ))
}

fn authorized(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|presented| presented == token)
}

fn read_resources(state: &MockState, resource_types: Option<&str>) -> ApiResult {
    let raw = resource_types
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "resource_types is required"))?;
    let types: Vec<String> = serde_json::from_str(raw)
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "resource_types must be a JSON array"))?;

    let mut body = Map::new();
    body.insert("full_sync".to_string(), Value::Bool(true));
    body.insert("sync_token".to_string(), Value::String(next_sync_token()));
    body.insert("temp_id_mapping".to_string(), json!({}));
    if types.iter().any(|t| t == "items" || t == "all") {
        let open: Vec<&Item> = state.items.iter().filter(|item| !item.checked).collect();
        body.insert("items".to_string(), json!(open));
    }
    Ok(Json(Value::Object(body)))
}

fn apply_commands(state: &mut MockState, raw: &str) -> ApiResult {
    let commands: Vec<Command> = serde_json::from_str(raw)
        .map_err(|_| failure(StatusCode::BAD_REQUEST, "commands must be a JSON array"))?;

    let mut statuses = Map::new();
    for command in commands {
        let status = if state.processed.contains(&command.uuid) {
            json!("ok")
        } else {
            apply_command(state, &command)
        };
        statuses.insert(command.uuid.to_string(), status);
    }

    Ok(Json(json!({
        "sync_status": statuses,
        "temp_id_mapping": {},
        "sync_token": next_sync_token(),
    })))
}

fn apply_command(state: &mut MockState, command: &Command) -> Value {
    if command.kind != "item_complete" {
        return json!({"error_code": 24, "error": "Invalid command type"});
    }
    let id = match &command.args["id"] {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => return json!({"error_code": 20, "error": "Argument is missing: id"}),
    };
    match state.items.iter_mut().find(|item| item.id == id) {
        Some(item) => {
            item.checked = true;
            state.processed.insert(command.uuid);
            json!("ok")
        }
        None => json!({"error_code": 22, "error": "Item not found"}),
    }
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({"error": message, "http_code": status.as_u16()})),
    )
}

fn next_sync_token() -> String {
    Uuid::new_v4().simple().to_string()
}
