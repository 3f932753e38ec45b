//! In-process fake of the Dropbox API v2 routes the client uses.
//!
//! State lives in memory; paths are matched case-insensitively like the
//! real service. Listings are paginated with a configurable page size.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use dbx_client::Config;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "sl.test-token";

const TIMESTAMP: &str = "2024-05-01T12:00:00Z";

#[derive(Clone)]
enum Node {
    File { display: String, content: Bytes, rev: u64 },
    Folder { display: String },
}

struct FakeState {
    token: String,
    page_size: usize,
    nodes: Mutex<BTreeMap<String, Node>>,
    requests: AtomicUsize,
    revisions: AtomicU64,
}

/// Handle to a running fake server
pub struct FakeDropbox {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeDropbox {
    pub async fn spawn() -> Self {
        Self::spawn_with_page_size(100).await
    }

    pub async fn spawn_with_page_size(page_size: usize) -> Self {
        let state = Arc::new(FakeState {
            token: TEST_TOKEN.to_string(),
            page_size,
            nodes: Mutex::new(BTreeMap::new()),
            requests: AtomicUsize::new(0),
            revisions: AtomicU64::new(0),
        });

        let app = Router::new()
            .route("/2/users/get_current_account", post(get_current_account))
            .route("/2/files/get_metadata", post(get_metadata))
            .route("/2/files/list_folder", post(list_folder))
            .route("/2/files/list_folder/continue", post(list_folder_continue))
            .route("/2/files/create_folder_v2", post(create_folder))
            .route("/2/files/upload", post(upload))
            .route("/2/files/download", post(download))
            .route("/2/files/delete_v2", post(delete))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Client configuration pointing both hosts at this server
    pub fn config(&self) -> Config {
        Config::default().with_base_url(&self.base_url)
    }

    /// Number of requests received so far, authorized or not
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Stored bytes of the file at `path`
    pub fn file_content(&self, path: &str) -> Option<Bytes> {
        match self.state.nodes.lock().get(&key(path)) {
            Some(Node::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }
}

// ==================== Request plumbing ====================

#[derive(Deserialize)]
struct PathArg {
    path: String,
}

#[derive(Deserialize)]
struct ListFolderArg {
    path: String,
}

#[derive(Deserialize)]
struct CursorArg {
    cursor: String,
}

fn api_error(status: StatusCode, summary: &str) -> Response {
    (
        status,
        Json(json!({"error_summary": summary, "error": {".tag": "path"}})),
    )
        .into_response()
}

fn authorize(state: &FakeState, headers: &HeaderMap) -> Result<(), Response> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {}", state.token);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(api_error(StatusCode::UNAUTHORIZED, "invalid_access_token/...")),
    }
}

fn header_arg<T: for<'de> Deserialize<'de>>(headers: &HeaderMap) -> Result<T, Response> {
    headers
        .get("dropbox-api-arg")
        .and_then(|v| serde_json::from_slice(v.as_bytes()).ok())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "missing or malformed Dropbox-API-Arg").into_response())
}

/// JSON with non-ASCII escaped so it fits in a header value
fn ascii_json(value: &Value) -> String {
    let mut out = String::new();
    for c in value.to_string().chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

fn key(path: &str) -> String {
    path.trim_end_matches('/').to_lowercase()
}

fn parent(key: &str) -> &str {
    key.rsplit_once('/').map(|(p, _)| p).unwrap_or("")
}

fn name(display: &str) -> &str {
    display.rsplit('/').next().unwrap_or(display)
}

fn node_json(node: &Node, tagged: bool) -> Value {
    let mut value = match node {
        Node::File { display, content, rev } => json!({
            "name": name(display),
            "id": format!("id:{}", display.to_lowercase()),
            "path_lower": display.to_lowercase(),
            "path_display": display,
            "rev": format!("{:016x}", rev),
            "size": content.len(),
            "client_modified": TIMESTAMP,
            "server_modified": TIMESTAMP,
            "content_hash": format!("{:x}", content.len()),
        }),
        Node::Folder { display } => json!({
            "name": name(display),
            "id": format!("id:{}", display.to_lowercase()),
            "path_lower": display.to_lowercase(),
            "path_display": display,
        }),
    };
    if tagged {
        let tag = match node {
            Node::File { .. } => "file",
            Node::Folder { .. } => "folder",
        };
        value[".tag"] = json!(tag);
    }
    value
}

/// Create missing ancestor folders of `display`, failing if one is a file
fn ensure_parents(nodes: &mut BTreeMap<String, Node>, display: &str) -> Result<(), Response> {
    let mut prefix = String::new();
    let segments: Vec<&str> = display.split('/').filter(|s| !s.is_empty()).collect();
    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        prefix.push('/');
        prefix.push_str(segment);
        match nodes.get(&key(&prefix)) {
            Some(Node::File { .. }) => {
                return Err(api_error(StatusCode::CONFLICT, "path/conflict/file/..."))
            }
            Some(Node::Folder { .. }) => {}
            None => {
                nodes.insert(key(&prefix), Node::Folder { display: prefix.clone() });
            }
        }
    }
    Ok(())
}

fn list_page(state: &FakeState, folder: &str, offset: usize) -> Response {
    let nodes = state.nodes.lock();
    let children: Vec<&Node> = nodes
        .iter()
        .filter(|(k, _)| parent(k) == folder)
        .map(|(_, node)| node)
        .collect();

    let end = (offset + state.page_size).min(children.len());
    let entries: Vec<Value> = children[offset.min(end)..end]
        .iter()
        .map(|node| node_json(node, true))
        .collect();

    Json(json!({
        "entries": entries,
        "cursor": format!("{}|{}", end, folder),
        "has_more": end < children.len(),
    }))
    .into_response()
}

// ==================== Handlers ====================

async fn get_current_account(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    Json(json!({
        "account_id": "dbid:AAH4f99T0taONIb-OurWxbNQ6ywGRopQngc",
        "name": {
            "given_name": "Franz",
            "surname": "Ferdinand",
            "familiar_name": "Franz",
            "display_name": "Franz Ferdinand (Personal)",
            "abbreviated_name": "FF"
        },
        "email": "franz@example.com",
        "email_verified": true,
        "disabled": false,
        "country": "US",
        "locale": "en"
    }))
    .into_response()
}

async fn get_metadata(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(arg): Json<PathArg>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match state.nodes.lock().get(&key(&arg.path)) {
        Some(node) => Json(node_json(node, true)).into_response(),
        None => api_error(StatusCode::CONFLICT, "path/not_found/..."),
    }
}

async fn list_folder(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(arg): Json<ListFolderArg>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let folder = key(&arg.path);
    if !folder.is_empty() {
        match state.nodes.lock().get(&folder) {
            Some(Node::Folder { .. }) => {}
            Some(Node::File { .. }) => {
                return api_error(StatusCode::CONFLICT, "path/not_folder/...")
            }
            None => return api_error(StatusCode::CONFLICT, "path/not_found/..."),
        }
    }

    list_page(&state, &folder, 0)
}

async fn list_folder_continue(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(arg): Json<CursorArg>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    match arg
        .cursor
        .split_once('|')
        .and_then(|(offset, folder)| offset.parse::<usize>().ok().map(|o| (o, folder.to_string())))
    {
        Some((offset, folder)) => list_page(&state, &folder, offset),
        None => api_error(StatusCode::CONFLICT, "reset/..."),
    }
}

async fn create_folder(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(arg): Json<PathArg>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let mut nodes = state.nodes.lock();
    if nodes.contains_key(&key(&arg.path)) {
        return api_error(StatusCode::CONFLICT, "path/conflict/folder/...");
    }
    if let Err(resp) = ensure_parents(&mut nodes, &arg.path) {
        return resp;
    }

    let node = Node::Folder {
        display: arg.path.clone(),
    };
    let body = json!({"metadata": node_json(&node, false)});
    nodes.insert(key(&arg.path), node);

    Json(body).into_response()
}

#[derive(Deserialize)]
struct UploadArg {
    path: String,
    mode: String,
    autorename: bool,
}

async fn upload(State(state): State<Arc<FakeState>>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let arg: UploadArg = match header_arg(&headers) {
        Ok(arg) => arg,
        Err(resp) => return resp,
    };
    if arg.mode != "add" || arg.autorename {
        return (StatusCode::BAD_REQUEST, "unsupported write mode").into_response();
    }

    let mut nodes = state.nodes.lock();
    if nodes.contains_key(&key(&arg.path)) {
        return api_error(StatusCode::CONFLICT, "path/conflict/file/...");
    }
    if let Err(resp) = ensure_parents(&mut nodes, &arg.path) {
        return resp;
    }

    let node = Node::File {
        display: arg.path.clone(),
        content: body,
        rev: state.revisions.fetch_add(1, Ordering::SeqCst) + 1,
    };
    let meta = node_json(&node, false);
    nodes.insert(key(&arg.path), node);

    Json(meta).into_response()
}

async fn download(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let arg: PathArg = match header_arg(&headers) {
        Ok(arg) => arg,
        Err(resp) => return resp,
    };

    let node = state.nodes.lock().get(&key(&arg.path)).cloned();
    match node {
        Some(node @ Node::File { .. }) => {
            let result = ascii_json(&node_json(&node, false));
            let content = match node {
                Node::File { content, .. } => content,
                Node::Folder { .. } => Bytes::new(),
            };
            let mut response = content.into_response();
            response.headers_mut().insert(
                HeaderName::from_static("dropbox-api-result"),
                HeaderValue::from_str(&result).unwrap(),
            );
            response
        }
        Some(Node::Folder { .. }) => api_error(StatusCode::CONFLICT, "path/not_file/..."),
        None => api_error(StatusCode::CONFLICT, "path/not_found/..."),
    }
}

async fn delete(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(arg): Json<PathArg>,
) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }

    let target = key(&arg.path);
    let mut nodes = state.nodes.lock();
    let removed = match nodes.remove(&target) {
        Some(node) => node,
        None => return api_error(StatusCode::CONFLICT, "path_lookup/not_found/..."),
    };

    let prefix = format!("{}/", target);
    nodes.retain(|k, _| !k.starts_with(&prefix));

    Json(json!({"metadata": node_json(&removed, true)})).into_response()
}
