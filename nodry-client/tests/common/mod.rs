//! In-process stand-in for the REST backend.
//!
//! Implements just enough of the token, manufacturer, document, inquiry and
//! content endpoints to drive the client end to end over real HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use nodry_client::{ApiClient, MemorySessionStore, Session, SessionStore};
use nodry_model::{DocumentId, ManufacturerId};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "hunter2";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const INVESTOR_TOKEN: &str = "deck-token";
pub const INVESTOR_DECK: &[u8] = b"%PDF-1.7 investor deck";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

/// Multipart body as the backend received it
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub fields: Vec<(String, String)>,
    pub file_name: Option<String>,
    pub file: Vec<u8>,
}

impl Upload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
pub struct Backend {
    pub valid_access: Mutex<String>,
    pub refresh_token: Mutex<String>,
    pub refresh_calls: AtomicUsize,
    pub refresh_delay_ms: AtomicU64,
    pub reject_refresh: AtomicBool,
    pub fail_reorder: AtomicBool,
    pub issued: AtomicUsize,
    pub requests: Mutex<Vec<Recorded>>,
    pub manufacturers: Mutex<Vec<Value>>,
    pub documents: Mutex<Vec<Value>>,
    pub uploads: Mutex<Vec<Upload>>,
    pub leads: Mutex<Vec<Value>>,
    pub rfqs: Mutex<Vec<Value>>,
    pub content: Mutex<Vec<Value>>,
    /// Bodies of every accepted content block `PUT`
    pub content_puts: Mutex<Vec<Value>>,
}

impl Backend {
    pub fn new() -> Self {
        let backend = Self::default();
        *backend.refresh_token.lock() = REFRESH_TOKEN.to_string();
        backend
    }

    /// Invalidate whatever access token clients currently hold.
    pub fn expire_access(&self) {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        *self.valid_access.lock() = format!("revoked-{n}");
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn issue_access(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("access-{n}");
        *self.valid_access.lock() = token.clone();
        token
    }
}

pub fn content_block(slug: &str, page: &str, order: i32) -> Value {
    json!({
        "id": nodry_model::ContentBlockId::new(),
        "slug": slug,
        "title": slug.to_uppercase(),
        "html_content": format!("<p>{slug}</p>"),
        "page": page,
        "order": order,
        "is_active": true,
        "updated_at": "2025-01-02T03:04:05Z",
        "created_at": "2025-01-01T00:00:00Z"
    })
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Arc<Backend>,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub async fn start(backend: Backend) -> Self {
        let backend = Arc::new(backend);
        let app = router(Arc::clone(&backend));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{addr}/api"),
            backend,
            handle,
        }
    }

    /// Client with an empty in-memory session.
    pub async fn client(&self) -> (ApiClient, Arc<MemorySessionStore>) {
        self.client_with(Session::default()).await
    }

    pub async fn client_with(
        &self,
        session: Session,
    ) -> (ApiClient, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::with_session(session));
        let dyn_store: Arc<dyn SessionStore> = store.clone();
        let client = ApiClient::new(&self.base_url, dyn_store).await.unwrap();
        (client, store)
    }

    /// Client that has already logged in.
    pub async fn logged_in_client(&self) -> (ApiClient, Arc<MemorySessionStore>) {
        let (client, store) = self.client().await;
        client.login(USERNAME, PASSWORD).await.unwrap();
        (client, store)
    }
}

fn router(backend: Arc<Backend>) -> Router {
    Router::new()
        .route("/api/token/", post(login))
        .route("/api/token/refresh/", post(refresh))
        .route(
            "/api/manufacturers/",
            get(list_manufacturers).post(create_manufacturer),
        )
        .route(
            "/api/manufacturers/{id}/",
            get(get_manufacturer)
                .put(update_manufacturer)
                .delete(delete_manufacturer),
        )
        .route(
            "/api/documents/",
            get(list_documents).post(create_document),
        )
        .route(
            "/api/documents/{id}/",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route("/api/leads/", get(list_leads).post(create_lead))
        .route("/api/leads/export_csv/", get(export_leads))
        .route("/api/rfq/", get(list_rfqs).post(create_rfq))
        .route("/api/rfq/export_csv/", get(export_rfqs))
        .route("/api/content/", get(list_content).post(create_content))
        .route("/api/content/reorder/", post(reorder_content))
        .route(
            "/api/content/{slug}/",
            get(get_content)
                .put(update_content)
                .delete(delete_content),
        )
        .route("/api/investor/request-download/", post(request_download))
        .route("/api/investor/download/{token}/", get(download))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&backend),
            record,
        ))
        .with_state(backend)
}

async fn record(
    State(backend): State<Arc<Backend>>,
    request: Request,
    next: Next,
) -> Response {
    let entry = {
        let headers = request.headers();
        let text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        Recorded {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization: text(header::AUTHORIZATION),
            content_type: text(header::CONTENT_TYPE),
        }
    };
    backend.requests.lock().push(entry);
    next.run(request).await
}

fn unauthorized(detail: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": detail, "code": "token_not_valid" })),
    )
        .into_response()
}

fn authorize(backend: &Backend, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", backend.valid_access.lock());
    match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(unauthorized(
            "Given token not valid for any token type",
        )),
        None => Err(unauthorized(
            "Authentication credentials were not provided.",
        )),
    }
}

async fn login(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> Response {
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        let access = backend.issue_access();
        let refresh = backend.refresh_token.lock().clone();
        Json(json!({ "access": access, "refresh": refresh })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "detail": "No active account found with the given credentials"
            })),
        )
            .into_response()
    }
}

async fn refresh(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = backend.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let expected = backend.refresh_token.lock().clone();
    if backend.reject_refresh.load(Ordering::SeqCst) || body["refresh"] != expected {
        return unauthorized("Token is invalid or expired");
    }
    Json(json!({ "access": backend.issue_access() })).into_response()
}

async fn list_manufacturers(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    Json(Value::Array(backend.manufacturers.lock().clone())).into_response()
}

async fn create_manufacturer(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    if body["name"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "name": ["This field is required."] })),
        )
            .into_response();
    }
    body["id"] = json!(ManufacturerId::new());
    body["created_at"] = json!("2025-03-01T12:00:00Z");
    if body.get("active").is_none() {
        body["active"] = json!(true);
    }
    backend.manufacturers.lock().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

fn find_manufacturer(backend: &Backend, id: &str) -> Option<usize> {
    backend
        .manufacturers
        .lock()
        .iter()
        .position(|m| m["id"] == id)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })))
        .into_response()
}

async fn get_manufacturer(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    match find_manufacturer(&backend, &id) {
        Some(index) => {
            Json(backend.manufacturers.lock()[index].clone()).into_response()
        }
        None => not_found(),
    }
}

async fn update_manufacturer(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let Some(index) = find_manufacturer(&backend, &id) else {
        return not_found();
    };
    let mut stored = backend.manufacturers.lock();
    body["id"] = stored[index]["id"].clone();
    body["created_at"] = stored[index]["created_at"].clone();
    stored[index] = body.clone();
    Json(body).into_response()
}

async fn delete_manufacturer(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    match find_manufacturer(&backend, &id) {
        Some(index) => {
            backend.manufacturers.lock().remove(index);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

fn position(rows: &[Value], key: &str, value: &str) -> Option<usize> {
    rows.iter().position(|row| row[key] == value)
}

fn fetch_row(rows: &Mutex<Vec<Value>>, key: &str, value: &str) -> Response {
    let rows = rows.lock();
    match position(&rows, key, value) {
        Some(index) => Json(rows[index].clone()).into_response(),
        None => not_found(),
    }
}

fn remove_row(rows: &Mutex<Vec<Value>>, key: &str, value: &str) -> Response {
    let mut rows = rows.lock();
    match position(&rows, key, value) {
        Some(index) => {
            rows.remove(index);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}

async fn read_upload(request: Request) -> Upload {
    let mut form = Multipart::from_request(request, &()).await.unwrap();
    let mut upload = Upload::default();
    while let Some(field) = form.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            upload.file_name = field.file_name().map(str::to_owned);
            upload.file = field.bytes().await.unwrap().to_vec();
        } else {
            upload.fields.push((name, field.text().await.unwrap()));
        }
    }
    upload
}

async fn list_documents(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let rows: Vec<Value> = backend
        .documents
        .lock()
        .iter()
        .filter(|doc| {
            params
                .get("category")
                .is_none_or(|category| doc["category"] == category.as_str())
        })
        .cloned()
        .collect();
    Json(json!({
        "count": rows.len(),
        "next": null,
        "previous": null,
        "results": rows
    }))
    .into_response()
}

async fn create_document(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let (file_name, category, description, file) = if is_multipart(&headers) {
        let upload = read_upload(request).await;
        let stored = format!(
            "/media/documents/{}",
            upload.file_name.as_deref().unwrap_or_default()
        );
        let fields = (
            json!(upload.field("file_name")),
            json!(upload.field("category")),
            json!(upload.field("description")),
            json!(stored),
        );
        backend.uploads.lock().push(upload);
        fields
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (
            body["file_name"].clone(),
            body["category"].clone(),
            body["description"].clone(),
            body["file"].clone(),
        )
    };
    let document = json!({
        "id": DocumentId::new(),
        "file_name": file_name,
        "file": file,
        "file_url": null,
        "category": category,
        "description": description,
        "created_at": "2025-03-01T12:00:00Z"
    });
    backend.documents.lock().push(document.clone());
    (StatusCode::CREATED, Json(document)).into_response()
}

async fn get_document(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    fetch_row(&backend.documents, "id", &id)
}

async fn update_document(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let mut rows = backend.documents.lock();
    let Some(index) = position(&rows, "id", &id) else {
        return not_found();
    };
    let stored = &mut rows[index];
    for key in ["file_name", "category", "description"] {
        stored[key] = body[key].clone();
    }
    Json(stored.clone()).into_response()
}

async fn delete_document(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    remove_row(&backend.documents, "id", &id)
}

async fn list_leads(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    Json(Value::Array(backend.leads.lock().clone())).into_response()
}

async fn create_lead(
    State(backend): State<Arc<Backend>>,
    Json(mut body): Json<Value>,
) -> Response {
    body["id"] = json!(nodry_model::LeadId::new());
    body["created_at"] = json!("2025-03-01T12:00:00Z");
    backend.leads.lock().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn export_leads(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let mut csv =
        String::from("ID,Full Name,Email,Phone,Inquiry Type,Message,Created At\n");
    for lead in backend.leads.lock().iter() {
        csv.push_str(&format!(
            "{},{},{},,Contact,{},{}\n",
            lead["id"].as_str().unwrap_or_default(),
            lead["full_name"].as_str().unwrap_or_default(),
            lead["email"].as_str().unwrap_or_default(),
            lead["message"].as_str().unwrap_or_default(),
            lead["created_at"].as_str().unwrap_or_default(),
        ));
    }
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads_export.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}

async fn create_rfq(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let text = String::from_utf8_lossy(&body);
    if !is_multipart(&headers) || !text.contains("name=\"full_name\"") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "full_name": ["This field is required."] })),
        )
            .into_response();
    }
    let attachment = if text.contains("name=\"attachment\"") {
        json!("/media/rfq_attachments/drawing.pdf")
    } else {
        Value::Null
    };
    let submission = json!({
        "id": nodry_model::RfqId::new(),
        "full_name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "555-0100",
        "company": null,
        "message": "Need 40 units",
        "attachment": attachment,
        "created_at": "2025-03-01T12:00:00Z"
    });
    backend.rfqs.lock().push(submission.clone());
    (StatusCode::CREATED, Json(submission)).into_response()
}

async fn list_rfqs(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    Json(Value::Array(backend.rfqs.lock().clone())).into_response()
}

async fn export_rfqs(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let mut csv = String::from(
        "ID,Full Name,Email,Phone,Company,Message,Has Attachment,Created At\n",
    );
    for rfq in backend.rfqs.lock().iter() {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            rfq["id"].as_str().unwrap_or_default(),
            rfq["full_name"].as_str().unwrap_or_default(),
            rfq["email"].as_str().unwrap_or_default(),
            rfq["phone"].as_str().unwrap_or_default(),
            rfq["company"].as_str().unwrap_or_default(),
            rfq["message"].as_str().unwrap_or_default(),
            if rfq["attachment"].is_null() { "No" } else { "Yes" },
            rfq["created_at"].as_str().unwrap_or_default(),
        ));
    }
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"rfq_submissions_export.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}

async fn list_content(State(backend): State<Arc<Backend>>) -> Response {
    Json(Value::Array(backend.content.lock().clone())).into_response()
}

async fn get_content(
    State(backend): State<Arc<Backend>>,
    Path(slug): Path<String>,
) -> Response {
    fetch_row(&backend.content, "slug", &slug)
}

async fn create_content(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let slug = body["slug"].as_str().unwrap_or_default().to_string();
    if position(&backend.content.lock(), "slug", &slug).is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "slug": ["content block with this slug already exists."]
            })),
        )
            .into_response();
    }
    body["id"] = json!(nodry_model::ContentBlockId::new());
    body["created_at"] = json!("2025-03-01T12:00:00Z");
    body["updated_at"] = json!("2025-03-01T12:00:00Z");
    if body.get("is_active").is_none() {
        body["is_active"] = json!(true);
    }
    backend.content.lock().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_content(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    let mut rows = backend.content.lock();
    let Some(index) = position(&rows, "slug", &slug) else {
        return not_found();
    };
    backend.content_puts.lock().push(body.clone());
    body["id"] = rows[index]["id"].clone();
    body["created_at"] = rows[index]["created_at"].clone();
    body["updated_at"] = json!("2025-03-02T08:00:00Z");
    rows[index] = body.clone();
    Json(body).into_response()
}

async fn delete_content(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    remove_row(&backend.content, "slug", &slug)
}

async fn reorder_content(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&backend, &headers) {
        return denied;
    }
    if backend.fail_reorder.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let entries = body["blocks"].as_array().cloned().unwrap_or_default();
    if entries.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "blocks data is required" })),
        )
            .into_response();
    }

    let mut updated = 0;
    let mut content = backend.content.lock();
    for entry in entries {
        if let Some(block) = content.iter_mut().find(|b| b["slug"] == entry["slug"]) {
            block["order"] = entry["order"].clone();
            updated += 1;
        }
    }
    Json(json!({
        "message": format!("Successfully updated order for {updated} blocks"),
        "updated_count": updated
    }))
    .into_response()
}

async fn request_download(Json(body): Json<Value>) -> Response {
    if body["email"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "email": ["This field is required."] })),
        )
            .into_response();
    }
    Json(json!({
        "message": "Download link sent to your email",
        "expires_at": "2025-03-02T12:00:00Z"
    }))
    .into_response()
}

async fn download(Path(token): Path<String>) -> Response {
    if token != INVESTOR_TOKEN {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Download link has expired" })),
        )
            .into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        INVESTOR_DECK.to_vec(),
    )
        .into_response()
}
