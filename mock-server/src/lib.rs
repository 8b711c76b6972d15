use std::{collections::HashMap, sync::Arc, time::Instant};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub mod stub;

pub const RESOURCE_TYPE_FOO: &str = "foo";

/// Application error codes carried in `errors[].code`.
pub const CODE_INVALID_BODY: i64 = 1;
pub const CODE_TYPE_MISMATCH: i64 = 2;
pub const CODE_INVALID_ATTR: i64 = 3;
pub const CODE_NOT_FOUND: i64 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foo {
    pub name: String,
    pub note: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFoo {
    pub name: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFoo {
    pub name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    pub attributes: A,
}

#[derive(Debug, Deserialize)]
pub struct ReqBody<A> {
    pub data: Resource<A>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub took_ms: u64,
    pub trace_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErr {
    pub status: String,
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrSource>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<A> {
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Resource<A>>,
}

pub type Db = Arc<RwLock<HashMap<String, Foo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/v1/foos", post(create_foo))
        .route("/v1/foos/{id}", get(read_foo).patch(update_foo).delete(delete_foo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn meta(started: Instant) -> Meta {
    Meta {
        took_ms: started.elapsed().as_millis() as u64,
        trace_id: Uuid::new_v4().to_string(),
    }
}

fn found(started: Instant, status: StatusCode, id: String, foo: Foo) -> Response {
    let body = Envelope {
        meta: meta(started),
        errors: Vec::new(),
        data: Some(Resource {
            kind: RESOURCE_TYPE_FOO.to_string(),
            id,
            attributes: foo,
        }),
    };
    (status, Json(body)).into_response()
}

fn failed(started: Instant, status: StatusCode, code: i64, message: &str, source: Option<ErrSource>) -> Response {
    tracing::debug!(status = status.as_u16(), code, reason = message, "request failed");
    let body: Envelope<Foo> = Envelope {
        meta: meta(started),
        errors: vec![ApiErr {
            status: status.as_u16().to_string(),
            code,
            message: message.to_string(),
            source,
        }],
        data: None,
    };
    (status, Json(body)).into_response()
}

fn pointer(p: &str) -> Option<ErrSource> {
    Some(ErrSource {
        pointer: Some(p.to_string()),
        parameter: None,
    })
}

fn not_found(started: Instant) -> Response {
    let source = Some(ErrSource {
        pointer: None,
        parameter: Some("id".to_string()),
    });
    failed(started, StatusCode::NOT_FOUND, CODE_NOT_FOUND, "foo not found", source)
}

/// Unwrap a JSON body and check its resource type, or build the error response.
fn accept<A>(started: Instant, body: Result<Json<ReqBody<A>>, JsonRejection>) -> Result<Resource<A>, Response> {
    let Json(body) = body.map_err(|rejection| {
        failed(
            started,
            StatusCode::BAD_REQUEST,
            CODE_INVALID_BODY,
            &rejection.body_text(),
            pointer("/data"),
        )
    })?;
    if body.data.kind != RESOURCE_TYPE_FOO {
        return Err(failed(
            started,
            StatusCode::CONFLICT,
            CODE_TYPE_MISMATCH,
            "resource type must be foo",
            pointer("/data/type"),
        ));
    }
    Ok(body.data)
}

async fn create_foo(State(db): State<Db>, body: Result<Json<ReqBody<CreateFoo>>, JsonRejection>) -> Response {
    let started = Instant::now();
    let data = match accept(started, body) {
        Ok(data) => data,
        Err(resp) => return resp,
    };
    if data.attributes.name.is_empty() {
        return failed(
            started,
            StatusCode::UNPROCESSABLE_ENTITY,
            CODE_INVALID_ATTR,
            "name is required",
            pointer("/data/attributes/name"),
        );
    }

    let ts = now();
    let id = Uuid::new_v4().to_string();
    let foo = Foo {
        name: data.attributes.name,
        note: data.attributes.note,
        created_at: ts.clone(),
        updated_at: ts,
    };
    db.write().await.insert(id.clone(), foo.clone());
    tracing::debug!(%id, "foo created");
    found(started, StatusCode::CREATED, id, foo)
}

async fn read_foo(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let started = Instant::now();
    let foos = db.read().await;
    match foos.get(&id) {
        Some(foo) => found(started, StatusCode::OK, id, foo.clone()),
        None => not_found(started),
    }
}

async fn update_foo(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Result<Json<ReqBody<UpdateFoo>>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let data = match accept(started, body) {
        Ok(data) => data,
        Err(resp) => return resp,
    };
    if !data.id.is_empty() && data.id != id {
        return failed(
            started,
            StatusCode::CONFLICT,
            CODE_TYPE_MISMATCH,
            "resource id does not match path",
            pointer("/data/id"),
        );
    }

    let mut foos = db.write().await;
    let Some(foo) = foos.get_mut(&id) else {
        return not_found(started);
    };
    if let Some(name) = data.attributes.name {
        foo.name = name;
    }
    if let Some(note) = data.attributes.note {
        foo.note = note;
    }
    foo.updated_at = now();
    found(started, StatusCode::OK, id, foo.clone())
}

async fn delete_foo(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let started = Instant::now();
    if db.write().await.remove(&id).is_none() {
        return not_found(started);
    }
    let body: Envelope<Foo> = Envelope {
        meta: meta(started),
        errors: Vec::new(),
        data: None,
    };
    (StatusCode::OK, Json(body)).into_response()
}
