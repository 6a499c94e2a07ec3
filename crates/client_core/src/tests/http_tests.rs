use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::error::ErrorCode;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    method: Method,
    path: String,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct BackendState {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl BackendState {
    async fn push(&self, method: Method, path: impl Into<String>, body: Option<Value>) {
        self.seen.lock().await.push(Seen {
            method,
            path: path.into(),
            body,
        });
    }
}

fn persona_json(id: i64) -> Value {
    json!({
        "id": id,
        "nombre": "Ana",
        "apellido": "Diaz",
        "dni": "123",
        "correo": "a@x.com",
        "telefono": "555",
        "estado": "activo"
    })
}

async fn list_personas(State(state): State<BackendState>) -> Json<Value> {
    state.push(Method::GET, "/personas", None).await;
    Json(json!([persona_json(3)]))
}

async fn create_persona(State(state): State<BackendState>, Json(body): Json<Value>) -> Json<Value> {
    state.push(Method::POST, "/personas", Some(body.clone())).await;
    let mut created = body;
    created["id"] = json!(7);
    Json(created)
}

async fn get_persona(State(state): State<BackendState>, Path(id): Path<i64>) -> Json<Value> {
    state.push(Method::GET, format!("/personas/{id}"), None).await;
    Json(persona_json(id))
}

async fn update_persona(
    State(state): State<BackendState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state
        .push(Method::PUT, format!("/personas/{id}"), Some(body.clone()))
        .await;
    Json(body)
}

async fn list_estudiantes(State(state): State<BackendState>) -> Json<Value> {
    state.push(Method::GET, "/estudiantes", None).await;
    Json(json!([{ "id": 40, "codigo": "S040", "persona": persona_json(3) }]))
}

async fn get_estudiante(State(state): State<BackendState>, Path(id): Path<i64>) -> Response {
    state.push(Method::GET, format!("/estudiantes/{id}"), None).await;
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": 404,
                "error": "Not Found",
                "message": "Estudiante no encontrado"
            })),
        )
            .into_response();
    }
    Json(json!({ "id": id, "codigo": "S040", "persona": persona_json(3) })).into_response()
}

async fn create_estudiante(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.push(Method::POST, "/estudiantes", Some(body)).await;
    StatusCode::CREATED
}

async fn update_estudiante(
    State(state): State<BackendState>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.push(Method::PUT, "/estudiantes", Some(body.clone())).await;
    Json(body)
}

async fn delete_estudiante(State(state): State<BackendState>, Path(id): Path<i64>) -> Response {
    state
        .push(Method::DELETE, format!("/estudiantes/{id}"), None)
        .await;
    if id == 500 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_backend() -> (HttpApiClient, BackendState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = BackendState::default();
    let app = Router::new()
        .route("/api/personas", get(list_personas).post(create_persona))
        .route("/api/personas/:id", get(get_persona).put(update_persona))
        .route(
            "/api/estudiantes",
            get(list_estudiantes)
                .post(create_estudiante)
                .put(update_estudiante),
        )
        .route(
            "/api/estudiantes/:id",
            get(get_estudiante).delete(delete_estudiante),
        )
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let client = HttpApiClient::new(format!("http://{addr}/api/")).expect("client");
    (client, state)
}

fn new_persona() -> Persona {
    Persona {
        id: None,
        nombre: "Ana".into(),
        apellido: "Diaz".into(),
        dni: "123".into(),
        correo: "a@x.com".into(),
        telefono: "555".into(),
        estado: "activo".into(),
    }
}

#[tokio::test]
async fn base_url_trailing_slash_is_trimmed() {
    let client = HttpApiClient::new("http://localhost:8080/api///").expect("client");
    assert_eq!(client.base_url(), "http://localhost:8080/api");
}

#[tokio::test]
async fn lists_decode_embedded_persona() {
    let (client, state) = spawn_backend().await;

    let estudiantes = client.list_estudiantes().await.expect("estudiantes");
    let personas = client.list_personas().await.expect("personas");

    assert_eq!(estudiantes.len(), 1);
    assert_eq!(estudiantes[0].id, Some(EstudianteId(40)));
    assert_eq!(estudiantes[0].persona.id, Some(PersonaId(3)));
    assert_eq!(personas[0].nombre, "Ana");
    assert_eq!(state.seen.lock().await.len(), 2);
}

#[tokio::test]
async fn create_persona_omits_missing_id() {
    let (client, state) = spawn_backend().await;

    let created = client.create_persona(&new_persona()).await.expect("create");

    assert_eq!(created.id, Some(PersonaId(7)));
    let seen = state.seen.lock().await;
    let body = seen[0].body.as_ref().expect("body");
    assert!(body.get("id").is_none());
    assert_eq!(body["dni"], "123");
}

#[tokio::test]
async fn update_persona_addresses_by_id() {
    let (client, state) = spawn_backend().await;
    let persona = Persona {
        id: Some(PersonaId(3)),
        ..new_persona()
    };

    let updated = client
        .update_persona(&persona, PersonaId(3))
        .await
        .expect("update");

    assert_eq!(updated, persona);
    let seen = state.seen.lock().await;
    assert_eq!(seen[0].method, Method::PUT);
    assert_eq!(seen[0].path, "/personas/3");
}

#[tokio::test]
async fn get_persona_by_id() {
    let (client, _state) = spawn_backend().await;

    let persona = client.get_persona(PersonaId(9)).await.expect("persona");

    assert_eq!(persona.id, Some(PersonaId(9)));
}

#[tokio::test]
async fn create_estudiante_with_empty_body_returns_submitted_record() {
    let (client, state) = spawn_backend().await;
    let estudiante = Estudiante {
        id: None,
        codigo: "S001".into(),
        persona: Persona {
            id: Some(PersonaId(7)),
            ..new_persona()
        },
    };

    let created = client
        .create_estudiante(&estudiante)
        .await
        .expect("create");

    assert_eq!(created, estudiante);
    let seen = state.seen.lock().await;
    let body = seen[0].body.as_ref().expect("body");
    assert_eq!(body["codigo"], "S001");
    assert_eq!(body["persona"]["id"], 7);
}

#[tokio::test]
async fn update_estudiante_puts_whole_record() {
    let (client, state) = spawn_backend().await;
    let estudiante = Estudiante {
        id: Some(EstudianteId(40)),
        codigo: "S040".into(),
        persona: Persona {
            id: Some(PersonaId(3)),
            ..new_persona()
        },
    };

    client
        .update_estudiante(&estudiante)
        .await
        .expect("update");

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].method, Method::PUT);
    assert_eq!(seen[0].path, "/estudiantes");
    assert_eq!(seen[0].body.as_ref().expect("body")["id"], 40);
}

#[tokio::test]
async fn not_found_carries_backend_message() {
    let (client, _state) = spawn_backend().await;

    let err = client
        .get_estudiante(EstudianteId(404))
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message().as_deref(), Some("Estudiante no encontrado"));
}

#[tokio::test]
async fn delete_succeeds_on_no_content() {
    let (client, state) = spawn_backend().await;

    client
        .delete_estudiante(EstudianteId(40))
        .await
        .expect("delete");

    let seen = state.seen.lock().await;
    assert_eq!(seen[0].method, Method::DELETE);
    assert_eq!(seen[0].path, "/estudiantes/40");
}

#[tokio::test]
async fn plain_text_error_has_no_user_message() {
    let (client, _state) = spawn_backend().await;

    let err = client
        .delete_estudiante(EstudianteId(500))
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), ErrorCode::Internal);
    assert_eq!(err.message(), None);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = HttpApiClient::new(format!("http://{addr}")).expect("client");

    let err = client.list_personas().await.expect_err("must fail");

    assert!(matches!(err, ServiceError::Transport(_)));
    assert_eq!(err.message(), None);
}
