//! REST client against a local mock of the messaging-platform API.
#![allow(clippy::panic)]

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use serde_json::{Value, json};

use messaging_manager::api::ApiClient;
use messaging_manager::api::dto::{CreateInstanceRequest, ProxyConfig, WebhookConfig};
use messaging_manager::app_state::AppState;
use messaging_manager::config::ManagerConfig;
use messaging_manager::domain::NoticeBus;
use messaging_manager::error::ManagerError;
use messaging_manager::service::{FailureNotifier, REQUEST_FAILED_KEY};

const API_KEY: &str = "secret";
const TIMEOUT: Duration = Duration::from_secs(5);

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(API_KEY)
}

async fn root(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response();
    }
    Json(json!({
        "status": 200,
        "message": "Welcome",
        "version": "2.1.0",
        "clientName": "main"
    }))
    .into_response()
}

async fn fetch_instances(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!([
        {"name": "alpha", "connectionStatus": "open"},
        {"name": "beta", "connectionStatus": "close"}
    ]))
    .into_response()
}

async fn create_instance(Json(body): Json<Value>) -> Response {
    let name = body
        .pointer("/instanceName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if name == "alpha" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"response": {"message": ["name already in use"]}})),
        )
            .into_response();
    }
    Json(json!({
        "instance": {"instanceName": name, "status": "created"},
        "hash": "token-1"
    }))
    .into_response()
}

async fn delete_instance(Path(name): Path<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": 404,
            "error": "Not Found",
            "response": {"message": [format!("The \"{name}\" instance does not exist")]}
        })),
    )
        .into_response()
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn serve() -> String {
    let app = Router::new()
        .route("/", get(root))
        .route("/instance/fetchInstances", get(fetch_instances))
        .route("/instance/create", post(create_instance))
        .route("/instance/delete/{name}", delete(delete_instance))
        .route("/instance/connectionState/{name}", get(broken));

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn client(base: &str, key: Option<&str>) -> ApiClient {
    let Ok(client) = ApiClient::new(base, key.map(str::to_string), TIMEOUT) else {
        panic!("client builds");
    };
    client
}

#[tokio::test]
async fn authenticated_calls_decode_responses() {
    let base = serve().await;
    let api = client(&base, Some(API_KEY));

    let Ok(info) = api.server_info().await else {
        panic!("server info");
    };
    assert_eq!(info.version.as_deref(), Some("2.1.0"));
    assert_eq!(info.client_name.as_deref(), Some("main"));

    let instances = api.fetch_instances().await.unwrap_or_default();
    let names: Vec<&str> = instances.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta"]);

    let Ok(created) = api.create_instance(&CreateInstanceRequest::new("gamma")).await else {
        panic!("create instance");
    };
    assert_eq!(created.instance.instance_name, "gamma");
    assert_eq!(created.hash, json!("token-1"));
}

#[tokio::test]
async fn rejected_key_is_unauthorized() {
    let base = serve().await;

    let result = client(&base, Some("wrong")).server_info().await;
    assert!(matches!(result, Err(ManagerError::Unauthorized)));

    let result = client(&base, None).fetch_instances().await;
    assert!(matches!(result, Err(ManagerError::Unauthorized)));

    // 403 is treated the same way.
    let result = client(&base, Some(API_KEY))
        .create_instance(&CreateInstanceRequest::new("alpha"))
        .await;
    assert!(matches!(result, Err(ManagerError::Unauthorized)));
}

#[tokio::test]
async fn error_bodies_become_messages() {
    let base = serve().await;
    let api = client(&base, Some(API_KEY));

    let Err(ManagerError::Api { status, message }) = api.delete_instance("ghost").await else {
        panic!("expected api error");
    };
    assert_eq!(status, 404);
    assert_eq!(message, "The \"ghost\" instance does not exist");

    let Err(ManagerError::Api { status, message }) = api.connection_state("alpha").await else {
        panic!("expected api error");
    };
    assert_eq!(status, 500);
    assert_eq!(message, "boom");
}

#[tokio::test]
async fn invalid_input_is_rejected_locally() {
    // Nothing listens on port 9; a request reaching the network would fail
    // with a transport error instead.
    let api = client("http://127.0.0.1:9", Some(API_KEY));

    let result = api.create_instance(&CreateInstanceRequest::new("  ")).await;
    assert!(matches!(result, Err(ManagerError::Validation(_))));

    let webhook = WebhookConfig {
        enabled: true,
        url: "not a url".to_string(),
        ..WebhookConfig::default()
    };
    let result = api.set_webhook("alpha", &webhook).await;
    assert!(matches!(result, Err(ManagerError::Validation(_))));

    let proxy = ProxyConfig {
        enabled: true,
        host: "proxy.local".to_string(),
        port: "0".to_string(),
        ..ProxyConfig::default()
    };
    let result = api.set_proxy("alpha", &proxy).await;
    assert!(matches!(result, Err(ManagerError::Validation(_))));
}

#[tokio::test]
async fn repeated_failures_raise_one_notice() {
    let base = serve().await;
    let bus = NoticeBus::new(16);
    let mut notices = bus.subscribe();
    let notifier = FailureNotifier::new(3, bus);
    let api = client(&base, Some(API_KEY)).with_notifier(notifier.clone());

    for _ in 0..5 {
        let _ = api.connection_state("alpha").await;
    }
    let Ok(notice) = notices.try_recv() else {
        panic!("expected one notice");
    };
    assert_eq!(notice.key, REQUEST_FAILED_KEY);
    assert!(notices.try_recv().is_err());
    assert!(notifier.is_outstanding());

    // Success resets the count but keeps the notice until dismissed.
    assert!(api.server_info().await.is_ok());
    assert_eq!(notifier.consecutive_failures(), 0);
    assert!(notifier.is_outstanding());

    notifier.dismiss();
    for _ in 0..3 {
        let _ = api.connection_state("alpha").await;
    }
    assert!(notices.try_recv().is_ok());
}

#[tokio::test]
async fn login_stores_session() {
    let base = serve().await;
    let config = ManagerConfig {
        api_url: base.clone(),
        ..ManagerConfig::default()
    };
    let Ok(state) = AppState::build(config) else {
        panic!("state builds");
    };
    assert!(!state.session.is_authenticated());

    let result = state.login(&base, "wrong").await;
    assert!(matches!(result, Err(ManagerError::Unauthorized)));
    assert!(!state.session.is_authenticated());

    let Ok((logged_in, info)) = state.login(&base, API_KEY).await else {
        panic!("login succeeds");
    };
    assert_eq!(info.version.as_deref(), Some("2.1.0"));
    assert!(state.session.is_authenticated());
    assert_eq!(state.session.api_url().as_deref(), Some(base.as_str()));
    assert!(logged_in.api.has_api_key());
    assert!(!state.api.has_api_key());
    assert_eq!(logged_in.api.base_url(), state.api.base_url());
    assert_eq!(logged_in.api.fetch_instances().await.unwrap_or_default().len(), 2);

    assert!(logged_in.logout().is_ok());
    assert!(!state.session.is_authenticated());
}
