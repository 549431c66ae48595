use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use stockroom_application::{
    AccessGateway, AccountRecord, AccountService, PasswordHasher, RolePolicy, TaskService,
};
use stockroom_core::Role;
use stockroom_domain::stock_catalog;
use stockroom_infrastructure::{
    Argon2PasswordHasher, InMemoryRecordStore, JsonFileAccountRepository, JsonFileTaskRepository,
};
use tower::ServiceExt;

use super::build_router;
use crate::auth::TokenIssuer;
use crate::state::AppState;

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const PASSWORD: &str = "warehouse-key";

fn test_router() -> Router {
    let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());
    let policy = Arc::new(RolePolicy::stock_defaults(&catalog));
    let hasher = Argon2PasswordHasher::new();
    let password_hash = hasher.hash_password(PASSWORD).unwrap_or_default();

    let account = |username: &str, roles: Vec<Role>| AccountRecord {
        username: username.to_owned(),
        password_hash: password_hash.clone(),
        roles,
        is_superuser: false,
    };
    let accounts = JsonFileAccountRepository::new(vec![
        account("ana", vec![Role::Admin]),
        account("maria", vec![Role::User]),
        account("guest", Vec::new()),
    ]);

    let tasks_file = std::env::temp_dir().join(format!(
        "stockroom-router-tasks-{}-{}.json",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));

    let state = AppState {
        gateway: AccessGateway::new(
            Arc::new(catalog),
            Arc::new(InMemoryRecordStore::new()),
            policy.clone(),
        ),
        task_service: TaskService::new(Arc::new(JsonFileTaskRepository::new(tasks_file)), policy),
        account_service: AccountService::new(Arc::new(accounts), Arc::new(hasher)),
        token_issuer: Arc::new(TokenIssuer::new(SECRET, 300, 3600)),
        postgres_pool: None,
    };

    build_router(state, "http://localhost:3000").unwrap_or_else(|_| unreachable!())
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|_| unreachable!());

    let response = router
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|_| unreachable!());
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, payload)
}

async fn login(router: &Router, username: &str) -> Value {
    let (status, payload) = send(
        router,
        "POST",
        "/api/token",
        None,
        Some(json!({"username": username, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    payload
}

async fn access_token(router: &Router, username: &str) -> String {
    login(router, username).await["access"]
        .as_str()
        .unwrap_or_default()
        .to_owned()
}

#[tokio::test]
async fn health_is_public() {
    let router = test_router();

    let (status, payload) = send(&router, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["store"]["status"], "memory");
}

#[tokio::test]
async fn records_require_a_bearer_token() {
    let router = test_router();

    let (missing, _) = send(&router, "GET", "/api/records/uom", None, None).await;
    let (garbage, _) = send(&router, "GET", "/api/records/uom", Some("nope"), None).await;

    assert_eq!(missing, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let router = test_router();

    let (status, _) = send(
        &router,
        "POST",
        "/api/token",
        None,
        Some(json!({"username": "ana", "password": "guess"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_creates_and_user_only_reads() {
    let router = test_router();
    let admin = access_token(&router, "ana").await;
    let user = access_token(&router, "maria").await;

    let (created, record) = send(
        &router,
        "POST",
        "/api/records/uom",
        Some(&admin),
        Some(json!({"data": {"name": "Box", "status": "Active"}})),
    )
    .await;
    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(record["id"], 1);
    assert_eq!(record["fields"]["name"], "Box");

    let (denied, _) = send(
        &router,
        "POST",
        "/api/records/uom",
        Some(&user),
        Some(json!({"data": {"name": "Crate"}})),
    )
    .await;
    assert_eq!(denied, StatusCode::FORBIDDEN);

    let (listed, records) = send(&router, "GET", "/api/records/uom", Some(&user), None).await;
    assert_eq!(listed, StatusCode::OK);
    assert_eq!(records.as_array().map(Vec::len), Some(1));

    let (missing, _) = send(&router, "DELETE", "/api/records/uom/9", Some(&user), None).await;
    assert_eq!(missing, StatusCode::NOT_FOUND);

    let (deleted, _) = send(&router, "DELETE", "/api/records/uom/1", Some(&admin), None).await;
    assert_eq!(deleted, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn invalid_forms_report_every_field() {
    let router = test_router();
    let admin = access_token(&router, "ana").await;

    let (status, payload) = send(
        &router,
        "POST",
        "/api/records/item",
        Some(&admin),
        Some(json!({"data": {"category": 4}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["code", "category", "uom"] {
        assert!(payload["field_errors"][field].is_string(), "{field} missing");
    }
}

#[tokio::test]
async fn refresh_token_yields_a_working_access_token() {
    let router = test_router();
    let pair = login(&router, "maria").await;
    let refresh = pair["refresh"].as_str().unwrap_or_default();

    let (as_access, _) = send(&router, "GET", "/api/record-types", Some(refresh), None).await;
    assert_eq!(as_access, StatusCode::UNAUTHORIZED);

    let (status, payload) = send(
        &router,
        "POST",
        "/api/token/refresh",
        None,
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let access = payload["access"].as_str().unwrap_or_default();
    let (listed, types) = send(&router, "GET", "/api/record-types", Some(access), None).await;
    assert_eq!(listed, StatusCode::OK);
    assert_eq!(types[0]["capabilities"]["can_view"], true);
    assert_eq!(types[0]["capabilities"]["can_add"], false);
    assert_eq!(types[0]["table_name"], "stock_items_uom");
    assert_eq!(types[0]["search_fields"], json!(["name"]));
}

#[tokio::test]
async fn record_lists_accept_status_search_and_paging() {
    let router = test_router();
    let admin = access_token(&router, "ana").await;
    let user = access_token(&router, "maria").await;

    for (name, status) in [("Box", "Active"), ("Crate", "Inactive"), ("Big box", "Active")] {
        let (created, _) = send(
            &router,
            "POST",
            "/api/records/uom",
            Some(&admin),
            Some(json!({"data": {"name": name, "status": status}})),
        )
        .await;
        assert_eq!(created, StatusCode::CREATED);
    }
    let names = |records: &Value| -> Vec<String> {
        records
            .as_array()
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row["fields"]["name"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    };

    let (status, searched) = send(
        &router,
        "GET",
        "/api/records/uom?search=BOX",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&searched), vec!["Box", "Big box"]);

    let (_, inactive) = send(
        &router,
        "GET",
        "/api/records/uom?status=Inactive",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(names(&inactive), vec!["Crate"]);

    let (_, page) = send(
        &router,
        "GET",
        "/api/records/uom?limit=1&offset=2",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(names(&page), vec!["Big box"]);

    let (bad_status, _) = send(
        &router,
        "GET",
        "/api/records/uom?status=Archived",
        Some(&user),
        None,
    )
    .await;
    let (bad_limit, _) = send(&router, "GET", "/api/records/uom?limit=0", Some(&user), None).await;
    assert_eq!(bad_status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_limit, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn any_authenticated_caller_views_tasks() {
    let router = test_router();
    let guest = access_token(&router, "guest").await;

    let (listed, tasks) = send(&router, "GET", "/api/tasks", Some(&guest), None).await;
    let (denied, _) = send(
        &router,
        "POST",
        "/api/tasks",
        Some(&guest),
        Some(json!({"task": "count pallets"})),
    )
    .await;

    assert_eq!(listed, StatusCode::OK);
    assert_eq!(tasks, json!([]));
    assert_eq!(denied, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_tasks() {
    let router = test_router();
    let admin = access_token(&router, "ana").await;

    let (created, task) = send(
        &router,
        "POST",
        "/api/tasks",
        Some(&admin),
        Some(json!({"task": "count pallets"})),
    )
    .await;
    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(task["id"], 1);

    let (updated, task) = send(
        &router,
        "PUT",
        "/api/tasks/1",
        Some(&admin),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(updated, StatusCode::OK);
    assert_eq!(task["completed"], true);
    assert_eq!(task["task"], "count pallets");

    let (deleted, _) = send(&router, "DELETE", "/api/tasks/1", Some(&admin), None).await;
    assert_eq!(deleted, StatusCode::NO_CONTENT);
}
