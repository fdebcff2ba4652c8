//! End-to-end tests for the HTTP surface
//!
//! Each test starts the router on an ephemeral port backed by the in-memory
//! repository (or a stub service) and talks to it over real HTTP.

use std::sync::Arc;

use account::{
    AppState,
    error::{AccountError, AccountResult},
    jwt::{JwtConfig, JwtService},
    repositories::InMemoryUserRepository,
    routes::{self, LoginResponse, MessageResponse},
    service::{AccountService, UserAccountService},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tokio::net::TcpListener;

const SECRET: &str = "http-test-secret";

fn jwt() -> JwtService {
    JwtService::new(&JwtConfig::new(SECRET)).unwrap()
}

async fn spawn_app(account_service: Arc<dyn AccountService>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = routes::create_router(AppState::new(account_service));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", address)
}

async fn spawn_in_memory_app() -> String {
    let repository = Arc::new(InMemoryUserRepository::new());
    spawn_app(Arc::new(UserAccountService::new(repository, jwt()))).await
}

async fn message_of(response: reqwest::Response) -> String {
    response.json::<MessageResponse>().await.unwrap().message
}

/// Service whose every call fails with a storage error
struct BrokenStorageService;

#[async_trait]
impl AccountService for BrokenStorageService {
    async fn register(&self, _username: &str, _password: &str) -> AccountResult<()> {
        Err(AccountError::unexpected("connection refused"))
    }

    async fn login(&self, _username: &str, _password: &str) -> AccountResult<String> {
        Err(AccountError::unexpected("connection refused"))
    }

    async fn reset_password(&self, _user_id: &str, _new_password: &str) -> AccountResult<()> {
        Err(AccountError::unexpected("connection refused"))
    }

    async fn delete_user(&self, _user_id: &str) -> AccountResult<()> {
        Err(AccountError::unexpected("connection refused"))
    }
}

#[tokio::test]
async fn test_health_check() {
    let base = spawn_in_memory_app().await;

    let response = Client::new()
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_responses() {
    let base = spawn_in_memory_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({ "username": "admin", "password": "admin01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(message_of(response).await, "register success");

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({ "username": "admin", "password": "admin01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "username is exists");

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({ "username": "admin", "password": "123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        message_of(response).await,
        "password must be between 6-16 characters"
    );

    let response = client
        .post(format!("{base}/register"))
        .json(&json!({ "password": "admin01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "username not found");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let base = spawn_in_memory_app().await;

    let response = Client::new()
        .post(format!("{base}/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_responses() {
    let base = spawn_in_memory_app().await;
    let client = Client::new();

    client
        .post(format!("{base}/register"))
        .json(&json!({ "username": "admin", "password": "admin01" }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({ "username": "admin", "password": "wrongpass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message_of(response).await, "unauthorized");

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({ "username": "nobody", "password": "admin01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message_of(response).await, "username is not exists");

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({ "username": "admin", "password": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "password not found");

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({ "username": "admin", "password": "admin01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: LoginResponse = response.json().await.unwrap();
    assert_eq!(body.message, "login success");
    let verified = jwt().verify(&body.token).unwrap();
    assert_eq!(verified.username, "admin");
}

#[tokio::test]
async fn test_reset_password_and_delete_flow() {
    let base = spawn_in_memory_app().await;
    let client = Client::new();

    client
        .post(format!("{base}/register"))
        .json(&json!({ "username": "admin", "password": "admin01" }))
        .send()
        .await
        .unwrap();
    let login: LoginResponse = client
        .post(format!("{base}/login"))
        .json(&json!({ "username": "admin", "password": "admin01" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user_id = jwt().verify(&login.token).unwrap().user_id;

    let response = client
        .put(format!("{base}/resetpassword/not-a-uuid"))
        .json(&json!({ "password": "newpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "user_id incorrect format");

    let response = client
        .put(format!(
            "{base}/resetpassword/8f14e45f-ceea-467e-a8b4-5e2f0f7f0b3c"
        ))
        .json(&json!({ "password": "newpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "user_id is not exists");

    let response = client
        .put(format!("{base}/resetpassword/{user_id}"))
        .json(&json!({ "password": "newpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message_of(response).await, "reset password success");

    let response = client
        .post(format!("{base}/login"))
        .json(&json!({ "username": "admin", "password": "newpass1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete(format!("{base}/delete/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "user_id incorrect format");

    let response = client
        .delete(format!("{base}/delete/{user_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(message_of(response).await, "delete user success");

    let response = client
        .delete(format!("{base}/delete/{user_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(response).await, "user_id is not exists");
}

#[tokio::test]
async fn test_storage_failures_do_not_leak() {
    let base = spawn_app(Arc::new(BrokenStorageService)).await;
    let client = Client::new();

    let responses = [
        client
            .post(format!("{base}/register"))
            .json(&json!({ "username": "admin", "password": "admin01" }))
            .send()
            .await
            .unwrap(),
        client
            .post(format!("{base}/login"))
            .json(&json!({ "username": "admin", "password": "admin01" }))
            .send()
            .await
            .unwrap(),
        client
            .put(format!(
                "{base}/resetpassword/225cfc88-c66b-4f2f-b424-a3b74e3b1191"
            ))
            .json(&json!({ "password": "admin01" }))
            .send()
            .await
            .unwrap(),
        client
            .delete(format!(
                "{base}/delete/225cfc88-c66b-4f2f-b424-a3b74e3b1191"
            ))
            .send()
            .await
            .unwrap(),
    ];

    for response in responses {
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_of(response).await, "unexpected");
    }
}
