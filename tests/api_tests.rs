use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::json;
use uuid::Uuid;

use pantry_api::{
    db::{accounts, AccountStore, SessionStore},
    error::{AppError, AppResult},
    models::{Account, NewAccount, Recipe},
    routes::create_router,
    services::{Matcher, NarrationProvider, Narrator},
    state::AppState,
};

/// Account store backed by a mutex-guarded vec, mirroring the Postgres
/// store's duplicate and credential semantics.
#[derive(Default)]
struct MemoryAccountStore {
    rows: Mutex<Vec<Account>>,
}

#[async_trait::async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, new: NewAccount) -> AppResult<Account> {
        let mut rows = self.rows.lock().unwrap();
        let duplicate = rows.iter().any(|a| {
            a.email == new.email
                || (a.username.is_some() && a.username == new.username)
        });
        if duplicate {
            return Err(AppError::DuplicateAccount);
        }

        let account = Account {
            id: Uuid::new_v4(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            username: new.username,
            password_hash: accounts::hash_password(&new.password)?,
            created_at: chrono::Utc::now(),
        };
        rows.push(account.clone());
        Ok(account)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account> {
        let rows = self.rows.lock().unwrap();
        let account = rows
            .iter()
            .find(|a| a.username.as_deref() == Some(username))
            .cloned();
        drop(rows);

        match account {
            Some(account) if accounts::verify_password(password, &account.password_hash) => {
                Ok(account)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }
}

#[derive(Default)]
struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Uuid>>,
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, account_id: Uuid) -> AppResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(token.clone(), account_id);
        Ok(token)
    }

    async fn get(&self, token: &str) -> AppResult<Option<Uuid>> {
        Ok(self.sessions.lock().unwrap().get(token).copied())
    }

    async fn clear(&self, token: &str) -> AppResult<()> {
        self.sessions.lock().unwrap().remove(token);
        Ok(())
    }
}

/// Narration backend that produces silence and never fails
struct StubTts;

#[async_trait::async_trait]
impl NarrationProvider for StubTts {
    async fn synthesize(&self, _text: &str) -> AppResult<Vec<u8>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            name: "pasta".to_string(),
            ingredients: "tomato, garlic, pasta".to_string(),
            steps: "Boil pasta, make sauce, combine.".to_string(),
        },
        Recipe {
            name: "salad".to_string(),
            ingredients: "lettuce, tomato".to_string(),
            steps: "Chop and toss.".to_string(),
        },
    ]
}

fn create_test_server() -> TestServer {
    let narrator = Narrator::new(Arc::new(StubTts), std::env::temp_dir());
    let state = AppState::new(
        Arc::new(Matcher::new(sample_recipes())),
        Arc::new(MemoryAccountStore::default()),
        Arc::new(MemorySessionStore::default()),
        narrator,
    );
    TestServer::new(create_router(state)).unwrap()
}

fn session_cookie(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session_id=") && !v.starts_with("session_id=;"))
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

fn cookie_header(cookie: &str) -> HeaderValue {
    HeaderValue::from_str(cookie).unwrap()
}

async fn signup(server: &TestServer, username: &str, email: &str) -> TestResponse {
    server
        .post("/signup")
        .form(&json!({
            "name": "Ada",
            "phone": "5550100",
            "email": email,
            "username": username,
            "password": "hunter2",
        }))
        .await
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_index_redirects_without_session() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/signup");
}

#[tokio::test]
async fn test_signup_logs_in_and_index_renders() {
    let server = create_test_server();

    let response = signup(&server, "ada", "ada@example.com").await;
    response.assert_status(StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response).expect("signup should set a session cookie");

    let response = server
        .get("/")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("pantry"));
}

#[tokio::test]
async fn test_signup_rejects_duplicate_username_with_new_email() {
    let server = create_test_server();
    signup(&server, "ada", "ada@example.com").await;

    let response = signup(&server, "ada", "other@example.com").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/signup");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email_with_new_username() {
    let server = create_test_server();
    signup(&server, "ada", "ada@example.com").await;

    let response = signup(&server, "grace", "ada@example.com").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/signup");
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_login_wrong_password_and_wrong_username_look_identical() {
    let server = create_test_server();
    signup(&server, "ada", "ada@example.com").await;

    let wrong_password = server
        .post("/login")
        .form(&json!({ "username": "ada", "password": "wrong" }))
        .await;
    let wrong_username = server
        .post("/login")
        .form(&json!({ "username": "nobody", "password": "hunter2" }))
        .await;

    // Same redirect target and same flash cookie, so the client cannot tell
    // which field was wrong.
    wrong_password.assert_status(StatusCode::SEE_OTHER);
    wrong_username.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        wrong_password.headers().get(header::LOCATION).unwrap(),
        "/login"
    );
    assert_eq!(
        wrong_password.headers().get(header::SET_COOKIE).unwrap(),
        wrong_username.headers().get(header::SET_COOKIE).unwrap()
    );
}

#[tokio::test]
async fn test_login_with_active_session_redirects_to_dashboard() {
    let server = create_test_server();
    let response = signup(&server, "ada", "ada@example.com").await;
    let cookie = session_cookie(&response).unwrap();

    // GET and POST both short-circuit to the dashboard; credentials in the
    // POST body are never checked, even wrong ones.
    let get = server
        .get("/login")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    get.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(get.headers().get(header::LOCATION).unwrap(), "/dashboard");

    let post = server
        .post("/login")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .form(&json!({ "username": "ada", "password": "wrong" }))
        .await;
    post.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(post.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[tokio::test]
async fn test_signup_allows_multiple_blank_usernames() {
    let server = create_test_server();

    let first = server
        .post("/signup")
        .form(&json!({
            "name": "Ada",
            "phone": "5550100",
            "email": "ada@example.com",
            "username": "",
            "password": "hunter2",
        }))
        .await;
    first.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(first.headers().get(header::LOCATION).unwrap(), "/");

    // Blank usernames are stored as absent, so they never collide.
    let second = server
        .post("/signup")
        .form(&json!({
            "name": "Grace",
            "phone": "5550101",
            "email": "grace@example.com",
            "username": "",
            "password": "hunter2",
        }))
        .await;
    second.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(second.headers().get(header::LOCATION).unwrap(), "/");
    assert!(session_cookie(&second).is_some());
}

#[tokio::test]
async fn test_login_success_reaches_dashboard() {
    let server = create_test_server();
    signup(&server, "ada", "ada@example.com").await;

    let response = server
        .post("/login")
        .form(&json!({ "username": "ada", "password": "hunter2" }))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response).expect("login should set a session cookie");

    let response = server
        .get("/dashboard")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("Ada"));
    assert!(body.contains("ada@example.com"));
}

#[tokio::test]
async fn test_dashboard_without_session_redirects_to_login() {
    let server = create_test_server();
    let response = server.get("/dashboard").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let server = create_test_server();
    let response = signup(&server, "ada", "ada@example.com").await;
    let cookie = session_cookie(&response).unwrap();

    let response = server
        .post("/logout")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/signup");

    // The old token no longer resolves.
    let response = server
        .get("/dashboard")
        .add_header(header::COOKIE, cookie_header(&cookie))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_recommendation_returns_best_match_html() {
    let server = create_test_server();
    let response = server
        .get("/recommendation")
        .add_query_param("ingredients", "tomato, pasta")
        .await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("pasta"));
    assert!(body.contains("Boil pasta"));
}

#[tokio::test]
async fn test_recommendation_empty_query_is_400_json() {
    let server = create_test_server();
    let response = server
        .get("/recommendation")
        .add_query_param("ingredients", "  ,  ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("ingredients"));
}

#[tokio::test]
async fn test_recommendation_missing_param_is_400_json() {
    let server = create_test_server();
    let response = server.get("/recommendation").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendation_no_overlap_is_404_json() {
    let server = create_test_server();
    let response = server
        .get("/recommendation")
        .add_query_param("ingredients", "chocolate")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No matching recipe"));
}

#[tokio::test]
async fn test_about_is_public() {
    let server = create_test_server();
    let response = server.get("/about").await;
    response.assert_status_ok();
    assert!(response.text().contains("About"));
}
