use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use todolist::db::TodoStorage;
use tower::ServiceExt;

const COOKIE_SECRET: &str = "integration-test-cookie-secret-0123456789";

async fn test_app(tag: &str) -> (Router, TodoStorage, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "todolist-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let pool = todolist::db::connect(&database_url)
        .await
        .expect("failed to open test db");
    let storage = TodoStorage::new(pool);
    storage.init_schema().await.expect("failed to init schema");

    let state = todolist::router::AppState::new(storage.clone(), Some(COOKIE_SECRET), true);
    (todolist::router::todolist_router(state), storage, temp_path)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn session_cookies(resp: &axum::response::Response) -> String {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|s| s.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .expect("missing location header")
        .to_str()
        .expect("location header was not utf-8")
}

#[tokio::test]
async fn register_creates_user_and_authenticates_next_request() {
    let (app, storage, db_path) = test_app("register").await;

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Pw1!pass",
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/items");

    let cookie = session_cookies(&resp);
    assert!(!cookie.is_empty(), "registration must establish a session");

    let resp = app
        .clone()
        .oneshot(get("/items", Some(&cookie)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("a@x.com"));

    let user = storage
        .get_user_by_email("a@x.com")
        .await
        .expect("lookup failed")
        .expect("user row missing");
    assert_ne!(user.password_hash, "Pw1!pass", "password must be hashed");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn register_rejects_short_password_without_creating_a_user() {
    let (app, storage, db_path) = test_app("register-weak").await;

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Pw1!",
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Could not register"));

    let user = storage
        .get_user_by_email("a@x.com")
        .await
        .expect("lookup failed");
    assert!(user.is_none());

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (app, _storage, db_path) = test_app("register-dup").await;

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Pw1!pass",
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Other!pass",
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("Could not register"));

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_with_wrong_password_rerenders_form() {
    let (app, _storage, db_path) = test_app("login-wrong").await;

    app.clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Pw1!pass",
            None,
        ))
        .await
        .expect("request failed");

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/login",
            "email=a@x.com&password=wrong-password",
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        session_cookies(&resp).is_empty(),
        "failed login must not establish a session"
    );
    let body = body_string(resp).await;
    assert!(body.contains("Invalid email or password."));

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn login_with_correct_password_establishes_session() {
    let (app, _storage, db_path) = test_app("login-ok").await;

    app.clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Pw1!pass",
            None,
        ))
        .await
        .expect("request failed");

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/login",
            "email=a@x.com&password=Pw1!pass",
            None,
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/items");

    let cookie = session_cookies(&resp);
    let resp = app
        .clone()
        .oneshot(get("/items", Some(&cookie)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn logoff_clears_session_and_redirects() {
    let (app, _storage, db_path) = test_app("logoff").await;

    let resp = app
        .clone()
        .oneshot(post_form(
            "/account/register",
            "email=a@x.com&password=Pw1!pass",
            None,
        ))
        .await
        .expect("request failed");
    let cookie = session_cookies(&resp);

    let resp = app
        .clone()
        .oneshot(post_form("/account/logoff", "", Some(&cookie)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/items");

    // The logoff response replaces the session cookie with a removal;
    // carrying that forward must no longer authenticate.
    let cleared = session_cookies(&resp);
    let resp = app
        .clone()
        .oneshot(get("/items", Some(&cleared)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/account/login");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn logoff_without_session_still_redirects() {
    let (app, _storage, db_path) = test_app("logoff-anon").await;

    let resp = app
        .clone()
        .oneshot(post_form("/account/logoff", "", None))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/items");

    let _ = fs::remove_file(&db_path);
}

#[tokio::test]
async fn unauthenticated_item_routes_redirect_to_login() {
    let (app, _storage, db_path) = test_app("anon").await;

    for uri in ["/items", "/items/create", "/items/details/1", "/categories"] {
        let resp = app
            .clone()
            .oneshot(get(uri, None))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "uri: {uri}");
        assert_eq!(location(&resp), "/account/login", "uri: {uri}");
    }

    let _ = fs::remove_file(&db_path);
}
