use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sqlx::Row;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_register_with_valid_inputs_creates_user_and_logs_in() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool.clone()).await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=alice&email=alice@example.com&first_name=Alice&last_name=Liddell\
                     &password=password123&password_confirm=password123",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");

    // Registration logs the new account straight in
    let cookies: Vec<&str> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("auth_token=")));

    let user = sqlx::query("SELECT username, email FROM users WHERE username = 'alice'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(user.get::<String, _>("email"), "alice@example.com");
}

#[tokio::test]
async fn test_register_with_duplicate_username_returns_field_error() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool.clone()).await;

    common::create_user(&pool, "alice", "alice@example.com", "password123").await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=alice&email=other@example.com\
                     &password=password123&password_confirm=password123",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("A user with that username already exists"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "the account must not be created");
}

#[tokio::test]
async fn test_register_with_duplicate_email_returns_field_error() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool.clone()).await;

    common::create_user(&pool, "alice", "alice@example.com", "password123").await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=bob&email=alice@example.com\
                     &password=password123&password_confirm=password123",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("A user with that email already exists"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_register_with_short_password_returns_error() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool).await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "username=alice&email=alice@example.com\
                     &password=short&password_confirm=short",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("at least 8 characters"));
}

#[tokio::test]
async fn test_login_with_valid_credentials_sets_session_cookie() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool.clone()).await;

    common::create_user(&pool, "alice", "alice@example.com", "password123").await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("username=alice&password=password123"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");

    let cookies: Vec<&str> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("auth_token=")));
}

#[tokio::test]
async fn test_login_with_wrong_password_shows_error() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool.clone()).await;

    common::create_user(&pool, "alice", "alice@example.com", "password123").await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("username=alice&password=wrongpassword"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_login_with_unknown_user_shows_same_error() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool).await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("username=nobody&password=password123"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_str = String::from_utf8(body.to_vec()).unwrap();
    assert!(body_str.contains("Invalid username or password"));
}

#[tokio::test]
async fn test_protected_routes_redirect_unauthenticated_to_login() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool).await;

    for uri in ["/tasks/2024/6/15", "/profile"] {
        let response = test_app
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(response.headers().get("location").unwrap(), "/login");
    }
}

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool.clone()).await;

    let user_id = common::create_user(&pool, "alice", "alice@example.com", "password123").await;

    let response = test_app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header("cookie", common::auth_cookie_for(&user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");

    let cookies: Vec<&str> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("auth_token=") && c.contains("Max-Age=0")),
        "session cookie should be removed: {cookies:?}"
    );
}

#[tokio::test]
async fn test_health_and_ready_endpoints() {
    let pool = common::setup_test_db().await;
    let test_app = common::create_test_app(pool).await;

    for uri in ["/health", "/ready"] {
        let response = test_app
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}
