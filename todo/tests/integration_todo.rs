use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use todo::db::run_migrations;
use todo::models::Todo;
use tower::ServiceExt;

async fn test_app() -> (Router, SqlitePool) {
    // A single connection keeps the in-memory database alive for the test.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    (todo::build_app(pool.clone()), pool)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn all_todos(pool: &SqlitePool) -> Vec<Todo> {
    sqlx::query_as::<_, Todo>("SELECT * FROM todos ORDER BY id")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn create_with_only_title_sets_defaults() {
    let (app, pool) = test_app().await;

    let (status, _) = call(&app, post_form("/todos", "title=Buy+milk")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let todos = all_todos(&pool).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Buy milk");
    assert_eq!(todos[0].description, "");
    assert!(todos[0].due_date.is_none());
    assert!(!todos[0].is_resolved);

    let (status, body) = call(&app, get("/todos")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Buy milk"));
    assert!(body.contains("Not set"));
}

#[tokio::test]
async fn listing_is_most_recent_first() {
    let (app, _pool) = test_app().await;

    for title in ["First", "Second", "Third"] {
        let (status, _) = call(&app, post_form("/todos", &format!("title={title}"))).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    let (_, body) = call(&app, get("/todos")).await;
    let first = body.find("First").unwrap();
    let second = body.find("Second").unwrap();
    let third = body.find("Third").unwrap();
    assert!(third < second && second < first);
}

#[tokio::test]
async fn toggling_twice_restores_the_original_value() {
    let (app, pool) = test_app().await;
    call(&app, post_form("/todos", "title=Flip+me")).await;
    let id = all_todos(&pool).await[0].id;

    let (status, _) = call(&app, post_form(&format!("/todos/{id}/toggle"), "")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(all_todos(&pool).await[0].is_resolved);

    call(&app, post_form(&format!("/todos/{id}/toggle"), "")).await;
    assert!(!all_todos(&pool).await[0].is_resolved);
}

#[tokio::test]
async fn missing_ids_return_not_found() {
    let (app, _pool) = test_app().await;

    let (status, _) = call(&app, get("/todos/999/edit")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, post_form("/todos/999", "title=x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, post_form("/todos/999/delete", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, post_form("/todos/999/toggle", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_without_title_creates_nothing() {
    let (app, pool) = test_app().await;

    let (status, body) = call(&app, post_form("/todos", "description=No+title")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Title is required"));
    assert!(all_todos(&pool).await.is_empty());
}

#[tokio::test]
async fn empty_list_says_no_todos_yet() {
    let (app, _pool) = test_app().await;
    let (status, body) = call(&app, get("/todos")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No todos yet"));
}

#[tokio::test]
async fn update_then_delete_workflow() {
    let (app, pool) = test_app().await;
    call(&app, post_form("/todos", "title=Original")).await;
    let id = all_todos(&pool).await[0].id;

    let (status, _) = call(
        &app,
        post_form(
            &format!("/todos/{id}"),
            "title=Updated&description=Now+with+details&due_date=2026-09-01&is_resolved=on",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let updated = &all_todos(&pool).await[0];
    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.description, "Now with details");
    assert_eq!(updated.due_date.unwrap().to_string(), "2026-09-01");
    assert!(updated.is_resolved);

    let (status, body) = call(&app, get(&format!("/todos/{id}/delete"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Are you sure"));

    let (status, _) = call(&app, post_form(&format!("/todos/{id}/delete"), "")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(all_todos(&pool).await.is_empty());

    let (_, body) = call(&app, get("/todos")).await;
    assert!(body.contains("No todos yet"));
}
