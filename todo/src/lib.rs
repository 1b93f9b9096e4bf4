pub mod db;
pub mod models;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use html_escape::{encode_double_quoted_attribute, encode_text};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::models::{Todo, TodoForm};

pub fn build_app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/todos") }))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/new", get(new_todo_form))
        .route("/todos/:id", post(update_todo))
        .route("/todos/:id/edit", get(edit_todo_form))
        .route("/todos/:id/delete", get(confirm_delete).post(delete_todo))
        .route("/todos/:id/toggle", post(toggle_todo))
        .with_state(pool)
        .layer(TraceLayer::new_for_http())
}

type HandlerError = (StatusCode, String);

fn internal_error<E: std::fmt::Display>(err: E) -> HandlerError {
    tracing::error!(%err, "database error");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}

fn not_found() -> HandlerError {
    (StatusCode::NOT_FOUND, "todo not found".into())
}

async fn fetch_todo(pool: &SqlitePool, id: i64) -> Result<Todo, HandlerError> {
    sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(internal_error)?
        .ok_or_else(not_found)
}

async fn list_todos(State(pool): State<SqlitePool>) -> Result<Html<String>, HandlerError> {
    let todos = sqlx::query_as::<_, Todo>(
        "SELECT * FROM todos ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(&pool)
    .await
    .map_err(internal_error)?;
    Ok(Html(render_list(&todos)))
}

async fn new_todo_form() -> Html<String> {
    Html(render_form(
        "Create New Todo",
        "/todos",
        None,
        None,
    ))
}

async fn create_todo(
    State(pool): State<SqlitePool>,
    Form(form): Form<TodoForm>,
) -> Result<Response, HandlerError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Ok(Html(render_form(
            "Create New Todo",
            "/todos",
            None,
            Some("Title is required"),
        ))
        .into_response());
    }
    let due_date = match form.parsed_due_date() {
        Ok(d) => d,
        Err(_) => {
            return Ok(Html(render_form(
                "Create New Todo",
                "/todos",
                None,
                Some("Due date must be YYYY-MM-DD"),
            ))
            .into_response())
        }
    };

    sqlx::query(
        "INSERT INTO todos (title, description, due_date, is_resolved, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(&form.description)
    .bind(due_date)
    .bind(form.resolved())
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .map_err(internal_error)?;

    Ok(Redirect::to("/todos").into_response())
}

async fn edit_todo_form(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Html<String>, HandlerError> {
    let todo = fetch_todo(&pool, id).await?;
    Ok(Html(render_form(
        "Edit Todo",
        &format!("/todos/{id}"),
        Some(&todo),
        None,
    )))
}

async fn update_todo(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Form(form): Form<TodoForm>,
) -> Result<Response, HandlerError> {
    let todo = fetch_todo(&pool, id).await?;

    let title = form.title.trim();
    if title.is_empty() {
        return Ok(Html(render_form(
            "Edit Todo",
            &format!("/todos/{id}"),
            Some(&todo),
            Some("Title is required"),
        ))
        .into_response());
    }
    let due_date = match form.parsed_due_date() {
        Ok(d) => d,
        Err(_) => {
            return Ok(Html(render_form(
                "Edit Todo",
                &format!("/todos/{id}"),
                Some(&todo),
                Some("Due date must be YYYY-MM-DD"),
            ))
            .into_response())
        }
    };

    sqlx::query(
        "UPDATE todos SET title = ?, description = ?, due_date = ?, is_resolved = ? WHERE id = ?",
    )
    .bind(title)
    .bind(&form.description)
    .bind(due_date)
    .bind(form.resolved())
    .bind(id)
    .execute(&pool)
    .await
    .map_err(internal_error)?;

    Ok(Redirect::to("/todos").into_response())
}

async fn confirm_delete(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Html<String>, HandlerError> {
    let todo = fetch_todo(&pool, id).await?;
    Ok(Html(page(
        "Delete Todo",
        &format!(
            "<h1>Delete Todo</h1>\
             <p>Are you sure you want to delete \"{title}\"?</p>\
             <form method=\"post\" action=\"/todos/{id}/delete\">\
             <button type=\"submit\">Delete</button> <a href=\"/todos\">Cancel</a>\
             </form>",
            title = encode_text(&todo.title),
            id = todo.id,
        ),
    )))
}

async fn delete_todo(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Redirect, HandlerError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(internal_error)?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(Redirect::to("/todos"))
}

async fn toggle_todo(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<Redirect, HandlerError> {
    let result = sqlx::query("UPDATE todos SET is_resolved = NOT is_resolved WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(internal_error)?;
    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(Redirect::to("/todos"))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>{title}</title></head><body>{body}</body></html>",
        title = encode_text(title),
    )
}

fn render_list(todos: &[Todo]) -> String {
    let mut body = String::from("<h1>Todos</h1><p><a href=\"/todos/new\">Create New Todo</a></p>");
    if todos.is_empty() {
        body.push_str("<p>No todos yet.</p>");
    } else {
        body.push_str("<ul>");
        for todo in todos {
            let due = todo
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "Not set".into());
            let status = if todo.is_resolved { "Resolved" } else { "Pending" };
            body.push_str(&format!(
                "<li><strong>{title}</strong> [{status}]\
                 <br>{description}\
                 <br>Due: {due}\
                 <br><a href=\"/todos/{id}/edit\">Edit</a> \
                 <a href=\"/todos/{id}/delete\">Delete</a>\
                 <form method=\"post\" action=\"/todos/{id}/toggle\">\
                 <button type=\"submit\">Toggle</button></form></li>",
                title = encode_text(&todo.title),
                description = encode_text(&todo.description),
                due = encode_text(&due),
                status = status,
                id = todo.id,
            ));
        }
        body.push_str("</ul>");
    }
    page("Todos", &body)
}

fn render_form(heading: &str, action: &str, existing: Option<&Todo>, error: Option<&str>) -> String {
    let title = existing.map(|t| t.title.as_str()).unwrap_or("");
    let description = existing.map(|t| t.description.as_str()).unwrap_or("");
    let due = existing
        .and_then(|t| t.due_date)
        .map(|d| d.to_string())
        .unwrap_or_default();
    let checked = if existing.is_some_and(|t| t.is_resolved) {
        " checked"
    } else {
        ""
    };
    let error_html = error
        .map(|e| format!("<p class=\"error\">{}</p>", encode_text(e)))
        .unwrap_or_default();

    let body = format!(
        "<h1>{heading}</h1>{error_html}\
         <form method=\"post\" action=\"{action}\">\
         <label>Title <input name=\"title\" value=\"{title}\" required></label><br>\
         <label>Description <textarea name=\"description\">{description}</textarea></label><br>\
         <label>Due date <input type=\"date\" name=\"due_date\" value=\"{due}\"></label><br>\
         <label><input type=\"checkbox\" name=\"is_resolved\"{checked}> Resolved</label><br>\
         <button type=\"submit\">Save</button> <a href=\"/todos\">Cancel</a>\
         </form>",
        heading = encode_text(heading),
        action = encode_double_quoted_attribute(action),
        title = encode_double_quoted_attribute(title),
        description = encode_text(description),
        due = encode_double_quoted_attribute(&due),
    );
    page(heading, &body)
}
