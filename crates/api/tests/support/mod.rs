//! In-process stand-in for the posts service

#![allow(dead_code)]

use axum::extract::{Path, Query, Request};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use checkrun_common::RunConfig;

pub const FIRST_TITLE: &str =
    "sunt aut facere repellat provident occaecati excepturi optio reprehenderit";

const POST_COUNT: i64 = 100;

pub struct FakeApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    /// `METHOD /path?query` of every request received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn config(&self, artifacts: &std::path::Path) -> RunConfig {
        RunConfig {
            base_url: Some(self.base_url.clone()),
            artifacts_dir: artifacts.to_path_buf(),
            connect_timeout_secs: 2,
            ..RunConfig::default()
        }
    }
}

pub async fn spawn() -> FakeApi {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&requests);

    let app = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/posts/:id/comments", post(add_comment))
        .route("/comments", get(list_comments))
        .route("/plain", get(|| async { "not json" }))
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            let recorder = Arc::clone(&recorder);
            async move {
                recorder.lock().push(format!("{} {}", req.method(), req.uri()));
                next.run(req).await
            }
        }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeApi {
        base_url: format!("http://{}", addr),
        requests,
    }
}

fn post_json(id: i64) -> Value {
    let title = if id == 1 {
        FIRST_TITLE.to_string()
    } else {
        format!("post {}", id)
    };
    json!({"userId": (id - 1) / 10 + 1, "id": id, "title": title, "body": format!("body of {}", id)})
}

fn exists(id: i64) -> bool {
    (1..=POST_COUNT).contains(&id)
}

async fn list_posts() -> Json<Value> {
    Json(Value::Array((1..=POST_COUNT).map(post_json).collect()))
}

async fn get_post(Path(id): Path<i64>) -> Response {
    if exists(id) {
        Json(post_json(id)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
    }
}

async fn create_post(Json(mut body): Json<Value>) -> Response {
    body["id"] = json!(POST_COUNT + 1);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_post(Path(id): Path<i64>, Json(mut body): Json<Value>) -> Response {
    if exists(id) {
        body["id"] = json!(id);
        Json(body).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "TypeError: Cannot read properties of undefined").into_response()
    }
}

async fn delete_post(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({}))
}

async fn add_comment(Path(id): Path<i64>, Json(mut body): Json<Value>) -> Response {
    body["postId"] = json!(id);
    body["id"] = json!(501);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_comments(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let post_id: i64 = params
        .get("postId")
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    if !exists(post_id) {
        return Json(json!([]));
    }
    let comments = (1..=5)
        .map(|n| {
            json!({
                "postId": post_id,
                "id": (post_id - 1) * 5 + n,
                "name": format!("comment {}", n),
                "email": "someone@example.com",
                "body": "comment body"
            })
        })
        .collect();
    Json(Value::Array(comments))
}
