#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cycle_tracker_backend::state::AppState;
use cycle_tracker_backend::store::{
    Document, DocumentStore, Filter, MemoryStore, Sort, StoreError,
};

/// Build the full application (same middleware as production) over a fresh
/// in-memory store. The store is returned so tests can inspect it directly.
pub fn build_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = cycle_tracker_backend::app(AppState::new(store.clone()));
    (app, store)
}

/// A store whose every operation fails, for exercising 500 handling.
pub struct FailingStore;

fn unreachable_store() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_one(&self, _: &str, _: Document) -> Result<(), StoreError> {
        Err(unreachable_store())
    }

    async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Document>, StoreError> {
        Err(unreachable_store())
    }

    async fn find_many(
        &self,
        _: &str,
        _: &Filter,
        _: Option<Sort>,
        _: usize,
    ) -> Result<Vec<Document>, StoreError> {
        Err(unreachable_store())
    }

    async fn update_one(&self, _: &str, _: &Filter, _: Document) -> Result<u64, StoreError> {
        Err(unreachable_store())
    }

    async fn delete_one(&self, _: &str, _: &Filter) -> Result<u64, StoreError> {
        Err(unreachable_store())
    }
}

pub fn build_failing_app() -> Router {
    cycle_tracker_backend::app(AppState::new(Arc::new(FailingStore)))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, json: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn put_json(app: &Router, uri: &str, json: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(json)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Number of documents currently stored in `collection`.
pub async fn stored_count(store: &MemoryStore, collection: &str) -> usize {
    store
        .find_many(collection, &Filter::any(), None, usize::MAX)
        .await
        .unwrap()
        .len()
}
