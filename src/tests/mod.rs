//! Request-level tests that drive the full router.


use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::AppState;
use crate::archive::MemoryArchiveStore;
use crate::assets::select_asset_source;
use crate::env::{AppConfig, Environment};
use crate::routing::{create_route_table, create_router};

pub(crate) struct TestApp {
    pub store: Arc<MemoryArchiveStore>,
    pub router: Router,
}

pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .map(|value| value.to_str().unwrap())
            .unwrap_or("")
    }

    pub fn location(&self) -> &str {
        self.headers
            .get("location")
            .map(|value| value.to_str().unwrap())
            .unwrap_or("")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub(crate) fn public_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public"))
}

pub(crate) fn test_app(environment: Environment) -> TestApp {
    let config = AppConfig {
        environment,
        static_dir: public_dir(),
        ..AppConfig::default()
    };

    let store = Arc::new(MemoryArchiveStore::new());
    let assets = select_asset_source(&config).unwrap();
    let routes = create_route_table().unwrap();
    let router = create_router(AppState::new(store.clone(), assets, routes));

    TestApp { store, router }
}

pub(crate) fn production_app() -> TestApp {
    test_app(Environment::Other("production".to_string()))
}

pub(crate) async fn send(app: &TestApp, request: Request<Body>) -> TestResponse {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub(crate) async fn get(app: &TestApp, uri: &str) -> TestResponse {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}
