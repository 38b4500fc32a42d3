#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use shortscale::config::Config;
use shortscale::domain::analytics_event::AnalyticsEvent;
use shortscale::domain::entities::UrlMapping;
use shortscale::domain::repositories::MappingStore;
use shortscale::infrastructure::store::InMemoryMappingStore;
use shortscale::routes::app_router;
use shortscale::server::build_state;
use shortscale::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_PEER: &str = "127.0.0.1:12345";

/// Inserts a fixed `ConnectInfo` so handlers and middleware see a peer address.
#[derive(Clone)]
pub struct MockConnectInfoLayer {
    addr: SocketAddr,
}

impl MockConnectInfoLayer {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.parse().unwrap(),
        }
    }
}

impl Default for MockConnectInfoLayer {
    fn default() -> Self {
        Self::new(TEST_PEER)
    }
}

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService {
            inner,
            addr: self.addr,
        }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
    addr: SocketAddr,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        req.extensions_mut().insert(ConnectInfo(self.addr));
        self.inner.call(req)
    }
}

pub struct TestContext {
    pub state: AppState,
    pub store: Arc<InMemoryMappingStore>,
    pub analytics_rx: mpsc::Receiver<AnalyticsEvent>,
}

pub fn test_config() -> Config {
    Config {
        base_url: "http://localhost:3000/".to_string(),
        ..Config::default()
    }
}

pub fn create_test_state() -> TestContext {
    create_test_state_with(test_config())
}

pub fn create_test_state_with(config: Config) -> TestContext {
    let store = Arc::new(InMemoryMappingStore::new());
    let (state, analytics_rx) = build_state(&config, store.clone());

    TestContext {
        state,
        store,
        analytics_rx,
    }
}

/// The production router behind a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    test_app_with_peer(state, TEST_PEER)
}

pub fn test_app_with_peer(state: AppState, peer: &str) -> Router {
    Router::new()
        .fallback_service(app_router(state))
        .layer(MockConnectInfoLayer::new(peer))
}

pub async fn insert_mapping(store: &InMemoryMappingStore, mapping: UrlMapping) {
    store.save(mapping).await.unwrap();
}
