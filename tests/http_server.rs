//! End-to-end tests of the HTTP surface.

mod common;

use std::net::SocketAddr;

use reqwest::{redirect::Policy, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use storefront_router::config::RouterConfig;
use storefront_router::{HttpServer, Shutdown};

struct TestServer {
    addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), std::io::Error>>,
    _updates: mpsc::UnboundedSender<RouterConfig>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = common::router_config(dir.path());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (updates, config_updates) = mpsc::unbounded_channel();
        let shutdown = Shutdown::new();

        let server = HttpServer::new(config);
        let handle = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

        Self {
            addr,
            shutdown,
            handle,
            _updates: updates,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().redirect(Policy::none()).build().unwrap()
}

#[tokio::test]
async fn test_seo_path_dispatches_to_handler() {
    let server = TestServer::start().await;

    let response = client().get(server.url("/en/blue-shoes")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["route"], "product_detail");
    assert_eq!(body["handler"], "storefront.product");
    assert_eq!(body["params"]["id"], "42");
    assert_eq!(body["tenant"], common::EN_TENANT.to_string());
    assert_eq!(body["currency"], "eur");
    assert_eq!(body["locale"], "en-GB");
    assert_eq!(
        body["canonical_url"],
        format!("http://127.0.0.1:{}/en/blue-shoes", server.addr.port())
    );

    server.stop().await;
}

#[tokio::test]
async fn test_superseded_seo_path_redirects() {
    let server = TestServer::start().await;

    let response = client().get(server.url("/en/old-name")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()["location"], "/en/new-name");

    server.stop().await;
}

#[tokio::test]
async fn test_posted_currency() {
    let server = TestServer::start().await;

    let response = client()
        .post(server.url("/en/cart"))
        .header("Cookie", "currency=usd")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("__currency=gbp")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["route"], "cart");
    assert_eq!(body["currency"], "gbp");

    server.stop().await;
}

#[tokio::test]
async fn test_error_statuses() {
    let server = TestServer::start().await;
    let client = client();

    let response = client.get(server.url("/en/nowhere")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.delete(server.url("/en/cart")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "GET, POST");

    server.stop().await;
}

#[tokio::test]
async fn test_platform_route() {
    let server = TestServer::start().await;

    let response = client().get(server.url("/_status")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["route"], "platform_status");
    assert!(body["tenant"].is_null());

    server.stop().await;
}
