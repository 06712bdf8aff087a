//! Shared helpers for integration tests.

use std::net::SocketAddr;

use feedback_service::{FeedbackStore, HttpServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

/// A running service on an ephemeral port. Stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server over an in-memory database, after letting the test adjust the config.
pub async fn spawn_server<F>(configure: F) -> TestServer
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut config = ServiceConfig::default();
    config.storage.path = ":memory:".into();
    config.static_dir = Some(concat!(env!("CARGO_MANIFEST_DIR"), "/public").into());
    configure(&mut config);

    let store = FeedbackStore::open(&config.storage).expect("open in-memory store");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
