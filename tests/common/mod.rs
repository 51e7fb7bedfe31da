//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use api_ingress::config::IngressConfig;
use api_ingress::http::build_app;
use api_ingress::lifecycle::{RunningServer, StartupSequencer};
use api_ingress::net::{provision, TransportConfig};
use api_ingress::notify::ErrorNotifier;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A request captured by a mock receiver.
#[derive(Debug)]
pub struct Received {
    pub headers: HeaderMap,
    pub body: Value,
}

/// Start a mock endpoint that accepts JSON POSTs on `path` and forwards them.
pub async fn start_receiver(path: &str) -> (SocketAddr, mpsc::UnboundedReceiver<Received>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new()
        .route(
            path,
            post(
                |State(tx): State<mpsc::UnboundedSender<Received>>,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    let _ = tx.send(Received { headers, body });
                    StatusCode::OK
                },
            ),
        )
        .with_state(tx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, rx)
}

/// Wait up to `within` for the next captured request.
pub async fn next_within(
    rx: &mut mpsc::UnboundedReceiver<Received>,
    within: Duration,
) -> Option<Received> {
    tokio::time::timeout(within, rx.recv()).await.ok().flatten()
}

/// Config bound to an ephemeral loopback port.
pub fn loopback_config() -> IngressConfig {
    let mut config = IngressConfig::default();
    config.server.host = "127.0.0.1".into();
    config.server.port = 0;
    config.server.url = "http://ingress.test".into();
    config.authentication.api_key = "global-key".into();
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Provision, bind and serve `routes` with `config`.
pub async fn start_ingress(
    config: IngressConfig,
    routes: Router,
    service_name: Option<String>,
) -> RunningServer {
    let config = Arc::new(config);
    let client = client();

    let notifier = Arc::new(ErrorNotifier::new(&config, client.clone()));
    let app = build_app(&config, notifier, routes);
    let transport = provision(&TransportConfig::from_config(&config), app)
        .await
        .unwrap();

    StartupSequencer::new(config, client)
        .with_service_name(service_name)
        .start(transport)
        .await
        .unwrap()
}

/// Self-signed certificate and key for `localhost`, written to a temp dir.
pub fn self_signed_pair() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let cert_path = dir.path().join("fullchain.pem");
    let key_path = dir.path().join("privkey.pem");
    std::fs::write(&cert_path, cert.serialize_pem().unwrap()).unwrap();
    std::fs::write(&key_path, cert.serialize_private_key_pem()).unwrap();
    (dir, cert_path, key_path)
}
