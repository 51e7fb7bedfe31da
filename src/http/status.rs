//! Root status route.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootStatus {
    pub status: u16,
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn get_status() -> Json<RootStatus> {
    Json(RootStatus {
        status: 200,
        message: "Welcome to the API, it is working!",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes served by the ingress itself.
pub fn status_routes() -> Router {
    Router::new().route("/", get(get_status))
}
