/* demos/axum.rs */

use axum::{Router, extract::ConnectInfo, http::HeaderMap, response::Json, routing::get};
use forwarded_ip::{ClientIp, RealIpLayer};
use serde_json::json;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "forwarded_ip=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_app();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();

    println!("Server starting on http://localhost:3000");
    println!("Test endpoints:");
    println!("  • GET /secure  - client address via the secure strategy");
    println!("  • GET /naive   - client address via the naive strategy");
    println!("  • GET /debug   - raw headers next to both selections");
    println!();
    println!("Test with headers:");
    println!("  curl -H 'X-Forwarded-For: 8.8.8.8' -H 'X-Forwarded-For: 203.0.113.9' http://localhost:3000/secure");
    println!("  curl -H 'X-Real-IP: 198.51.100.1' http://localhost:3000/naive");
    println!();

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

fn create_app() -> Router {
    let secure_router = Router::new()
        .route("/", get(secure_handler))
        .layer(RealIpLayer::secure());

    let naive_router = Router::new()
        .route("/", get(naive_handler))
        .layer(RealIpLayer::naive());

    Router::new()
        .nest("/secure", secure_router)
        .nest("/naive", naive_router)
        .route("/debug", get(debug_handler))
}

async fn secure_handler(client_ip: ClientIp) -> Json<serde_json::Value> {
    Json(json!({
        "client_ip": client_ip.as_str(),
        "strategy": "secure",
        "valid_ip": client_ip.ip().is_some(),
    }))
}

async fn naive_handler(client_ip: ClientIp) -> Json<serde_json::Value> {
    Json(json!({
        "client_ip": client_ip.as_str(),
        "strategy": "naive",
        "valid_ip": client_ip.ip().is_some(),
        "note": "X-Real-IP and the leftmost X-Forwarded-For hop are client controlled"
    }))
}

/// Shows what each strategy would pick for this request.
async fn debug_handler(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let forwarded: Vec<String> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect();
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    let map = forwarded_ip::header_map(
        forwarded
            .iter()
            .map(|value| ("x-forwarded-for", value.as_str()))
            .chain((!real_ip.is_empty()).then_some(("x-real-ip", real_ip))),
    );
    let peer = addr.to_string();

    Json(json!({
        "peer": peer,
        "x_forwarded_for": forwarded,
        "x_real_ip": real_ip,
        "secure": forwarded_ip::secure_real_ip(&map, &peer),
        "naive": forwarded_ip::naive_real_ip(&map, &peer),
    }))
}
