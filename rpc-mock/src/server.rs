/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::ledger::Ledger;

pub fn create_router(ledger: Arc<Ledger>) -> Router {
    // Allow requests from wallet clients/tests regardless of origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Solana JSON-RPC surface
        .route("/", post(rpc_handler))
        // Wallet store surface
        .route("/rest/v1/wallets", get(get_wallet_rows).post(insert_wallet_rows))
        // Test helper endpoints
        .route("/mock/price", get(get_price))
        .route("/mock/airdrop", post(airdrop))
        .route("/mock/advance", post(advance_blocks))
        .route("/mock/fail", post(set_failures))
        .route("/mock/counters", get(get_counters))
        // Shared state
        .with_state(ledger)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(ledger: Arc<Ledger>, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(ledger);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("RPC mock server listening on http://{}", addr);
    log::info!("JSON-RPC surface: POST /");
    log::info!("Wallet store surface: /rest/v1/wallets");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Bind an ephemeral local port and serve in the background. Returns the
/// bound address; used by integration tests.
pub async fn spawn_server(ledger: Arc<Ledger>) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router(ledger);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::warn!("mock server exited: {}", e);
        }
    });
    Ok(addr)
}
