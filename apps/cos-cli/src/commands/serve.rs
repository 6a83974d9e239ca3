// serve.rs — `cos serve`: HTTP health endpoint for the gate runner.

use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "COS_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

pub fn execute(args: &ServeArgs) -> anyhow::Result<u8> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(args.bind).await?;
        tracing::info!(addr = %listener.local_addr()?, "serving health endpoint");
        axum::serve(listener, router()).await?;
        Ok::<(), anyhow::Error>(())
    })?;
    Ok(0)
}
