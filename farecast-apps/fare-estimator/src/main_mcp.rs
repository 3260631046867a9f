//!  Farecast Fare Estimator
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # MCP Server Entry Point
//!
//! Supports stdio and HTTP transports via subcommand.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farecast_fare_estimator::FareEstimator;
use farecast_fare_estimator::mcp_server::FarecastServer;
use rmcp::service::serve_server;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "farecast-mcp")]
#[command(author, version, about = "MCP server for flight fare comparison")]
struct Args {
    /// Exported fare model (JSON artifact)
    #[arg(long, env = "FARECAST_MODEL", default_value = "flight_rf.json")]
    model: PathBuf,

    /// Vocabulary override (JSON)
    #[arg(long, env = "FARECAST_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run MCP server over stdio
    Stdio,

    /// Run MCP server over HTTP
    Http {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    tracing::debug!("Parsed args: {:?}", args);

    let estimator = Arc::new(
        FareEstimator::from_paths(&args.model, args.vocabulary.as_deref())
            .with_context(|| format!("Failed to load fare model from {}", args.model.display()))?,
    );
    tracing::debug!("Estimator ready with model '{}'", estimator.model_name());

    let server = FarecastServer::new(estimator);
    match args.command {
        Command::Stdio => serve_stdio(server).await,
        Command::Http { host, port } => serve_http(server, &host, port).await,
    }
}

async fn serve_stdio(server: FarecastServer) -> Result<()> {
    tracing::info!("Serving fare comparisons over stdio");
    let running = serve_server(server, rmcp::transport::io::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("MCP stdio handshake failed: {}", e))?;
    let reason = running.waiting().await.context("MCP stdio session aborted")?;
    tracing::info!("MCP stdio session ended: {:?}", reason);
    Ok(())
}

async fn serve_http(server: FarecastServer, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            stateful_mode: true,
            ..Default::default()
        },
    );
    let app = axum::Router::new().nest_service("/mcp", service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Serving fare comparisons on http://{}/mcp", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("MCP HTTP server error")?;
    Ok(())
}
