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

//! Web server for the fare comparison form.

use anyhow::{Context, Result};
use clap::Parser;
use farecast_fare_estimator::FareEstimator;
use farecast_fare_estimator::web::{AppState, create_router, shutdown_signal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "farecast-web")]
#[command(author, version, about = "Web form comparing predicted flight fares")]
struct Args {
    /// Exported fare model (JSON artifact)
    #[arg(long, env = "FARECAST_MODEL", default_value = "flight_rf.json")]
    model: PathBuf,

    /// Vocabulary override (JSON); defaults to the training-time columns
    #[arg(long, env = "FARECAST_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    #[arg(long, env = "FARECAST_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "FARECAST_PORT", default_value = "5000")]
    port: u16,
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

    let estimator = FareEstimator::from_paths(&args.model, args.vocabulary.as_deref())
        .with_context(|| format!("Failed to load fare model from {}", args.model.display()))?;
    tracing::info!(
        "Model '{}' loaded with {} airlines",
        estimator.model_name(),
        estimator.vocabulary().airlines.len()
    );

    let state = AppState {
        estimator: Arc::new(estimator),
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host:port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Serving fare comparison on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}
