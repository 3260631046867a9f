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

//! # Web Front End
//!
//! `GET /` serves the comparison form, `POST /compare` renders the result.
//! Failures of any kind come back as an inline error on the same page.

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{State, rejection::FormRejection},
    response::Html,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::estimator::FareEstimator;
use crate::report::{PageBody, render_page};
use crate::trip_request::CompareForm;

#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<FareEstimator>,
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/compare", post(compare))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn home(State(state): State<AppState>) -> Html<String> {
    Html(render_page(state.estimator.vocabulary(), PageBody::Form))
}

async fn compare(
    State(state): State<AppState>,
    form: Result<Form<CompareForm>, FormRejection>,
) -> Html<String> {
    let vocabulary = state.estimator.vocabulary();
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!("Rejected comparison form: {}", message);
            return Html(render_page(vocabulary, PageBody::Error(&message)));
        }
    };

    match state.estimator.compare_form(&form) {
        Ok(comparison) => Html(render_page(vocabulary, PageBody::Comparison(&comparison))),
        Err(e) => {
            tracing::warn!("Comparison failed: {}", e);
            Html(render_page(vocabulary, PageBody::Error(&e.to_string())))
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests");
}
