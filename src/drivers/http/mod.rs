use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::domain::{
    auth::LocalCredential, error::Error, upn::IdentityDriven, NOT_FOUND_MESSAGE,
};
use crate::driven::jira::JiraDrivenImpl;

pub mod middlewares;
mod upn;

pub struct HttpConfig {
    pub addr: String,
    pub upstream_url: String,
    pub upstream_account: String,
    pub upstream_api_key: String,
    pub upstream_timeout: Option<Duration>,
    pub local_account: String,
    pub local_api_key: String,
    pub debug: bool,
}

pub async fn server(config: HttpConfig) -> Result<()> {
    let identity = Arc::new(JiraDrivenImpl::try_new(
        &config.upstream_url,
        &config.upstream_account,
        &config.upstream_api_key,
        config.upstream_timeout,
    )?);
    let local = Arc::new(LocalCredential::new(
        &config.local_account,
        &config.local_api_key,
    ));

    let app = with_diagnostics(router(identity, local), config.debug);

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;

    info!(address = config.addr, debug = config.debug, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(identity: Arc<dyn IdentityDriven>, local: Arc<LocalCredential>) -> Router {
    Router::new()
        .route("/api/upn/:account_id", get(upn::get_upn))
        .route_layer(middleware::from_fn_with_state(
            local,
            middlewares::auth::require_basic_auth,
        ))
        .with_state(identity)
}

/// Request/response tracing, only installed when debug diagnostics are on.
pub fn with_diagnostics(app: Router, debug: bool) -> Router {
    if !debug {
        return app;
    }

    app.layer(TraceLayer::new_for_http())
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthorized(_) => middlewares::auth::unauthorized(),
            Error::NotFound(status) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(NOT_FOUND_MESSAGE)).into_response()
            }
            Error::Unexpected(err) => {
                error!(error = err, "unexpected error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
