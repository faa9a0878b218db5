// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use parley_agent::ChatOrchestrator;
use parley_config::model::ServerConfig;
use parley_core::{AuthAdapter, ParleyError, StorageAdapter};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthState, auth_middleware};
use crate::handlers;
use crate::openapi;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Runs chat turns.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Direct storage access for the read and delete routes.
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    /// Resolves bearer tokens.
    pub auth: Arc<dyn AuthAdapter + Send + Sync>,
    /// Reply text used when the provider fails.
    pub fallback_message: String,
    /// Shown by the health routes.
    pub agent_name: String,
}

impl GatewayState {
    /// Builds state whose storage handle is the orchestrator's own.
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        auth: Arc<dyn AuthAdapter + Send + Sync>,
        fallback_message: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            storage: orchestrator.storage().clone(),
            orchestrator,
            auth,
            fallback_message: fallback_message.into(),
            agent_name: agent_name.into(),
        }
    }
}

/// Builds the CORS layer for the configured origins.
///
/// An unparseable origin is a configuration error.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, ParleyError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| ParleyError::Config(format!("invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// Assembles the full application router.
///
/// - GET / and GET /health (public)
/// - GET /openapi.json (public)
/// - POST /chat (with auth)
/// - GET, POST /conversations (with auth)
/// - GET /conversations/{id}/full and /messages (with auth)
/// - DELETE /conversations/{id} (with auth)
pub fn build_router(state: GatewayState, cors_origins: &[String]) -> Result<Router, ParleyError> {
    let auth_state = AuthState {
        adapter: state.auth.clone(),
    };

    let public_routes = Router::new()
        .route("/", get(handlers::get_health))
        .route("/health", get(handlers::get_health))
        .route("/openapi.json", get(openapi::openapi_json))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/chat", post(handlers::post_chat))
        .route(
            "/conversations",
            get(handlers::list_conversations).post(handlers::create_conversation),
        )
        .route(
            "/conversations/{id}/full",
            get(handlers::get_conversation_full),
        )
        .route(
            "/conversations/{id}/messages",
            get(handlers::get_conversation_messages),
        )
        .route("/conversations/{id}", delete(handlers::delete_conversation))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Ok(Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins)?))
}

/// Formats the bind address, bracketing IPv6 literals.
fn bind_address(config: &ServerConfig) -> String {
    if config.host.contains(':') {
        format!("[{}]:{}", config.host, config.port)
    } else {
        format!("{}:{}", config.host, config.port)
    }
}

/// Start the gateway HTTP server.
///
/// Serves until `shutdown` is cancelled, then drains in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), ParleyError> {
    let app = build_router(state, &config.cors_origins)?;

    let addr = bind_address(config);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ParleyError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| ParleyError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let config = ServerConfig {
            host: "::1".into(),
            port: 8000,
            cors_origins: vec![],
        };
        assert_eq!(bind_address(&config), "[::1]:8000");

        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 9000,
            cors_origins: vec![],
        };
        assert_eq!(bind_address(&config), "127.0.0.1:9000");
    }

    #[test]
    fn cors_rejects_unparseable_origin() {
        let err = cors_layer(&["http://bad\norigin".to_string()]).unwrap_err();
        assert!(matches!(err, ParleyError::Config(_)));
    }

    #[test]
    fn cors_accepts_default_origin() {
        assert!(cors_layer(&ServerConfig::default().cors_origins).is_ok());
    }
}
