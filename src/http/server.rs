//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single dispatching fallback handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Apply configuration updates while serving
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::request::{is_form, InboundRequest};
use crate::http::response::{error_response, permanent_redirect, DispatchBody};
use crate::lifecycle::RouterServices;
use crate::routing::{ReferenceType, RequestContext};

/// Largest urlencoded form body read for parameter extraction.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<RouterServices>,
}

/// HTTP front end of the storefront router.
pub struct HttpServer {
    router: Router,
    services: Arc<RouterServices>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        let services = Arc::new(RouterServices::from_config(&config));
        Self::with_services(&config, services)
    }

    /// Create a server over already initialized services.
    pub fn with_services(config: &RouterConfig, services: Arc<RouterServices>) -> Self {
        let state = AppState {
            services: services.clone(),
        };
        let router = Self::build_router(config, state);
        Self { router, services }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new().fallback(dispatch_handler).with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    pub fn services(&self) -> &Arc<RouterServices> {
        &self.services
    }

    /// Run the server until `shutdown` fires, applying every configuration
    /// received on `config_updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let services = self.services.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                services.apply(&config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Dispatch every request through the storefront router.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let form = if parts.method == Method::POST && is_form(&parts.headers) {
        match axum::body::to_bytes(body, MAX_FORM_BYTES).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable form body");
                return (StatusCode::BAD_REQUEST, "Unreadable form body").into_response();
            }
        }
    } else {
        None
    };

    let inbound = InboundRequest::from_parts(&parts, form.as_deref());
    let mut ctx = RequestContext::from_request(&inbound);
    let router = state.services.router();

    let dispatched = match router.dispatch(&mut ctx, &inbound).await {
        Ok(dispatched) => dispatched,
        Err(e) => return error_response(e),
    };

    if let Some(target) = &dispatched.redirect_target {
        let location = format!("{}{}", ctx.base_url, target);
        tracing::info!(from = %inbound.path, to = %location, "Redirecting to current SEO URL");
        return permanent_redirect(&location);
    }

    let canonical_url = match router
        .generate(
            &ctx,
            &dispatched.matched.route,
            &dispatched.matched.params,
            ReferenceType::AbsoluteUrl,
        )
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!(route = %dispatched.matched.route, error = %e, "No canonical URL");
            None
        }
    };

    DispatchBody::new(dispatched.matched, &ctx, canonical_url).into_response()
}
