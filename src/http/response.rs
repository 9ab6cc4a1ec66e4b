//! Response construction.
//!
//! # Responsibilities
//! - Render a successful dispatch as JSON
//! - Turn a superseded SEO path into a permanent redirect
//! - Map routing errors to appropriate HTTP status codes
//!
//! # Design Decisions
//! - Collaborator failures (tenant store, SEO store) result in 502 Bad Gateway
//! - Route source and pattern failures are server errors (500)
//! - Error bodies are plain text; the router's message is passed through

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::RoutingError;
use crate::routing::{Params, RequestContext};
use crate::routing::matcher::MatchResult;

/// JSON body of a matched request.
#[derive(Debug, Serialize)]
pub struct DispatchBody {
    pub route: String,
    pub handler: String,
    pub params: Params,
    pub tenant: Option<Uuid>,
    pub currency: Option<String>,
    pub locale: Option<String>,
    pub canonical_url: Option<String>,
}

impl DispatchBody {
    pub fn new(matched: MatchResult, ctx: &RequestContext, canonical_url: Option<String>) -> Self {
        Self {
            route: matched.route,
            handler: matched.handler,
            params: matched.params,
            tenant: ctx.tenant().map(|t| t.id),
            currency: ctx.currency_id.clone(),
            locale: ctx.locale_code.clone(),
            canonical_url,
        }
    }
}

impl IntoResponse for DispatchBody {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `301 Moved Permanently` to `location`.
pub fn permanent_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// HTTP status for a routing error.
pub fn status_for(error: &RoutingError) -> StatusCode {
    match error {
        RoutingError::NoMatch { .. } | RoutingError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        RoutingError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        RoutingError::TenantResolution(_) | RoutingError::Seo(_) => StatusCode::BAD_GATEWAY,
        RoutingError::RouteSource(_)
        | RoutingError::InvalidPattern { .. }
        | RoutingError::MissingParameters { .. }
        | RoutingError::InvalidParameter { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a routing error.
pub fn error_response(error: RoutingError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!(error = %error, status = status.as_u16(), "Dispatch failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Dispatch rejected");
    }

    match &error {
        RoutingError::MethodNotAllowed { allowed, .. } => {
            let allow = HeaderValue::from_str(&allowed.join(", "))
                .unwrap_or_else(|_| HeaderValue::from_static(""));
            (status, [(header::ALLOW, allow)], error.to_string()).into_response()
        }
        _ => (status, error.to_string()).into_response(),
    }
}
