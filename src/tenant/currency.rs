//! Active currency resolution.
//!
//! First match wins:
//! 1. `POST` with a non-empty `__currency` parameter (explicit user action)
//! 2. `currency` cookie (stored preference)
//! 3. currency already on the context (inherited by nested dispatch)
//! 4. the tenant default

use axum::http::Method;

use crate::http::request::InboundRequest;
use crate::routing::context::RequestContext;

/// Request parameter carrying an explicit currency switch.
pub const CURRENCY_PARAM: &str = "__currency";

/// Cookie carrying the stored currency preference.
pub const CURRENCY_COOKIE: &str = "currency";

pub fn resolve_currency(ctx: &RequestContext, request: &InboundRequest, fallback: &str) -> String {
    if ctx.method == Method::POST {
        if let Some(currency) = request.params.get(CURRENCY_PARAM).filter(|c| !c.is_empty()) {
            return currency.clone();
        }
    }

    if let Some(currency) = request.cookies.get(CURRENCY_COOKIE) {
        return currency.clone();
    }

    if let Some(currency) = &ctx.currency_id {
        return currency.clone();
    }

    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(method: Method, request: InboundRequest, inherited: Option<&str>) -> String {
        let mut ctx = RequestContext::new(method, "shop.test", "/");
        ctx.currency_id = inherited.map(str::to_string);
        resolve_currency(&ctx, &request, "eur")
    }

    #[test]
    fn test_post_parameter_beats_cookie() {
        let request = InboundRequest::new(Method::POST, "shop.test", "/")
            .with_param(CURRENCY_PARAM, "gbp")
            .with_cookie(CURRENCY_COOKIE, "usd");
        assert_eq!(resolve(Method::POST, request, Some("chf")), "gbp");
    }

    #[test]
    fn test_parameter_ignored_outside_post() {
        let request = InboundRequest::new(Method::GET, "shop.test", "/")
            .with_param(CURRENCY_PARAM, "gbp")
            .with_cookie(CURRENCY_COOKIE, "usd");
        assert_eq!(resolve(Method::GET, request, None), "usd");
    }

    #[test]
    fn test_empty_parameter_falls_through() {
        let request = InboundRequest::new(Method::POST, "shop.test", "/").with_param(CURRENCY_PARAM, "");
        assert_eq!(resolve(Method::POST, request, Some("chf")), "chf");
    }

    #[test]
    fn test_cookie_beats_inherited() {
        let request = InboundRequest::new(Method::GET, "shop.test", "/").with_cookie(CURRENCY_COOKIE, "usd");
        assert_eq!(resolve(Method::GET, request, Some("chf")), "usd");
    }

    #[test]
    fn test_fallback() {
        let request = InboundRequest::new(Method::GET, "shop.test", "/");
        assert_eq!(resolve(Method::GET, request.clone(), Some("chf")), "chf");
        assert_eq!(resolve(Method::GET, request, None), "eur");
    }
}
