//! Request handling and transformation.
//!
//! # Responsibilities
//! - Extract routing-relevant information (host, port, scheme, path)
//! - Parse cookies and request parameters (query string, form body)
//!
//! # Design Decisions
//! - The router only sees [`InboundRequest`], never the axum request type
//! - Later sources win on duplicate parameter names (form over query)

use std::collections::HashMap;
use std::str::FromStr;

use axum::http::{header, request::Parts, uri::Authority, HeaderMap, HeaderName, Method};

/// Header carrying the original scheme behind a TLS-terminating proxy.
pub static X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// The inputs of one inbound request as seen by the router.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub scheme: String,
    /// Host without port.
    pub host: String,
    pub port: Option<u16>,
    /// Full request path, tenant prefix included.
    pub path: String,
    pub cookies: HashMap<String, String>,
    /// Query and form parameters.
    pub params: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            scheme: "http".to_string(),
            host: host.into(),
            port: None,
            path: path.into(),
            cookies: HashMap::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Build from request parts and an optional urlencoded form body.
    pub fn from_parts(parts: &Parts, form_body: Option<&[u8]>) -> Self {
        let authority = parts
            .headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| Authority::from_str(h).ok())
            .or_else(|| parts.uri.authority().cloned());

        let scheme = parts
            .headers
            .get(&X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_lowercase())
            .or_else(|| parts.uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let mut params = HashMap::new();
        if let Some(query) = parts.uri.query() {
            params.extend(url::form_urlencoded::parse(query.as_bytes()).into_owned());
        }
        if let Some(body) = form_body {
            params.extend(url::form_urlencoded::parse(body).into_owned());
        }

        Self {
            method: parts.method.clone(),
            scheme,
            host: authority
                .as_ref()
                .map(|a| a.host().to_lowercase())
                .unwrap_or_default(),
            port: authority.as_ref().and_then(Authority::port_u16),
            path: parts.uri.path().to_string(),
            cookies: parse_cookies(&parts.headers),
            params,
        }
    }
}

/// Returns true if the body is an urlencoded form.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

/// Collect every `Cookie` header into a name/value map.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_from_parts() {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .uri("/en/checkout?step=2")
            .header("Host", "Shop.Test:8080")
            .header("Cookie", "currency=usd; session=abc")
            .header("X-Forwarded-Proto", "HTTPS")
            .body(())
            .unwrap()
            .into_parts();

        let request = InboundRequest::from_parts(&parts, Some(b"__currency=gbp&step=3"));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.host, "shop.test");
        assert_eq!(request.port, Some(8080));
        assert_eq!(request.scheme, "https");
        assert_eq!(request.path, "/en/checkout");
        assert_eq!(request.cookies.get("currency").map(String::as_str), Some("usd"));
        assert_eq!(request.params.get("__currency").map(String::as_str), Some("gbp"));
        // Form wins over query.
        assert_eq!(request.params.get("step").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_parse_cookies_ignores_garbage() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, "a=1; broken; =x".parse().unwrap());
        headers.append(header::COOKIE, "b=\"2\"".parse().unwrap());
        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_is_form() {
        let mut headers = HeaderMap::new();
        assert!(!is_form(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=UTF-8".parse().unwrap(),
        );
        assert!(is_form(&headers));
    }
}
