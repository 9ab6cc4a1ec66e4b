//! Route matching logic.
//!
//! # Responsibilities
//! - Match host requirement (exact match, case-insensitive)
//! - Match canonical path against compiled patterns
//! - Check allowed methods, reporting a mismatch separately from no-match
//!
//! # Design Decisions
//! - Host matching is case-insensitive (RFC 9110)
//! - Path matching is case-sensitive
//! - First declared route wins; no specificity scoring
//! - Input path must already be canonical (no tenant prefix stripping here)

use axum::http::Method;
use serde::Serialize;

use crate::error::{RoutingError, RoutingResult};
use crate::routing::definition::Params;
use crate::routing::table::RouteTable;

/// Successful match of a canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Name of the matched route.
    pub route: String,
    /// Handler serving the route.
    pub handler: String,
    /// Extracted path parameters merged over route defaults.
    pub params: Params,
}

/// Capability: find the handler for a canonical path.
pub trait RouteMatcher: Send + Sync {
    fn match_path(&self, path: &str, method: &Method, host: &str) -> RoutingResult<MatchResult>;
}

/// Matches the request host.
#[derive(Debug, Clone)]
pub struct HostMatcher {
    expected_host: String,
}

impl HostMatcher {
    /// Create a new host matcher.
    /// The host is normalized to lowercase for case-insensitive matching.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            expected_host: host.into().to_lowercase(),
        }
    }

    pub fn matches(&self, host: &str) -> bool {
        host.to_lowercase() == self.expected_host
    }

    pub fn host(&self) -> &str {
        &self.expected_host
    }
}

/// Returns true if `method` is accepted by a route allowing `allowed`.
/// An empty list accepts anything; `GET` implies `HEAD`.
pub fn method_allowed(allowed: &[String], method: &Method) -> bool {
    allowed.is_empty()
        || allowed.iter().any(|m| {
            m == method.as_str() || (*method == Method::HEAD && m == Method::GET.as_str())
        })
}

impl RouteMatcher for RouteTable {
    fn match_path(&self, path: &str, method: &Method, host: &str) -> RoutingResult<MatchResult> {
        let mut allowed: Vec<String> = Vec::new();

        for route in self.iter() {
            if let Some(host_matcher) = &route.host {
                if !host_matcher.matches(host) {
                    continue;
                }
            }

            let Some(params) = route.pattern.matches(path) else {
                continue;
            };

            if !method_allowed(&route.methods, method) {
                for m in &route.methods {
                    if !allowed.contains(m) {
                        allowed.push(m.clone());
                    }
                }
                continue;
            }

            return Ok(MatchResult {
                route: route.definition.name.clone(),
                handler: route.definition.handler.clone(),
                params,
            });
        }

        if allowed.is_empty() {
            Err(RoutingError::NoMatch {
                method: method.to_string(),
                path: path.to_string(),
            })
        } else {
            Err(RoutingError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
                allowed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::definition::RouteDefinition;

    fn table() -> RouteTable {
        RouteTable::build(vec![
            RouteDefinition::new("homepage", "/", "storefront.home").with_methods(&["GET"]),
            RouteDefinition::new("product_detail", "/product/{id<\\d+>}", "storefront.product.detail")
                .with_methods(&["GET"])
                .seo(),
            RouteDefinition::new("product_any", "/product/{slug}", "storefront.product.slug"),
            RouteDefinition::new("cart_add", "/checkout/cart/add", "storefront.cart.add")
                .with_methods(&["POST"]),
            RouteDefinition::new("cart_delete", "/checkout/cart/add", "storefront.cart.delete")
                .with_methods(&["DELETE"]),
            RouteDefinition::new("api_status", "/status", "api.status").with_host("api.shop.test"),
        ])
        .unwrap()
    }

    #[test]
    fn test_host_matcher() {
        let matcher = HostMatcher::new("example.com");
        assert!(matcher.matches("example.com"));
        assert!(matcher.matches("EXAMPLE.COM")); // Case insensitive
        assert!(!matcher.matches("other.com"));
    }

    #[test]
    fn test_match_extracts_params() {
        let result = table().match_path("/product/42", &Method::GET, "shop.test").unwrap();
        assert_eq!(result.route, "product_detail");
        assert_eq!(result.handler, "storefront.product.detail");
        assert_eq!(result.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_first_declared_wins() {
        // Both product patterns match "/product/42"; declaration order decides.
        let result = table().match_path("/product/42", &Method::GET, "").unwrap();
        assert_eq!(result.route, "product_detail");

        let result = table().match_path("/product/shoes", &Method::GET, "").unwrap();
        assert_eq!(result.route, "product_any");
    }

    #[test]
    fn test_head_accepted_for_get() {
        let result = table().match_path("/", &Method::HEAD, "").unwrap();
        assert_eq!(result.route, "homepage");
    }

    #[test]
    fn test_method_not_allowed_is_distinct() {
        match table().match_path("/checkout/cart/add", &Method::GET, "") {
            Err(RoutingError::MethodNotAllowed { allowed, .. }) => {
                assert_eq!(allowed, vec!["POST", "DELETE"]);
            }
            other => panic!("unexpected: {:?}", other),
        }

        match table().match_path("/nowhere", &Method::GET, "") {
            Err(RoutingError::NoMatch { path, .. }) => assert_eq!(path, "/nowhere"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_host_requirement() {
        assert!(table().match_path("/status", &Method::GET, "API.shop.test").is_ok());
        assert!(matches!(
            table().match_path("/status", &Method::GET, "www.shop.test"),
            Err(RoutingError::NoMatch { .. })
        ));
    }
}
