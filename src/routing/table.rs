//! Compiled route table.
//!
//! # Design Decisions
//! - Immutable after construction (shared via `Arc` without locks)
//! - O(1) reverse lookup by name, O(n) forward scan in declaration order
//! - On a name collision the first registration keeps ownership; later
//!   duplicates are dropped with a warning

use std::collections::HashMap;

use crate::error::RoutingResult;
use crate::routing::definition::RouteDefinition;
use crate::routing::matcher::HostMatcher;
use crate::routing::pattern::CompiledPattern;

/// A route definition together with its compiled matchers.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub definition: RouteDefinition,
    pub pattern: CompiledPattern,
    pub host: Option<HostMatcher>,
    /// Allowed methods, uppercased.
    pub methods: Vec<String>,
}

impl CompiledRoute {
    pub fn compile(definition: RouteDefinition) -> RoutingResult<Self> {
        let pattern = CompiledPattern::compile(&definition)?;
        let host = definition.host.as_ref().map(HostMatcher::new);
        let methods = definition
            .methods
            .iter()
            .map(|m| m.trim().to_uppercase())
            .collect();
        Ok(Self {
            definition,
            pattern,
            host,
            methods,
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn is_seo(&self) -> bool {
        self.definition.options.seo
    }
}

/// Ordered collection of compiled routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Compile definitions in source order.
    pub fn build(definitions: impl IntoIterator<Item = RouteDefinition>) -> RoutingResult<Self> {
        let mut table = Self::default();
        for definition in definitions {
            if table.by_name.contains_key(&definition.name) {
                tracing::warn!(
                    route = %definition.name,
                    path = %definition.path,
                    "Duplicate route name ignored, first registration kept"
                );
                continue;
            }
            let route = CompiledRoute::compile(definition)?;
            table.by_name.insert(route.name().to_string(), table.routes.len());
            table.routes.push(route);
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&CompiledRoute> {
        self.by_name.get(name).map(|&index| &self.routes[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The definitions this table was built from, in table order.
    pub fn definitions(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter().map(|r| &r.definition)
    }
}

impl PartialEq for RouteTable {
    fn eq(&self, other: &Self) -> bool {
        self.definitions().eq(other.definitions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registration_keeps_name() {
        let table = RouteTable::build(vec![
            RouteDefinition::new("homepage", "/", "storefront.home"),
            RouteDefinition::new("listing", "/listing/{id}", "storefront.listing"),
            RouteDefinition::new("homepage", "/start", "plugin.home"),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        let home = table.get("homepage").unwrap();
        assert_eq!(home.definition.path, "/");
        assert_eq!(home.definition.handler, "storefront.home");
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn test_methods_normalized() {
        let table = RouteTable::build(vec![
            RouteDefinition::new("cart_add", "/cart", "h").with_methods(&["post", " get "]),
        ])
        .unwrap();
        assert_eq!(table.get("cart_add").unwrap().methods, vec!["POST", "GET"]);
    }

    #[test]
    fn test_equality_by_definitions() {
        let defs = vec![RouteDefinition::new("a", "/a", "h")];
        assert_eq!(
            RouteTable::build(defs.clone()).unwrap(),
            RouteTable::build(defs).unwrap()
        );
        assert_ne!(RouteTable::build(vec![]).unwrap(), RouteTable::build(vec![RouteDefinition::new("a", "/a", "h")]).unwrap());
    }
}
