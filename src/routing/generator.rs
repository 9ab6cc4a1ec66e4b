//! URL generation.
//!
//! # Responsibilities
//! - Substitute parameters into route patterns
//! - Prepend the active base of the request context
//! - Format as absolute path, absolute URL or relative path
//!
//! # Design Decisions
//! - Unused parameters become the query string
//! - Without a known host an absolute URL degrades to an absolute path
//! - A route bound to another host is always generated as an absolute URL

use std::iter;

use serde::Deserialize;
use url::{Position, Url};

use crate::error::{RoutingError, RoutingResult};
use crate::routing::context::RequestContext;
use crate::routing::definition::Params;
use crate::routing::table::RouteTable;

/// How a generated URL is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    /// `/en/product/42`
    #[default]
    AbsolutePath,
    /// `https://shop.test/en/product/42`
    AbsoluteUrl,
    /// `../product/42`, relative to the current path
    RelativePath,
}

/// A generated URL before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUrl {
    /// Absolute path including the active base.
    pub path: String,
    /// Encoded query string without `?`.
    pub query: Option<String>,
    /// Host the route is bound to, if any.
    pub host: Option<String>,
}

/// Capability: produce URLs for named routes.
pub trait UrlGenerator {
    fn generate(&self, name: &str, params: &Params, reference_type: ReferenceType) -> RoutingResult<String>;
}

/// Generator bound to one route table and request context.
pub struct ContextUrlGenerator<'a> {
    table: &'a RouteTable,
    ctx: &'a RequestContext,
}

impl<'a> ContextUrlGenerator<'a> {
    pub fn new(table: &'a RouteTable, ctx: &'a RequestContext) -> Self {
        Self { table, ctx }
    }

    /// Expand a route into an unformatted URL.
    pub fn resolve(&self, name: &str, params: &Params) -> RoutingResult<GeneratedUrl> {
        let route = self
            .table
            .get(name)
            .ok_or_else(|| RoutingError::RouteNotFound(name.to_string()))?;
        let (path, extra) = route.pattern.expand(name, params)?;

        let query = (!extra.is_empty()).then(|| {
            url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(extra.iter())
                .finish()
        });

        Ok(GeneratedUrl {
            path: format!("{}{}", self.ctx.base_url, path),
            query,
            host: route.host.as_ref().map(|h| h.host().to_string()),
        })
    }

    /// Write a generated URL in the requested form.
    pub fn format(&self, url: &GeneratedUrl, reference_type: ReferenceType) -> String {
        let (host, reference_type) = match &url.host {
            Some(route_host) if !route_host.eq_ignore_ascii_case(&self.ctx.host) => {
                (route_host.as_str(), ReferenceType::AbsoluteUrl)
            }
            _ => (self.ctx.host.as_str(), reference_type),
        };
        let query = url.query.as_deref();

        match reference_type {
            ReferenceType::AbsoluteUrl if !host.is_empty() => {
                absolute_url(&self.ctx.scheme, host, self.ctx.port, &url.path, query)
                    .unwrap_or_else(|| encode_path(&url.path, query))
            }
            ReferenceType::AbsoluteUrl | ReferenceType::AbsolutePath => encode_path(&url.path, query),
            ReferenceType::RelativePath => {
                let current = encode_path(&format!("{}{}", self.ctx.base_url, self.ctx.path_info), None);
                let mut relative = relative_path(&current, &encode_path(&url.path, None));
                if let Some(query) = query {
                    relative.push('?');
                    relative.push_str(query);
                }
                relative
            }
        }
    }
}

impl UrlGenerator for ContextUrlGenerator<'_> {
    fn generate(&self, name: &str, params: &Params, reference_type: ReferenceType) -> RoutingResult<String> {
        let url = self.resolve(name, params)?;
        Ok(self.format(&url, reference_type))
    }
}

fn absolute_url(scheme: &str, host: &str, port: Option<u16>, path: &str, query: Option<&str>) -> Option<String> {
    let mut url = Url::parse(&format!("{}://{}", scheme, host)).ok()?;
    if port.is_some() {
        url.set_port(port).ok()?;
    }
    url.set_path(path);
    url.set_query(query);
    Some(url.into())
}

/// Percent-encode a path (and query) the way it appears in a URL.
fn encode_path(path: &str, query: Option<&str>) -> String {
    match Url::parse("http://localhost") {
        Ok(mut url) => {
            url.set_path(path);
            url.set_query(query);
            url[Position::BeforePath..].to_string()
        }
        Err(_) => match query {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        },
    }
}

/// Path of `target` relative to the directory of `base`.
pub fn relative_path(base: &str, target: &str) -> String {
    if base == target {
        return String::new();
    }

    let mut source_dirs: Vec<&str> = base.strip_prefix('/').unwrap_or(base).split('/').collect();
    let mut target_dirs: Vec<&str> = target.strip_prefix('/').unwrap_or(target).split('/').collect();
    source_dirs.pop();
    let target_file = target_dirs.pop().unwrap_or_default();

    let common = source_dirs
        .iter()
        .zip(target_dirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let rest: Vec<&str> = target_dirs[common..]
        .iter()
        .copied()
        .chain(iter::once(target_file))
        .collect();
    let path = format!("{}{}", "../".repeat(source_dirs.len() - common), rest.join("/"));

    // A leading segment with a colon would read as a scheme.
    let looks_absolute = path.is_empty()
        || path.starts_with('/')
        || match (path.find(':'), path.find('/')) {
            (Some(colon), Some(slash)) => colon < slash,
            (Some(_), None) => true,
            _ => false,
        };
    if looks_absolute {
        format!("./{}", path)
    } else {
        path
    }
}
