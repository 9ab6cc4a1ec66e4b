//! Route source loading.
//!
//! # Responsibilities
//! - Read the declarative route resource (a TOML file)
//! - Scan handler directories for route files
//! - Concatenate everything in source order
//!
//! # Design Decisions
//! - A missing resource yields no routes, not an error
//! - A missing handler directory is skipped silently
//! - A source that exists but cannot be read or parsed is an error

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::error::RoutingResult;
use crate::routing::definition::RouteDefinition;
use crate::routing::table::RouteTable;

/// Errors raised by an existing route source.
#[derive(Debug, Error)]
pub enum RouteSourceError {
    #[error("Failed to read route source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse route source {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Capability that turns a route file into definitions.
pub trait RouteLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<RouteDefinition>, RouteSourceError>;
}

/// On-disk shape of a route file.
#[derive(Debug, Default, Deserialize)]
struct RouteFile {
    #[serde(default)]
    routes: Vec<RouteDefinition>,
}

/// Loads `[[routes]]` tables from TOML files.
#[derive(Debug, Default, Clone)]
pub struct TomlRouteLoader;

impl RouteLoader for TomlRouteLoader {
    fn load(&self, path: &Path) -> Result<Vec<RouteDefinition>, RouteSourceError> {
        let content = fs::read_to_string(path).map_err(|source| RouteSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RouteFile = toml::from_str(&content).map_err(|source| RouteSourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.routes)
    }
}

/// Builds route tables from the configured sources.
#[derive(Clone)]
pub struct RouteTableBuilder {
    resource: Option<PathBuf>,
    handler_dirs: Vec<PathBuf>,
    loader: Arc<dyn RouteLoader>,
}

impl RouteTableBuilder {
    pub fn new(resource: Option<PathBuf>, handler_dirs: Vec<PathBuf>) -> Self {
        Self {
            resource,
            handler_dirs,
            loader: Arc::new(TomlRouteLoader),
        }
    }

    /// Replace the file loader.
    pub fn with_loader(mut self, loader: Arc<dyn RouteLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Read every source and compile the result.
    pub fn build(&self) -> RoutingResult<RouteTable> {
        let mut definitions = Vec::new();

        if let Some(resource) = &self.resource {
            if resource.is_file() {
                definitions.extend(self.loader.load(resource)?);
            } else {
                tracing::debug!(path = %resource.display(), "Route resource not found, skipping");
            }
        }

        for dir in &self.handler_dirs {
            for file in route_files(dir)? {
                definitions.extend(self.loader.load(&file)?);
            }
        }

        RouteTable::build(definitions)
    }
}

/// Route files declared by a handler directory, in file-name order.
fn route_files(dir: &Path) -> Result<Vec<PathBuf>, RouteSourceError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| RouteSourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    Ok(files)
}
