//! Configuration and route source watcher for hot reload.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Monitors the configuration file and the route sources it names.
///
/// Any change reloads the configuration file and publishes it; the
/// consumer swaps its stores and drops the cached route table. The watched
/// route sources follow the reloaded configuration, so a handler directory
/// added by a reload (or created after startup) is watched from then on.
pub struct ConfigWatcher {
    path: PathBuf,
    route_sources: Vec<PathBuf>,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                route_sources: Vec::new(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Also watch the route resource and handler directories of `config`.
    pub fn with_route_sources(mut self, config: &RouterConfig) -> Self {
        self.route_sources = route_sources(config);
        self
    }

    /// Start watching in a background thread.
    ///
    /// The thread owns the notify watcher and exits once the update
    /// receiver is dropped.
    pub fn run(self) -> Result<JoinHandle<()>, notify::Error> {
        let (event_tx, event_rx) = std_mpsc::channel::<notify::Result<Event>>();
        let mut watcher = RecommendedWatcher::new(
            event_tx,
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        let mut watched = BTreeSet::new();
        sync_watches(&mut watcher, &mut watched, &self.route_sources);
        tracing::info!(path = ?self.path, sources = watched.len(), "Config watcher started");

        let handle = std::thread::spawn(move || {
            for res in event_rx {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!("Watch error: {:?}", e);
                        continue;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
                    continue;
                }

                tracing::info!(paths = ?event.paths, "Router sources changed, reloading...");
                match load_config(&self.path) {
                    Ok(new_config) => {
                        sync_watches(&mut watcher, &mut watched, &route_sources(&new_config));
                        if self.update_tx.send(new_config).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to reload config: {}. Keeping current configuration.", e);
                    }
                }
            }
            tracing::debug!("Config watcher stopped");
        });

        Ok(handle)
    }
}

/// Route resource followed by the handler directories.
fn route_sources(config: &RouterConfig) -> Vec<PathBuf> {
    config
        .routing
        .resource
        .iter()
        .chain(config.routing.handler_dirs.iter())
        .cloned()
        .collect()
}

/// Paths to stop and start watching so that exactly the existing `wanted`
/// sources are watched.
fn watch_changes(watched: &BTreeSet<PathBuf>, wanted: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let wanted: BTreeSet<PathBuf> = wanted.iter().filter(|p| p.exists()).cloned().collect();
    let removed = watched.difference(&wanted).cloned().collect();
    let added = wanted.difference(watched).cloned().collect();
    (removed, added)
}

fn sync_watches(watcher: &mut RecommendedWatcher, watched: &mut BTreeSet<PathBuf>, wanted: &[PathBuf]) {
    for source in wanted.iter().filter(|p| !p.exists()) {
        // Missing sources are retried on the next reload.
        tracing::debug!(path = ?source, "Route source missing, not watched");
    }

    let (removed, added) = watch_changes(watched, wanted);
    for source in removed {
        if let Err(e) = watcher.unwatch(&source) {
            tracing::debug!(path = ?source, error = %e, "Route source already unwatched");
        }
        watched.remove(&source);
    }
    for source in added {
        let mode = if source.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        match watcher.watch(&source, mode) {
            Ok(()) => {
                tracing::info!(path = ?source, "Watching route source");
                watched.insert(source);
            }
            Err(e) => tracing::warn!(path = ?source, error = %e, "Failed to watch route source"),
        }
    }
}
