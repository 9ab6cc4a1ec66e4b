//! Route table caching.
//!
//! The compiled table lives in a shared cache slot under a fixed key. Reading
//! and writing are separate steps: [`RouteTableCache::read_or_build`] never
//! writes, [`RouteTableCache::write`] stores. [`RouteTableCache::get_route_table`]
//! composes both.
//!
//! Every slot carries a generation that [`CacheBackend::delete`] bumps. A
//! write only lands if the generation is still the one observed by the read
//! it came from, so a table built before an invalidation is never stored
//! after it. Concurrent misses within one generation may each rebuild; the
//! last write replaces an equivalent table.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::RoutingResult;
use crate::observability::metrics;
use crate::routing::loader::RouteTableBuilder;
use crate::routing::table::RouteTable;

/// Default cache key for the route table.
pub const ROUTE_TABLE_KEY: &str = "router_routes";

/// Shared cache storage keyed by string.
pub trait CacheBackend: Send + Sync {
    /// Current generation of `key`. Starts at zero.
    fn generation(&self, key: &str) -> u64;

    fn get(&self, key: &str) -> Option<Arc<RouteTable>>;

    /// Store `table` if `key` is still at `generation`. Returns whether it
    /// was stored.
    fn set_if_current(&self, key: &str, table: Arc<RouteTable>, generation: u64) -> bool;

    /// Drop the stored table and advance the generation.
    fn delete(&self, key: &str);
}

#[derive(Default)]
struct Slot {
    generation: u64,
    table: Option<Arc<RouteTable>>,
}

/// Process-wide in-memory cache backend.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    inner: Arc<DashMap<String, Slot>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently holding a table.
    pub fn len(&self) -> usize {
        self.inner.iter().filter(|slot| slot.table.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheBackend for InMemoryCache {
    fn generation(&self, key: &str) -> u64 {
        self.inner.get(key).map_or(0, |slot| slot.generation)
    }

    fn get(&self, key: &str) -> Option<Arc<RouteTable>> {
        self.inner.get(key).and_then(|slot| slot.table.clone())
    }

    fn set_if_current(&self, key: &str, table: Arc<RouteTable>, generation: u64) -> bool {
        match self.inner.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().generation != generation {
                    return false;
                }
                entry.get_mut().table = Some(table);
                true
            }
            Entry::Vacant(entry) => {
                if generation != 0 {
                    return false;
                }
                entry.insert(Slot {
                    generation,
                    table: Some(table),
                });
                true
            }
        }
    }

    fn delete(&self, key: &str) {
        let mut slot = self.inner.entry(key.to_string()).or_default();
        slot.generation += 1;
        slot.table = None;
    }
}

/// A table together with the cache generation it was read under.
#[derive(Debug, Clone)]
pub struct RouteTableRead {
    pub table: Arc<RouteTable>,
    generation: u64,
}

/// Read-through cache for the compiled route table.
#[derive(Clone)]
pub struct RouteTableCache {
    backend: Arc<dyn CacheBackend>,
    builder: RouteTableBuilder,
    key: String,
}

impl RouteTableCache {
    pub fn new(backend: Arc<dyn CacheBackend>, builder: RouteTableBuilder) -> Self {
        Self {
            backend,
            builder,
            key: ROUTE_TABLE_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Return the cached table, building a fresh one when the slot is
    /// absent or holds an empty table. Does not write.
    pub fn read_or_build(&self) -> RoutingResult<RouteTableRead> {
        // Generation first: a delete racing the build must void its write.
        let generation = self.backend.generation(&self.key);
        if let Some(table) = self.backend.get(&self.key) {
            if !table.is_empty() {
                return Ok(RouteTableRead { table, generation });
            }
        }

        let table = Arc::new(self.builder.build()?);
        metrics::record_route_table_build(table.len());
        tracing::info!(key = %self.key, routes = table.len(), "Route table built");
        Ok(RouteTableRead { table, generation })
    }

    /// Store a table read from this cache, unless the slot has been
    /// invalidated since. Returns whether the table was stored.
    pub fn write(&self, read: &RouteTableRead) -> bool {
        let stored = self
            .backend
            .set_if_current(&self.key, read.table.clone(), read.generation);
        if !stored {
            tracing::debug!(key = %self.key, "Route table invalidated during build, not cached");
        }
        stored
    }

    /// Read-or-build, then write back.
    pub fn get_route_table(&self) -> RoutingResult<Arc<RouteTable>> {
        let read = self.read_or_build()?;
        self.write(&read);
        Ok(read.table)
    }

    /// Drop the cached table so the next read rebuilds it.
    pub fn invalidate(&self) {
        self.backend.delete(&self.key);
        tracing::info!(key = %self.key, "Route table invalidated");
    }
}
