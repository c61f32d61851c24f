use crate::api::IconFetcher;
use crate::error::{IconError, IconResult};
use crate::sanitize::{sanitize_svg_document, TrustedMarkup};
use crate::utils::{normalize_icon_name, DEFAULT_EXTENSION};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Handle to one icon fetch, shared by every requester of the same name.
///
/// Awaiting a clone never starts another fetch; all clones see the same value.
pub type SharedIcon = Shared<BoxFuture<'static, IconResult<TrustedMarkup>>>;

struct Entry {
    id: u64,
    handle: SharedIcon,
}

#[derive(Default)]
struct Entries {
    next_id: u64,
    by_name: HashMap<String, Entry>,
}

/// Deduplicating in-memory cache of sanitized icon markup.
///
/// Each fetch runs on its own Tokio task, so `get` must be called from
/// within a runtime. Successful results stay cached for the lifetime of the
/// cache; failed fetches are evicted so the next request retries.
pub struct IconCache {
    fetcher: Arc<dyn IconFetcher>,
    extension: String,
    entries: Arc<Mutex<Entries>>,
}

impl IconCache {
    /// Create a cache for `*.svg` icons
    pub fn new(fetcher: Arc<dyn IconFetcher>) -> Self {
        Self::with_extension(fetcher, DEFAULT_EXTENSION)
    }

    /// Create a cache whose names may carry a different redundant extension
    pub fn with_extension(fetcher: Arc<dyn IconFetcher>, extension: &str) -> Self {
        Self {
            fetcher,
            extension: extension.to_string(),
            entries: Arc::new(Mutex::new(Entries::default())),
        }
    }

    /// Normalize a raw name into the cache key used by this cache
    pub fn normalize(&self, name: &str) -> String {
        normalize_icon_name(name, &self.extension)
    }

    /// Get the shared result for an icon, starting a fetch on a miss
    pub fn get(&self, name: &str) -> SharedIcon {
        let key = self.normalize(name);
        if key.is_empty() {
            return futures::future::ready(Ok(TrustedMarkup::empty()))
                .boxed()
                .shared();
        }

        let mut entries = lock(&self.entries);
        if let Some(entry) = entries.by_name.get(&key) {
            log::debug!("Icon cache hit for '{}'", key);
            return entry.handle.clone();
        }

        log::info!("Icon cache miss for '{}', fetching", key);
        let id = entries.next_id;
        entries.next_id += 1;

        let task = tokio::spawn(Self::load(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.entries),
            key.clone(),
            id,
        ));
        let task_entries = Arc::clone(&self.entries);
        let task_key = key.clone();
        let handle = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    let error = IconError::Cancelled(format!("{}: {}", task_key, e));
                    evict(&task_entries, &task_key, id, &error);
                    Err(error)
                }
            }
        }
        .boxed()
        .shared();

        entries.by_name.insert(
            key,
            Entry {
                id,
                handle: handle.clone(),
            },
        );
        handle
    }

    /// Number of live entries (pending or resolved)
    pub fn len(&self) -> usize {
        lock(&self.entries).by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether a live entry exists for `name` (after normalization)
    pub fn contains(&self, name: &str) -> bool {
        let key = self.normalize(name);
        lock(&self.entries).by_name.contains_key(&key)
    }

    /// Fetch, validate and sanitize one icon; evicts its own entry on failure
    async fn load(
        fetcher: Arc<dyn IconFetcher>,
        entries: Arc<Mutex<Entries>>,
        key: String,
        id: u64,
    ) -> IconResult<TrustedMarkup> {
        let result = fetcher.fetch(&key).await.and_then(|raw| {
            sanitize_svg_document(&raw).map_err(|e| match e {
                IconError::Malformed(reason) => {
                    IconError::Malformed(format!("'{}' is not SVG markup: {}", key, reason))
                }
                other => other,
            })
        });

        match &result {
            Err(e) => evict(&entries, &key, id, e),
            Ok(_) => log::debug!("Cached icon '{}'", key),
        }

        result
    }
}

/// Remove the entry for `key` only if it is still the one started with `id`
fn evict(entries: &Mutex<Entries>, key: &str, id: u64, error: &IconError) {
    let mut entries = lock(entries);
    if entries.by_name.get(key).is_some_and(|entry| entry.id == id) {
        entries.by_name.remove(key);
    }
    log::warn!("Failed to load icon '{}', evicted from cache: {}", key, error);
}

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "icon_cache_tests.rs"]
mod tests;
