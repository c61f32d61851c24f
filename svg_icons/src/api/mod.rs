//! Fetch collaborators that retrieve raw icon markup

pub mod assets;
pub mod local;

use crate::error::IconResult;
use futures::future::BoxFuture;

pub use assets::AssetFetcher;
pub use local::LocalAssetFetcher;

/// Source of raw icon markup, keyed by normalized icon name.
///
/// Implementations perform a single read-only retrieval per call and never
/// cache; deduplication belongs to [`crate::cache::IconCache`].
pub trait IconFetcher: Send + Sync {
    /// Fetch the raw text for `name` (already normalized, never empty)
    fn fetch(&self, name: &str) -> BoxFuture<'static, IconResult<String>>;
}
