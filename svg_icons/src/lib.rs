//! SVG icon retrieval for the loan management front-end
//!
//! An [`IconCache`] deduplicates fetches of `assets/icons/<name>.svg` and
//! evicts failures so they can be retried; an [`IconView`] turns declarative
//! inputs into sanitized, accessible host markup.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use api::{AssetFetcher, IconFetcher, LocalAssetFetcher};
pub use cache::{IconCache, SharedIcon};
pub use config::IconConfig;
pub use error::{ConfigError, ConfigResult, IconError, IconResult};
pub use sanitize::{sanitize_svg, sanitize_svg_document, TrustedMarkup};
pub use ui::{IconInputs, IconSize, IconView, RenderedIcon};
pub use utils::normalize_icon_name;
