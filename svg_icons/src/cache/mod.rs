//! Caching layer for fetched icon markup

pub mod icon_cache;

pub use icon_cache::{IconCache, SharedIcon};
