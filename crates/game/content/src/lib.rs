//! Data-driven content for the arena simulation.
//!
//! This crate provides loaders for RON/TOML data files that produce the
//! static [`arena_core::Tables`] the runtime consumes:
//! - Formula constants (`config.toml`)
//! - Base stats and attribute tables (`tables.toml`)
//! - Stage table (`stages.ron`)
//! - Enemy pools and templates (`pools.ron`, `templates.ron`)
//!
//! Content is read-only once loaded and never appears in simulation state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, LoadResult, PoolLoader, StageLoader, StatTables, TablesLoader,
    TemplateLoader,
};
