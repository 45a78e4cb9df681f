//! Data-driven content for Bastide: serde schemas for facility and
//! technology tables, a format-detecting loader (RON, JSON, or TOML), and
//! the base content pack compiled into the crate.
//!
//! Data files express cross-references by key; the loader registers
//! everything with a [`bastide_core::catalog::CatalogBuilder`], which
//! resolves and validates the references when the catalog is frozen.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, GameData, base_game, load_path, load_str};
