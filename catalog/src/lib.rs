//! # Catalog Deploy - Catalogs.csv to provisioning XML
//!
//! Decodes rows of the Catalogs table, whose cells pack lists, pairs and
//! per-hierarchy maps into a small delimiter grammar, and re-encodes them
//! as normalized CSV or as provisioning XML.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ Catalogs.csv │────▶│   Parser    │────▶│   Decoder   │──┬─▶│  CSV Encoder │
//! │  (any enc.)  │     │ (FieldRows) │     │  (Catalog)  │  │  └──────────────┘
//! └──────────────┘     └─────────────┘     └─────────────┘  │  ┌──────────────┐
//!                                                           └─▶│  XML Encoder │◀── EntityCache
//!                                                              └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_deploy::{decode_row, Config, EntityCache, EntitySchema, FieldRow, XmlEncoder};
//!
//! let row: FieldRow = [("Catalog Name", "Products"), ("Spec", "Product Spec")]
//!     .into_iter()
//!     .collect();
//! let catalog = decode_row(&row);
//!
//! let schema = EntitySchema::catalog();
//! let cache = EntityCache::new();
//! let config = Config::default();
//! let xml = XmlEncoder::new(&schema, &cache, &config).to_xml(&catalog)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment-driven settings
//! - [`models`] - Catalog, Spec and script/location types
//! - [`schema`] - Column schema and keyed rows
//! - [`parser`] - Cell grammar primitives and file reading
//! - [`decode`] - Row to [`Catalog`] decoding
//! - [`cache`] - Entity resolution for cross-references
//! - [`encode`] - CSV and XML encoders
//! - [`pipeline`] - File-level driver

// Core modules
pub mod config;
pub mod error;
pub mod models;
pub mod schema;

// Parsing
pub mod decode;
pub mod parser;

// Resolution
pub mod cache;

// Output
pub mod encode;
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CacheError, ConfigError, CsvError, EncodeError, LookupError, PipelineError, PipelineResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    Catalog, Entity, EntityKind, LocationAttribute, LocationAttributes, ScriptType, Spec,
};

// =============================================================================
// Re-exports - Schema, Config, Decode
// =============================================================================

pub use config::Config;
pub use decode::{decode_row, CatalogDecoder, USER_DEFINED_CORE_ATTRIBUTE_GROUP};
pub use schema::{EntitySchema, FieldRow};

// =============================================================================
// Re-exports - Cache and Encoders
// =============================================================================

pub use cache::{EntityCache, EntityResolver};
pub use encode::{CsvEncoder, XmlEncoder};
