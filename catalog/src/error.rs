//! Error types for the catalog deployment pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`LookupError`] - Cross-reference resolution failures
//! - [`EncodeError`] - XML/CSV emission errors
//! - [`CsvError`] - Input file reading errors
//! - [`CacheError`] - Entity snapshot loading errors
//! - [`ConfigError`] - Environment configuration errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Malformed entries inside a cell's grammar are not errors at all: the
//! decoder drops them and keeps going.

use thiserror::Error;

use crate::models::EntityKind;

// =============================================================================
// Lookup Errors
// =============================================================================

/// Errors resolving a referenced entity by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No entity of this kind is registered under the name.
    #[error("{kind} not found: '{name}'")]
    NotFound { kind: EntityKind, name: String },

    /// The resolver returned an entity of another kind.
    #[error("'{name}' is not a {kind}")]
    WrongKind { kind: EntityKind, name: String },
}

impl LookupError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}

// =============================================================================
// Encoding Errors
// =============================================================================

/// Errors while writing a catalog to an output sink.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The sink rejected a write.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// A link destination (or its spec) could not be resolved.
    #[error("Unresolved reference in catalog '{catalog}': {source}")]
    Lookup {
        catalog: String,
        #[source]
        source: LookupError,
    },
}

// =============================================================================
// CSV Input Errors
// =============================================================================

/// Errors while reading a Catalogs file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Tokenizer rejected the input.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A declared column is missing from the header row.
    #[error("Missing column in header: {0}")]
    MissingColumn(String),
}

// =============================================================================
// Cache Errors
// =============================================================================

/// Errors loading entities into the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// IO error.
    #[error("Cache IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Cache JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Two entities of the same kind share a name.
    #[error("Duplicate {kind} '{name}'")]
    Duplicate { kind: EntityKind, name: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be used.
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by the [`crate::pipeline`] driver.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for cache lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type for encoders.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for CSV input.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for cache loading.
pub type CacheResult<T> = Result<T, CacheError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
