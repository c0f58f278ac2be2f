//! High-level driver combining decode, cache and encoders.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_deploy::{pipeline, Config, EntitySchema};
//!
//! let config = Config::from_env()?;
//! let schema = EntitySchema::catalog();
//! let catalogs = pipeline::decode_file("Catalogs.csv", &schema, &config)?;
//! let cache = pipeline::build_cache(&catalogs, Some("specs.json".as_ref()))?;
//!
//! let mut out = std::io::stdout().lock();
//! pipeline::write_xml_document(&catalogs, &schema, &cache, &config, &mut out)?;
//! ```

use std::io::Write;
use std::path::Path;

use crate::cache::{EntityCache, EntityResolver};
use crate::config::Config;
use crate::decode::CatalogDecoder;
use crate::encode::{CsvEncoder, XmlEncoder};
use crate::error::PipelineResult;
use crate::models::Catalog;
use crate::parser::read_file;
use crate::schema::{EntitySchema, FieldRow};

/// Decode already-read rows, keeping their order.
pub fn decode_rows(rows: &[FieldRow], schema: &EntitySchema) -> Vec<Catalog> {
    let decoder = CatalogDecoder::new(schema);
    rows.iter().map(|row| decoder.decode(row)).collect()
}

/// Read and decode a Catalogs file.
pub fn decode_file(
    path: impl AsRef<Path>,
    schema: &EntitySchema,
    config: &Config,
) -> PipelineResult<Vec<Catalog>> {
    let rows = read_file(path.as_ref(), schema, config.delimiter)?;
    let catalogs = decode_rows(&rows, schema);
    tracing::info!(
        count = catalogs.len(),
        path = %path.as_ref().display(),
        "decoded catalogs"
    );
    Ok(catalogs)
}

/// Build a cache holding `catalogs` and, optionally, specs from a JSON file.
///
/// Catalog names must be unique.
pub fn build_cache(catalogs: &[Catalog], specs: Option<&Path>) -> PipelineResult<EntityCache> {
    let mut cache = EntityCache::new();
    for catalog in catalogs {
        cache.insert_unique(catalog.clone())?;
    }
    if let Some(path) = specs {
        cache.load_specs(path)?;
    }
    Ok(cache)
}

/// Write one XML block per catalog, stopping at the first failure.
///
/// Returns the number of catalogs written. On error the sink may hold a
/// partial document that the caller should discard.
pub fn write_xml_document<R, W>(
    catalogs: &[Catalog],
    schema: &EntitySchema,
    resolver: &R,
    config: &Config,
    out: &mut W,
) -> PipelineResult<usize>
where
    R: EntityResolver + ?Sized,
    W: Write,
{
    let encoder = XmlEncoder::new(schema, resolver, config);
    for catalog in catalogs {
        encoder.write(catalog, out)?;
    }
    out.flush()?;
    tracing::info!(count = catalogs.len(), "wrote catalog XML");
    Ok(catalogs.len())
}

/// Write a header row and one row per catalog.
pub fn write_csv_document<W: Write>(
    catalogs: &[Catalog],
    schema: &EntitySchema,
    config: &Config,
    out: &mut W,
) -> PipelineResult<usize> {
    let encoder = CsvEncoder::new(config);
    encoder.write_header(schema, out)?;
    for catalog in catalogs {
        encoder.write(catalog, out)?;
    }
    out.flush()?;
    tracing::info!(count = catalogs.len(), "wrote catalog CSV");
    Ok(catalogs.len())
}
