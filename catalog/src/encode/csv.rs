//! Normalized CSV row for one catalog.
//!
//! Composite cells are re-joined with the same grammar the decoder reads, in
//! key order. The user-defined core attribute group is not written back into
//! the Scripts cell, so it does not survive a CSV round trip.
//!
//! A location whose collection list is empty is written as `Hierarchy=Spec|`.
//! The decoder rejects that entry (a pair with an empty right-hand side), so
//! it does not survive a round trip either. Input such as `H1=S1|,` decodes
//! to exactly that state.

use std::io::Write;

use crate::config::Config;
use crate::error::EncodeResult;
use crate::models::Catalog;
use crate::parser::{
    escape_for_csv, join_row, LINE_DELIMITER, LIST_DELIMITER, LOCATION_DELIMITER,
    PAIR_DELIMITER,
};
use crate::schema::EntitySchema;

/// Writes catalogs as rows of the Catalogs table.
#[derive(Debug, Clone)]
pub struct CsvEncoder<'a> {
    config: &'a Config,
}

impl<'a> CsvEncoder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn escape(&self, text: &str) -> String {
        escape_for_csv(text, self.config.delimiter)
    }

    /// Fields of one row, in Catalogs column order.
    pub fn encode(&self, catalog: &Catalog) -> Vec<String> {
        vec![
            self.escape(&catalog.country_specific),
            self.escape(&catalog.name),
            self.escape(&catalog.spec_name),
            self.escape(&catalog.primary_hierarchy),
            self.escape(&join_secondary_hierarchies(catalog)),
            catalog.inheritance.to_string(),
            self.escape(&catalog.display_attribute),
            self.escape(&catalog.acg),
            self.escape(&join_links(catalog)),
            self.escape(&join_locations(catalog)),
            self.escape(&join_scripts(catalog)),
        ]
    }

    /// Header line naming every column of `schema`.
    pub fn write_header<W: Write>(&self, schema: &EntitySchema, out: &mut W) -> EncodeResult<()> {
        let fields: Vec<String> = schema.columns().iter().map(|c| self.escape(c)).collect();
        out.write_all(join_row(&fields, self.config.delimiter).as_bytes())?;
        Ok(())
    }

    /// Write one catalog as a single line.
    pub fn write<W: Write>(&self, catalog: &Catalog, out: &mut W) -> EncodeResult<()> {
        let fields = self.encode(catalog);
        out.write_all(join_row(&fields, self.config.delimiter).as_bytes())?;
        Ok(())
    }
}

fn join_secondary_hierarchies(catalog: &Catalog) -> String {
    catalog.secondary_hierarchies.join(&LIST_DELIMITER.to_string())
}

fn join_links(catalog: &Catalog) -> String {
    catalog
        .links
        .iter()
        .map(|(path, destination)| format!("{path}{PAIR_DELIMITER}{destination}"))
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string())
}

fn join_locations(catalog: &Catalog) -> String {
    catalog
        .locations
        .iter()
        .map(|location| {
            format!(
                "{}{LOCATION_DELIMITER}{}{PAIR_DELIMITER}{}",
                location.hierarchy,
                location.spec,
                location.collections.join(&LIST_DELIMITER.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join(&LINE_DELIMITER.to_string())
}

fn join_scripts(catalog: &Catalog) -> String {
    catalog
        .scripts
        .iter()
        .map(|(script_type, script)| format!("{}{PAIR_DELIMITER}{script}", script_type.tag()))
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string())
}
