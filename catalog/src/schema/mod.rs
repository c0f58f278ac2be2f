//! Column schema of an entity table.
//!
//! An [`EntitySchema`] is an ordinary value built once per entity kind and
//! handed to whatever needs it, so tests can use trimmed or reordered schemas.

use std::collections::HashMap;

use crate::error::{CsvError, CsvResult};

pub const COUNTRY_SPECIFIC: &str = "Country Specific";
pub const CATALOG_NAME: &str = "Catalog Name";
pub const SPEC: &str = "Spec";
pub const PRIMARY_HIERARCHY: &str = "Primary Hierarchy";
pub const SECONDARY_HIERARCHIES: &str = "Secondary Hierarchies";
pub const INHERIT: &str = "Inherit?";
pub const DISPLAY_ATTRIBUTE: &str = "Display Attribute";
pub const ACG: &str = "ACG";
pub const LINKS: &str = "Links";
pub const LOCATIONS: &str = "Locations";
pub const SCRIPTS: &str = "Scripts";

/// Ordered column list for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    entity_type: &'static str,
    file_name: &'static str,
    columns: Vec<&'static str>,
    key_column: Option<&'static str>,
}

impl EntitySchema {
    pub fn new(entity_type: &'static str, file_name: &'static str) -> Self {
        Self {
            entity_type,
            file_name,
            columns: Vec::new(),
            key_column: None,
        }
    }

    /// Append a column to the schema.
    pub fn add_column(mut self, column: &'static str) -> Self {
        self.columns.push(column);
        self
    }

    /// Append the column naming each entity; input files must carry it.
    pub fn add_key_column(mut self, column: &'static str) -> Self {
        self.key_column = Some(column);
        self.add_column(column)
    }

    /// Schema of the Catalogs table.
    pub fn catalog() -> Self {
        Self::new("CATALOG", "Catalogs")
            .add_column(COUNTRY_SPECIFIC)
            .add_key_column(CATALOG_NAME)
            .add_column(SPEC)
            .add_column(PRIMARY_HIERARCHY)
            .add_column(SECONDARY_HIERARCHIES)
            .add_column(INHERIT)
            .add_column(DISPLAY_ATTRIBUTE)
            .add_column(ACG)
            .add_column(LINKS)
            .add_column(LOCATIONS)
            .add_column(SCRIPTS)
    }

    /// XML element name of the entity, e.g. `CATALOG`.
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// Base name of the input file, e.g. `Catalogs`.
    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Raw value of `column` in a positional row, or `""` if absent.
    pub fn field_value<'a>(&self, column: &str, fields: &'a [String]) -> &'a str {
        self.index_of(column)
            .and_then(|i| fields.get(i))
            .map_or("", String::as_str)
    }

    /// Key a positional row by this schema's column names.
    pub fn row(&self, fields: &[String]) -> FieldRow {
        self.columns
            .iter()
            .map(|column| (*column, self.field_value(column, fields)))
            .collect()
    }

    pub fn key_column(&self) -> Option<&'static str> {
        self.key_column
    }

    /// Position of each schema column within `headers`.
    ///
    /// Headers are matched by trimmed name. Columns absent from the header
    /// map to `None`, except the key column, whose absence is an error.
    pub fn header_positions(&self, headers: &[String]) -> CsvResult<Vec<Option<usize>>> {
        let positions: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|column| headers.iter().position(|h| h.trim() == *column))
            .collect();

        if let Some(key) = self.key_column {
            if self.index_of(key).and_then(|i| positions[i]).is_none() {
                return Err(CsvError::MissingColumn(key.to_string()));
            }
        }
        for (column, position) in self.columns.iter().zip(&positions) {
            if position.is_none() {
                tracing::debug!(%column, file = self.file_name, "column missing from header");
            }
        }
        Ok(positions)
    }
}

/// One row as column name -> raw string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRow {
    values: HashMap<String, String>,
}

impl FieldRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Raw value of `column`, or `""` when the row does not carry it.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map_or("", String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_catalog_schema_column_order() {
        let schema = EntitySchema::catalog();
        assert_eq!(schema.entity_type(), "CATALOG");
        assert_eq!(schema.file_name(), "Catalogs");
        assert_eq!(schema.columns().len(), 11);
        assert_eq!(schema.index_of(COUNTRY_SPECIFIC), Some(0));
        assert_eq!(schema.index_of(CATALOG_NAME), Some(1));
        assert_eq!(schema.index_of(SCRIPTS), Some(10));
        assert_eq!(schema.key_column(), Some(CATALOG_NAME));
    }

    #[test]
    fn test_field_value_short_row_is_empty() {
        let schema = EntitySchema::catalog();
        let row = fields(&["", "Products", "Product Spec"]);
        assert_eq!(schema.field_value(CATALOG_NAME, &row), "Products");
        assert_eq!(schema.field_value(SCRIPTS, &row), "");
        assert_eq!(schema.field_value("Unknown", &row), "");
    }

    #[test]
    fn test_row_keys_by_column() {
        let schema = EntitySchema::new("CATALOG", "Catalogs")
            .add_column(CATALOG_NAME)
            .add_column(SPEC);
        let row = schema.row(&fields(&["Products", "Product Spec"]));
        assert_eq!(row.get(CATALOG_NAME), "Products");
        assert_eq!(row.get(SPEC), "Product Spec");
        assert_eq!(row.get(ACG), "");
    }

    #[test]
    fn test_header_positions_allow_reordering() {
        let schema = EntitySchema::new("CATALOG", "Catalogs")
            .add_column(CATALOG_NAME)
            .add_column(SPEC);
        let headers = fields(&["Spec", " Catalog Name "]);
        assert_eq!(schema.header_positions(&headers).unwrap(), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_header_positions_optional_column_missing() {
        let schema = EntitySchema::catalog();
        let positions = schema
            .header_positions(&fields(&["Catalog Name", "Spec"]))
            .unwrap();
        assert_eq!(positions.len(), 11);
        assert_eq!(positions[0], None);
        assert_eq!(positions[1], Some(0));
        assert_eq!(positions[2], Some(1));
        assert!(positions[3..].iter().all(Option::is_none));
    }

    #[test]
    fn test_header_positions_key_column_missing() {
        let schema = EntitySchema::catalog();
        let err = schema
            .header_positions(&fields(&["Country Specific", "Spec"]))
            .unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn(ref c) if c == CATALOG_NAME));
    }
}
