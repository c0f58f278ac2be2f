//! Catalog row decoder.
//!
//! Turns one [`FieldRow`] into a [`Catalog`]. Decoding never fails: entries
//! of the Links, Locations and Scripts cells that do not match their grammar
//! are dropped, and later entries overwrite earlier ones with the same key.
//!
//! ```text
//! Secondary Hierarchies   H1,H2
//! Links                   path|Catalog,path|Catalog
//! Locations               Hierarchy=Spec|Coll1,Coll2  (one per line)
//! Scripts                 TYPE|Script,TYPE|Script
//! ```

use std::collections::BTreeMap;

use crate::models::{Catalog, LocationAttribute, LocationAttributes, ScriptType};
use crate::parser::{
    check_boolean, split_list, split_pair, LINE_DELIMITER, LIST_DELIMITER, LOCATION_DELIMITER,
    PAIR_DELIMITER,
};
use crate::schema::{
    EntitySchema, FieldRow, ACG, CATALOG_NAME, COUNTRY_SPECIFIC, DISPLAY_ATTRIBUTE, INHERIT,
    LINKS, LOCATIONS, PRIMARY_HIERARCHY, SCRIPTS, SECONDARY_HIERARCHIES, SPEC,
};

/// Script tag whose value is the catalog's user-defined core attribute group.
pub const USER_DEFINED_CORE_ATTRIBUTE_GROUP: &str = "USER_DEFINED_CORE_ATTRIBUTE_GROUP";

/// Decodes rows of the Catalogs table.
#[derive(Debug, Clone)]
pub struct CatalogDecoder<'a> {
    schema: &'a EntitySchema,
}

impl<'a> CatalogDecoder<'a> {
    pub fn new(schema: &'a EntitySchema) -> Self {
        Self { schema }
    }

    /// Decode a positional row laid out in schema column order.
    pub fn decode_fields(&self, fields: &[String]) -> Catalog {
        decode_row(&self.schema.row(fields))
    }

    /// Decode a row keyed by column name.
    pub fn decode(&self, row: &FieldRow) -> Catalog {
        decode_row(row)
    }
}

/// Decode a row keyed by the Catalogs column names.
pub fn decode_row(row: &FieldRow) -> Catalog {
    let mut catalog = Catalog {
        name: row.get(CATALOG_NAME).to_string(),
        country_specific: row.get(COUNTRY_SPECIFIC).to_string(),
        spec_name: row.get(SPEC).to_string(),
        primary_hierarchy: row.get(PRIMARY_HIERARCHY).to_string(),
        secondary_hierarchies: parse_secondary_hierarchies(row.get(SECONDARY_HIERARCHIES)),
        inheritance: check_boolean(row.get(INHERIT)),
        display_attribute: row.get(DISPLAY_ATTRIBUTE).to_string(),
        acg: row.get(ACG).to_string(),
        links: parse_links(row.get(LINKS)),
        locations: parse_locations(row.get(LOCATIONS)),
        ..Catalog::default()
    };
    apply_scripts(&mut catalog, row.get(SCRIPTS));

    tracing::debug!(
        catalog = %catalog.name,
        links = catalog.links.len(),
        locations = catalog.locations.len(),
        scripts = catalog.scripts.len(),
        "decoded catalog"
    );
    catalog
}

/// Parse the Secondary Hierarchies cell. An empty cell has no hierarchies.
pub fn parse_secondary_hierarchies(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    split_list(text, LIST_DELIMITER)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Parse the Links cell into attribute path -> destination catalog.
pub fn parse_links(text: &str) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for token in split_list(text, LIST_DELIMITER) {
        match split_pair(token, PAIR_DELIMITER) {
            Some((path, destination)) => {
                if let Some(previous) = links.insert(path.to_string(), destination.to_string()) {
                    tracing::debug!(%path, %previous, %destination, "link overwritten");
                }
            }
            None => tracing::debug!(%token, "dropping malformed link"),
        }
    }
    links
}

/// Parse the Locations cell, one `Hierarchy=Spec|Coll1,Coll2` entry per line.
pub fn parse_locations(text: &str) -> LocationAttributes {
    let mut locations = LocationAttributes::new();
    for entry in split_list(text, LINE_DELIMITER) {
        let Some(location) = parse_location(entry) else {
            tracing::debug!(%entry, "dropping malformed location");
            continue;
        };
        if let Some(previous) = locations.insert(location) {
            tracing::debug!(
                hierarchy = %previous.hierarchy,
                spec = %previous.spec,
                "location overwritten"
            );
        }
    }
    locations
}

fn parse_location(entry: &str) -> Option<LocationAttribute> {
    let (hierarchy, definition) = split_pair(entry, LOCATION_DELIMITER)?;
    let (spec, collections) = split_pair(definition, PAIR_DELIMITER)?;
    Some(LocationAttribute {
        hierarchy: hierarchy.to_string(),
        spec: spec.to_string(),
        collections: split_list(collections, LIST_DELIMITER)
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// Parse the Scripts cell into `catalog`, diverting the reserved tag.
fn apply_scripts(catalog: &mut Catalog, text: &str) {
    for token in split_list(text, LIST_DELIMITER) {
        let Some((tag, script)) = split_pair(token, PAIR_DELIMITER) else {
            tracing::debug!(%token, "dropping malformed script binding");
            continue;
        };
        if tag == USER_DEFINED_CORE_ATTRIBUTE_GROUP {
            catalog.user_defined_core_attr_group = script.to_string();
        } else {
            catalog.scripts.insert(ScriptType::from_tag(tag), script.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> FieldRow {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_decode_plain_columns() {
        let catalog = decode_row(&row(&[
            (CATALOG_NAME, "Products"),
            (SPEC, "Product Spec"),
            (PRIMARY_HIERARCHY, "Product Hierarchy"),
            (INHERIT, "true"),
            (DISPLAY_ATTRIBUTE, "Product Spec/Name"),
            (ACG, "Buyers"),
        ]));

        assert_eq!(catalog.name, "Products");
        assert_eq!(catalog.spec_name, "Product Spec");
        assert_eq!(catalog.primary_hierarchy, "Product Hierarchy");
        assert!(catalog.inheritance);
        assert_eq!(catalog.display_attribute, "Product Spec/Name");
        assert_eq!(catalog.acg, "Buyers");
        assert!(catalog.secondary_hierarchies.is_empty());
        assert!(catalog.links.is_empty());
        assert!(catalog.locations.is_empty());
        assert!(catalog.scripts.is_empty());
        assert_eq!(catalog.user_defined_core_attr_group, "");
    }

    #[test]
    fn test_inherit_defaults_to_false() {
        let catalog = decode_row(&row(&[(INHERIT, "no")]));
        assert!(!catalog.inheritance);
        let catalog = decode_row(&row(&[]));
        assert!(!catalog.inheritance);
    }

    #[test]
    fn test_empty_secondary_hierarchies() {
        assert!(parse_secondary_hierarchies("").is_empty());
    }

    #[test]
    fn test_secondary_hierarchies_keep_order() {
        assert_eq!(
            parse_secondary_hierarchies("Web,Print,Archive"),
            vec!["Web", "Print", "Archive"]
        );
    }

    #[test]
    fn test_links_last_occurrence_wins() {
        let links = parse_links("A|X,A|Y");
        assert_eq!(links.len(), 1);
        assert_eq!(links["A"], "Y");
    }

    #[test]
    fn test_malformed_links_dropped() {
        let links = parse_links("A|X,BADTOKEN");
        assert_eq!(links.len(), 1);
        assert_eq!(links["A"], "X");

        let links = parse_links("A|X|Z,B|");
        assert!(links.is_empty());
    }

    #[test]
    fn test_links_sorted_by_path() {
        let links = parse_links("b|Y,a|X");
        let keys: Vec<&str> = links.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_locations_single_entry() {
        let locations = parse_locations("H1=S1|C1,C2");
        assert_eq!(locations.len(), 1);
        let location = locations.get("H1").unwrap();
        assert_eq!(location.spec, "S1");
        assert_eq!(location.collections, vec!["C1", "C2"]);
    }

    #[test]
    fn test_locations_multiple_lines() {
        let locations = parse_locations("Stores=Store Spec|A\nRegions=Region Spec|B,C");
        let hierarchies: Vec<&str> = locations.iter().map(|l| l.hierarchy.as_str()).collect();
        assert_eq!(hierarchies, vec!["Regions", "Stores"]);
    }

    #[test]
    fn test_locations_malformed_entries_dropped() {
        let locations = parse_locations("NoEquals\nH1=NoPipe\nA=B=C|D\nH2=S2|C1");
        assert_eq!(locations.len(), 1);
        assert!(locations.get("H2").is_some());
    }

    #[test]
    fn test_locations_same_hierarchy_replaces_spec() {
        // A hierarchy holds one secondary spec: the second line wins outright.
        let locations = parse_locations("H1=S1|C1,C2\nH1=S2|C3");
        assert_eq!(locations.len(), 1);
        let location = locations.get("H1").unwrap();
        assert_eq!(location.spec, "S2");
        assert_eq!(location.collections, vec!["C3"]);
    }

    #[test]
    fn test_scripts_and_reserved_group() {
        let mut catalog = Catalog::default();
        apply_scripts(
            &mut catalog,
            "PRE_SCRIPT_NAME|Pre,USER_DEFINED_CORE_ATTRIBUTE_GROUP|Core Group,SCRIPT_NAME|Post,oops",
        );

        assert_eq!(catalog.user_defined_core_attr_group, "Core Group");
        assert_eq!(catalog.scripts.len(), 2);
        assert_eq!(catalog.scripts[&ScriptType::PreProcessing], "Pre");
        assert_eq!(catalog.scripts[&ScriptType::PostProcessing], "Post");
    }

    #[test]
    fn test_unknown_script_tag_kept() {
        let mut catalog = Catalog::default();
        apply_scripts(&mut catalog, "AUDIT_SCRIPT|Audit");
        assert_eq!(
            catalog.scripts[&ScriptType::Other("AUDIT_SCRIPT".into())],
            "Audit"
        );
    }

    #[test]
    fn test_decoder_positional_fields() {
        let schema = EntitySchema::catalog();
        let decoder = CatalogDecoder::new(&schema);
        let fields: Vec<String> = [
            "", "Products", "Product Spec", "Product Hierarchy", "Web,Print", "yes",
            "Product Spec/Name", "Default", "Product Spec/Supplier|Suppliers",
            "Stores=Store Spec|Local", "ENTRY_BUILD_SCRIPT|Build",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let catalog = decoder.decode_fields(&fields);
        assert_eq!(catalog.name, "Products");
        assert_eq!(catalog.secondary_hierarchies, vec!["Web", "Print"]);
        assert!(catalog.inheritance);
        assert_eq!(catalog.links["Product Spec/Supplier"], "Suppliers");
        assert_eq!(catalog.locations.get("Stores").unwrap().collections, vec!["Local"]);
        assert_eq!(catalog.scripts[&ScriptType::EntryBuild], "Build");
    }
}
