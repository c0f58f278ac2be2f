//! Domain models for catalog deployment.
//!
//! - [`Catalog`] - One decoded row of the Catalogs table
//! - [`LocationAttributes`] - Per-hierarchy secondary spec and collections
//! - [`ScriptType`] - Script binding tags and their XML element names
//! - [`Spec`] - The slice of a spec entity needed to resolve links
//! - [`Entity`] / [`EntityKind`] - What the entity cache hands back

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Entity Kinds
// =============================================================================

/// Kind of entity held in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Catalog,
    Spec,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => f.write_str("Catalog"),
            Self::Spec => f.write_str("Spec"),
        }
    }
}

// =============================================================================
// Script Types
// =============================================================================

/// Tag of a script bound to a catalog.
///
/// The four known tags map to fixed XML element names. Anything else is kept
/// as [`ScriptType::Other`] and maps to an empty element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ScriptType {
    /// `PRE_SCRIPT_NAME`
    PreProcessing,
    /// `ENTRY_BUILD_SCRIPT`
    EntryBuild,
    /// `POST_SAVE_SCRIPT_NAME`
    PostSave,
    /// `SCRIPT_NAME`
    PostProcessing,
    /// Unrecognized tag, carried verbatim.
    Other(String),
}

impl ScriptType {
    /// Parse a tag as it appears in the Scripts cell.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "PRE_SCRIPT_NAME" => Self::PreProcessing,
            "ENTRY_BUILD_SCRIPT" => Self::EntryBuild,
            "POST_SAVE_SCRIPT_NAME" => Self::PostSave,
            "SCRIPT_NAME" => Self::PostProcessing,
            other => Self::Other(other.to_string()),
        }
    }

    /// Tag as written back to the Scripts cell.
    pub fn tag(&self) -> &str {
        match self {
            Self::PreProcessing => "PRE_SCRIPT_NAME",
            Self::EntryBuild => "ENTRY_BUILD_SCRIPT",
            Self::PostSave => "POST_SAVE_SCRIPT_NAME",
            Self::PostProcessing => "SCRIPT_NAME",
            Self::Other(tag) => tag,
        }
    }

    /// Element name used in the provisioning XML (empty for unknown tags).
    pub fn xml_tag(&self) -> &'static str {
        match self {
            Self::PreProcessing => "PreProcessingScript",
            Self::EntryBuild => "EntryBuildScript",
            Self::PostSave => "PostSaveScript",
            Self::PostProcessing => "PostProcessingScript",
            Self::Other(_) => "",
        }
    }
}

// Maps keyed by script type iterate in tag order, not variant order.
impl Ord for ScriptType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag().cmp(other.tag())
    }
}

impl PartialOrd for ScriptType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<String> for ScriptType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ScriptType> for String {
    fn from(script_type: ScriptType) -> Self {
        script_type.tag().to_string()
    }
}

// =============================================================================
// Location Attributes
// =============================================================================

/// Secondary spec and inherited attribute collections for one hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationAttribute {
    pub hierarchy: String,
    pub spec: String,
    /// Collection names, in input order.
    pub collections: Vec<String>,
}

/// Location attributes keyed by hierarchy name.
///
/// A hierarchy carries at most one entry: inserting a second entry for the
/// same hierarchy replaces the first one entirely, spec and collections alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationAttributes {
    by_hierarchy: BTreeMap<String, LocationAttribute>,
}

impl LocationAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced (if any).
    pub fn insert(&mut self, location: LocationAttribute) -> Option<LocationAttribute> {
        self.by_hierarchy.insert(location.hierarchy.clone(), location)
    }

    pub fn get(&self, hierarchy: &str) -> Option<&LocationAttribute> {
        self.by_hierarchy.get(hierarchy)
    }

    /// Entries sorted by hierarchy name.
    pub fn iter(&self) -> impl Iterator<Item = &LocationAttribute> {
        self.by_hierarchy.values()
    }

    pub fn len(&self) -> usize {
        self.by_hierarchy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hierarchy.is_empty()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// One decoded row of the Catalogs table.
///
/// Every cross-reference (spec, hierarchies, ACG, link destinations) is held
/// by name only and resolved at encode time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Unique name of the catalog.
    pub name: String,
    /// Country-specific marker column, carried but not interpreted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country_specific: String,
    pub spec_name: String,
    pub primary_hierarchy: String,
    /// Additional hierarchies, in input order.
    #[serde(default)]
    pub secondary_hierarchies: Vec<String>,
    #[serde(default)]
    pub inheritance: bool,
    pub display_attribute: String,
    /// Access control group; empty or the configured sentinel means default.
    pub acg: String,
    /// Source attribute path -> destination catalog name.
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(default)]
    pub locations: LocationAttributes,
    #[serde(default)]
    pub scripts: BTreeMap<ScriptType, String>,
    /// Attribute group carried in the Scripts cell under a reserved tag.
    #[serde(default)]
    pub user_defined_core_attr_group: String,
}

impl Catalog {
    /// Create a catalog with only its name and spec set.
    pub fn new(name: impl Into<String>, spec_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_name: spec_name.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// Spec
// =============================================================================

/// A spec entity, reduced to what link resolution needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    pub name: String,
    /// Attribute path of the spec's primary key, e.g. `Product Spec/SKU`.
    pub primary_key_path: String,
}

impl Spec {
    pub fn new(name: impl Into<String>, primary_key_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key_path: primary_key_path.into(),
        }
    }
}

// =============================================================================
// Entity
// =============================================================================

/// Any entity the cache can hand back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Catalog(Catalog),
    Spec(Spec),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Catalog(_) => EntityKind::Catalog,
            Self::Spec(_) => EntityKind::Spec,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Catalog(catalog) => &catalog.name,
            Self::Spec(spec) => &spec.name,
        }
    }
}

impl From<Catalog> for Entity {
    fn from(catalog: Catalog) -> Self {
        Self::Catalog(catalog)
    }
}

impl From<Spec> for Entity {
    fn from(spec: Spec) -> Self {
        Self::Spec(spec)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_type_from_tag() {
        assert_eq!(ScriptType::from_tag("PRE_SCRIPT_NAME"), ScriptType::PreProcessing);
        assert_eq!(ScriptType::from_tag("SCRIPT_NAME"), ScriptType::PostProcessing);
        assert_eq!(
            ScriptType::from_tag("AUDIT_SCRIPT"),
            ScriptType::Other("AUDIT_SCRIPT".into())
        );
    }

    #[test]
    fn test_script_type_xml_tags() {
        assert_eq!(ScriptType::PreProcessing.xml_tag(), "PreProcessingScript");
        assert_eq!(ScriptType::EntryBuild.xml_tag(), "EntryBuildScript");
        assert_eq!(ScriptType::PostSave.xml_tag(), "PostSaveScript");
        assert_eq!(ScriptType::PostProcessing.xml_tag(), "PostProcessingScript");
        assert_eq!(ScriptType::Other("X".into()).xml_tag(), "");
    }

    #[test]
    fn test_script_types_sort_by_tag() {
        let mut scripts = BTreeMap::new();
        scripts.insert(ScriptType::PostProcessing, "c".to_string());
        scripts.insert(ScriptType::EntryBuild, "a".to_string());
        scripts.insert(ScriptType::PreProcessing, "b".to_string());

        let tags: Vec<&str> = scripts.keys().map(ScriptType::tag).collect();
        assert_eq!(tags, vec!["ENTRY_BUILD_SCRIPT", "PRE_SCRIPT_NAME", "SCRIPT_NAME"]);
    }

    #[test]
    fn test_location_insert_replaces_whole_entry() {
        let mut locations = LocationAttributes::new();
        locations.insert(LocationAttribute {
            hierarchy: "Stores".into(),
            spec: "Store Spec".into(),
            collections: vec!["A".into(), "B".into()],
        });
        let replaced = locations.insert(LocationAttribute {
            hierarchy: "Stores".into(),
            spec: "Region Spec".into(),
            collections: vec!["C".into()],
        });

        assert_eq!(replaced.map(|l| l.spec), Some("Store Spec".to_string()));
        assert_eq!(locations.len(), 1);
        let kept = locations.get("Stores").unwrap();
        assert_eq!(kept.spec, "Region Spec");
        assert_eq!(kept.collections, vec!["C"]);
    }

    #[test]
    fn test_catalog_serialization_uses_script_tags() {
        let mut catalog = Catalog::new("Products", "Product Spec");
        catalog
            .scripts
            .insert(ScriptType::EntryBuild, "Build Products".into());

        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"specName\":\"Product Spec\""));
        assert!(json.contains("\"ENTRY_BUILD_SCRIPT\":\"Build Products\""));

        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
