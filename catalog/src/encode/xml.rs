//! Provisioning XML for one catalog.
//!
//! Emits a single `<CATALOG>` block. The surrounding document (header,
//! footer, other entity kinds) belongs to whoever concatenates the blocks.
//!
//! Link attributes are resolved through an [`EntityResolver`]: the
//! destination catalog is looked up by name, then that catalog's spec, whose
//! primary key path becomes the link's destination attribute. A failed lookup
//! aborts the write; whatever was already written stays in the sink.

use std::io::Write;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::cache::EntityResolver;
use crate::config::Config;
use crate::error::{EncodeError, EncodeResult, LookupResult};
use crate::models::Catalog;
use crate::schema::EntitySchema;

/// Action written for every catalog.
pub const ACTION_CREATE_OR_UPDATE: &str = "CREATE_OR_UPDATE";

const INDENT_SIZE: usize = 3;

type XmlWriter<'w, W> = Writer<&'w mut W>;

fn open<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str) -> std::io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new(tag)))
}

fn close<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str) -> std::io::Result<()> {
    xml.write_event(Event::End(BytesEnd::new(tag)))
}

fn empty<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str) -> std::io::Result<()> {
    xml.write_event(Event::Empty(BytesStart::new(tag)))
}

/// `<tag isDefault="true"/>`
fn default_marker<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str) -> std::io::Result<()> {
    xml.create_element(tag)
        .with_attribute(("isDefault", "true"))
        .write_empty()?;
    Ok(())
}

/// CDATA body; an embedded `]]>` is split across sections.
fn cdata_body<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str, value: &str) -> std::io::Result<()> {
    open(xml, tag)?;
    for section in BytesCData::escaped(value) {
        xml.write_event(Event::CData(section))?;
    }
    close(xml, tag)
}

/// Text element; empty values collapse to a self-closing tag.
fn text<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str, value: &str) -> std::io::Result<()> {
    if value.is_empty() {
        empty(xml, tag)
    } else {
        cdata_body(xml, tag, value)
    }
}

/// Known-safe token written without CDATA.
fn token<W: Write>(xml: &mut XmlWriter<'_, W>, tag: &str, value: &str) -> std::io::Result<()> {
    open(xml, tag)?;
    xml.write_event(Event::Text(BytesText::new(value)))?;
    close(xml, tag)
}

/// A link attribute with its destination resolved.
struct ResolvedLink<'c> {
    source: &'c str,
    destination_attribute: String,
    destination_catalog: &'c str,
}

/// Writes catalogs as provisioning XML.
///
/// The block element is the schema's entity type (`CATALOG` for
/// [`EntitySchema::catalog`]).
pub struct XmlEncoder<'a, R: EntityResolver + ?Sized> {
    element: &'static str,
    resolver: &'a R,
    config: &'a Config,
}

impl<'a, R: EntityResolver + ?Sized> XmlEncoder<'a, R> {
    pub fn new(schema: &EntitySchema, resolver: &'a R, config: &'a Config) -> Self {
        Self {
            element: schema.entity_type(),
            resolver,
            config,
        }
    }

    /// Render one catalog to a string.
    pub fn to_xml(&self, catalog: &Catalog) -> EncodeResult<String> {
        let mut buf = Vec::new();
        self.write(catalog, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write one block to `out`, ending with a newline so blocks concatenate.
    pub fn write<W: Write>(&self, catalog: &Catalog, out: &mut W) -> EncodeResult<()> {
        let mut xml = Writer::new_with_indent(out, b' ', INDENT_SIZE);

        open(&mut xml, self.element)?;
        text(&mut xml, "Name", &catalog.name)?;
        token(&mut xml, "Action", ACTION_CREATE_OR_UPDATE)?;
        let inheritance = if catalog.inheritance { "true" } else { "false" };
        token(&mut xml, "UsesInheritance", inheritance)?;
        text(&mut xml, "Spec", &catalog.spec_name)?;

        if self.config.is_default_acg(&catalog.acg) {
            default_marker(&mut xml, "AccessControlGroup")?;
            default_marker(&mut xml, "ACG")?;
        } else {
            text(&mut xml, "AccessControlGroup", &catalog.acg)?;
            text(&mut xml, "ACG", &catalog.acg)?;
        }

        text(&mut xml, "PrimaryCategoryTree", &catalog.primary_hierarchy)?;
        if catalog.secondary_hierarchies.is_empty() {
            empty(&mut xml, "SecondaryCategoryTrees")?;
        } else {
            open(&mut xml, "SecondaryCategoryTrees")?;
            for hierarchy in &catalog.secondary_hierarchies {
                text(&mut xml, "SecondaryCategoryTree", hierarchy)?;
            }
            close(&mut xml, "SecondaryCategoryTrees")?;
        }

        text(&mut xml, "DisplayAttribute", &catalog.display_attribute)?;
        text(&mut xml, "AttributeGroup", &catalog.user_defined_core_attr_group)?;
        empty(&mut xml, "UserDefinedAttributes")?;

        self.write_links(&mut xml, catalog)?;
        write_scripts(&mut xml, catalog)?;
        write_locations(&mut xml, catalog)?;

        close(&mut xml, self.element)?;
        xml.get_mut().write_all(b"\n")?;
        Ok(())
    }

    fn write_links<W: Write>(
        &self,
        xml: &mut XmlWriter<'_, W>,
        catalog: &Catalog,
    ) -> EncodeResult<()> {
        if catalog.links.is_empty() {
            empty(xml, "LinkAttributes")?;
            return Ok(());
        }

        open(xml, "LinkAttributes")?;
        for (source, destination) in &catalog.links {
            let link = self
                .resolve_link(source, destination)
                .map_err(|source| EncodeError::Lookup {
                    catalog: catalog.name.clone(),
                    source,
                })?;
            open(xml, "LinkAttribute")?;
            text(xml, "LinkSourceAttribute", link.source)?;
            text(xml, "LinkDestinationAttribute", &link.destination_attribute)?;
            text(xml, "LinkDstCatalog", link.destination_catalog)?;
            close(xml, "LinkAttribute")?;
        }
        close(xml, "LinkAttributes")?;
        Ok(())
    }

    fn resolve_link<'c>(
        &self,
        source: &'c str,
        destination: &'c str,
    ) -> LookupResult<ResolvedLink<'c>> {
        let linked = self.resolver.catalog(destination)?;
        let spec = self.resolver.spec(&linked.spec_name)?;
        tracing::debug!(%source, %destination, key = %spec.primary_key_path, "resolved link");
        Ok(ResolvedLink {
            source,
            destination_attribute: spec.primary_key_path,
            destination_catalog: destination,
        })
    }
}

fn write_scripts<W: Write>(xml: &mut XmlWriter<'_, W>, catalog: &Catalog) -> std::io::Result<()> {
    for (script_type, script) in &catalog.scripts {
        let tag = script_type.xml_tag();
        if tag.is_empty() {
            tracing::warn!(
                catalog = %catalog.name,
                tag = %script_type.tag(),
                "unrecognized script type, emitting unnamed element"
            );
        }
        cdata_body(xml, tag, script)?;
    }
    Ok(())
}

fn write_locations<W: Write>(xml: &mut XmlWriter<'_, W>, catalog: &Catalog) -> std::io::Result<()> {
    if catalog.locations.is_empty() {
        return empty(xml, "LocationAttributes");
    }

    open(xml, "LocationAttributes")?;
    for location in catalog.locations.iter() {
        open(xml, "LocationAttribute")?;
        text(xml, "LocationTree", &location.hierarchy)?;
        text(xml, "LocationAttrSpec", &location.spec)?;
        open(xml, "LocationInhAttrGroups")?;
        for collection in &location.collections {
            text(xml, "LocationInhAttrGroup", collection)?;
        }
        close(xml, "LocationInhAttrGroups")?;
        close(xml, "LocationAttribute")?;
    }
    close(xml, "LocationAttributes")
}
