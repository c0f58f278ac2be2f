//! Entity cache - Resolve catalogs and specs by name
//!
//! Encoders only ever see the read-only [`EntityResolver`] capability. The
//! in-memory [`EntityCache`] is the implementation the driver fills from
//! decoded rows and from a spec snapshot on disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{CacheError, CacheResult, LookupError, LookupResult};
use crate::models::{Catalog, Entity, EntityKind, Spec};

/// Read-only lookup of entities by kind and name.
pub trait EntityResolver {
    /// Return the entity of `kind` registered as `name`.
    fn resolve(&self, kind: EntityKind, name: &str) -> LookupResult<Entity>;

    /// Resolve a catalog by name.
    fn catalog(&self, name: &str) -> LookupResult<Catalog> {
        match self.resolve(EntityKind::Catalog, name)? {
            Entity::Catalog(catalog) => Ok(catalog),
            Entity::Spec(_) => Err(LookupError::WrongKind {
                kind: EntityKind::Catalog,
                name: name.to_string(),
            }),
        }
    }

    /// Resolve a spec by name.
    fn spec(&self, name: &str) -> LookupResult<Spec> {
        match self.resolve(EntityKind::Spec, name)? {
            Entity::Spec(spec) => Ok(spec),
            Entity::Catalog(_) => Err(LookupError::WrongKind {
                kind: EntityKind::Spec,
                name: name.to_string(),
            }),
        }
    }
}

impl<T: EntityResolver + ?Sized> EntityResolver for &T {
    fn resolve(&self, kind: EntityKind, name: &str) -> LookupResult<Entity> {
        (**self).resolve(kind, name)
    }
}

/// In-memory entity store keyed by kind and name.
#[derive(Debug, Clone, Default)]
pub struct EntityCache {
    entities: HashMap<(EntityKind, String), Entity>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any previous one of the same kind and name.
    pub fn insert(&mut self, entity: impl Into<Entity>) -> Option<Entity> {
        let entity = entity.into();
        let key = (entity.kind(), entity.name().to_string());
        self.entities.insert(key, entity)
    }

    /// Add an entity, refusing to replace an existing one.
    pub fn insert_unique(&mut self, entity: impl Into<Entity>) -> CacheResult<()> {
        let entity = entity.into();
        if self.contains(entity.kind(), entity.name()) {
            return Err(CacheError::Duplicate {
                kind: entity.kind(),
                name: entity.name().to_string(),
            });
        }
        self.insert(entity);
        Ok(())
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.entities.contains_key(&(kind, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Load specs from a JSON array of `{"name", "primaryKeyPath"}` objects.
    ///
    /// Returns the number of specs added.
    pub fn load_specs(&mut self, path: impl AsRef<Path>) -> CacheResult<usize> {
        let content = fs::read_to_string(path.as_ref())?;
        let specs: Vec<Spec> = serde_json::from_str(&content)?;
        let count = specs.len();
        for spec in specs {
            self.insert_unique(spec)?;
        }
        tracing::info!(count, path = %path.as_ref().display(), "loaded specs");
        Ok(count)
    }
}

impl EntityResolver for EntityCache {
    fn resolve(&self, kind: EntityKind, name: &str) -> LookupResult<Entity> {
        self.entities
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| LookupError::not_found(kind, name))
    }
}
