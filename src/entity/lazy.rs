//! Lazy entity: loader-backed reads of unset fields
//!
//! Wraps an entity with a `FieldLoader`. Reading a present field resolves
//! immediately; reading an absent one awaits `load()`, merges whatever
//! fields it discovered, and resolves with the requested field's value.
//! Loader failures surface at the await point, never synchronously.
//!
//! Overlapping reads of different missing fields each schedule their own
//! `load()` call; there is no single-flight deduplication at this layer.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use indexmap::IndexMap;

use super::errors::{EntityResult, LoadError};
use super::Entity;
use crate::schema::Schema;
use crate::value::Value;

/// Discovers additional fields for a lazy entity.
///
/// `load()` returns a map of newly discovered fields; it need not include
/// the field whose read triggered it.
pub trait FieldLoader: Send {
    fn load(&mut self) -> BoxFuture<'_, Result<IndexMap<String, Value>, LoadError>>;
}

/// An entity whose unset fields are populated on demand by a loader.
pub struct LazyEntity<L: FieldLoader> {
    entity: Entity,
    loader: L,
}

impl<L: FieldLoader> LazyEntity<L> {
    /// An empty lazy entity over a fresh store.
    pub fn new(schema: &Arc<Schema>, loader: L) -> Self {
        Self {
            entity: Entity::new(schema),
            loader,
        }
    }

    /// Wraps an already-populated entity.
    pub fn from_entity(entity: Entity, loader: L) -> Self {
        Self { entity, loader }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }

    /// Reads a field, invoking the loader when it is absent.
    ///
    /// Loaded fields merge into the store without clobbering values
    /// already present. After the merge the read proceeds like any other:
    /// still-absent fields materialize their default or fail, naming the
    /// field.
    pub async fn get(&mut self, name: &str) -> EntityResult<Value> {
        if self.entity.contains(name) {
            return self.entity.get(name);
        }

        let loaded = self.loader.load().await?;
        for (key, value) in loaded {
            self.entity.merge_loaded(key, value)?;
        }
        self.entity.get(name)
    }
}
