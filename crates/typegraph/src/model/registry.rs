// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Session-scoped model arena.
//!
//! Models live in insertion order and are addressed by [`ModelId`]. Two
//! indexes sit beside the arena: type identity to model, and
//! `(namespace, name)` to identity. The second one detects two identities
//! claiming the same output name.

use super::Model;
use crate::descriptor::TypeId;
use crate::error::{MapError, Result};
use crate::namespace::Namespace;
use std::collections::HashMap;

/// Index of a model in the [`Registry`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

#[derive(Debug, Default)]
pub struct Registry {
    models: Vec<Model>,
    owners: Vec<TypeId>,
    by_identity: HashMap<TypeId, ModelId>,
    by_name: HashMap<(Namespace, String), TypeId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn contains(&self, identity: TypeId) -> bool {
        self.by_identity.contains_key(&identity)
    }

    pub fn id_of(&self, identity: TypeId) -> Option<ModelId> {
        self.by_identity.get(&identity).copied()
    }

    /// Identity that owns the `(namespace, name)` pair, if registered.
    pub fn owner_of(&self, namespace: &Namespace, name: &str) -> Option<TypeId> {
        self.by_name
            .get(&(namespace.clone(), name.to_string()))
            .copied()
    }

    /// Add `model` for `identity`.
    ///
    /// `describe` renders an identity for the `AmbiguousIdentity` message.
    /// Registering an identity twice returns the existing id untouched.
    pub fn insert(
        &mut self,
        identity: TypeId,
        model: Model,
        describe: impl Fn(TypeId) -> String,
    ) -> Result<ModelId> {
        if let Some(existing) = self.id_of(identity) {
            return Ok(existing);
        }

        let key = (model.namespace().clone(), model.name().to_string());
        if let Some(&other) = self.by_name.get(&key) {
            return Err(MapError::AmbiguousIdentity {
                namespace: key.0.to_string(),
                name: key.1,
                first: describe(other),
                second: describe(identity),
            });
        }

        let id = ModelId(self.models.len());
        self.models.push(model);
        self.owners.push(identity);
        self.by_identity.insert(identity, id);
        self.by_name.insert(key, identity);
        Ok(id)
    }

    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id.0)
    }

    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.get_mut(id.0)
    }

    pub fn by_identity(&self, identity: TypeId) -> Option<&Model> {
        self.id_of(identity).and_then(|id| self.get(id))
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// `(identity, model)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Model)> {
        self.owners.iter().copied().zip(self.models.iter())
    }

    /// Drop every model registered at or after position `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.models.len() {
            return;
        }
        for (identity, model) in self.owners.drain(len..).zip(self.models.drain(len..)) {
            self.by_identity.remove(&identity);
            self.by_name
                .remove(&(model.namespace().clone(), model.name().to_string()));
        }
    }
}
