// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapper configuration.
//!
//! [`MapperConfig`] is a query-only rule set once a session starts: base
//! type names, ignore and exclude predicates, forced includes, array-like,
//! record-like and promise markers. It classifies types from their
//! descriptors alone and never looks at a session registry.
//!
//! [`MapperSettings`] is the TOML file form, resolved into a
//! [`MapperConfig`] against a type catalog.

mod settings;

pub use settings::{glob_match, ConfigError, MapperSettings};

use crate::descriptor::{TypeDescriptor, TypeId, TypeProvider};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Type classification predicate.
pub type TypePredicate = Arc<dyn Fn(TypeId, &TypeDescriptor) -> bool + Send + Sync>;

/// Static classification rules for a mapping session.
#[derive(Clone, Default)]
pub struct MapperConfig {
    base_types: HashMap<TypeId, String>,
    ignore: Vec<TypePredicate>,
    exclude: Vec<TypePredicate>,
    include: Vec<TypeId>,
    arrays: HashSet<TypeId>,
    records: HashSet<TypeId>,
    promises: HashSet<TypeId>,
    array_shape: Option<TypeId>,
    record_shape: Option<TypeId>,
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperConfig")
            .field("base_types", &self.base_types)
            .field("ignore", &self.ignore.len())
            .field("exclude", &self.exclude.len())
            .field("include", &self.include)
            .field("arrays", &self.arrays)
            .field("records", &self.records)
            .field("promises", &self.promises)
            .field("array_shape", &self.array_shape)
            .field("record_shape", &self.record_shape)
            .finish()
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    /// Map `ty` to the primitive `name` (e.g. `number`, `string`).
    pub fn with_base_type(mut self, ty: TypeId, name: impl Into<String>) -> Self {
        self.add_base_type(ty, name);
        self
    }

    pub fn add_base_type(&mut self, ty: TypeId, name: impl Into<String>) {
        self.base_types.insert(ty, name.into());
    }

    /// Hide matching types from the output graph entirely.
    pub fn ignore_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(TypeId, &TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.add_ignore(Arc::new(predicate));
        self
    }

    pub fn add_ignore(&mut self, predicate: TypePredicate) {
        self.ignore.push(predicate);
    }

    /// Stop traversal at matching types; they stay referenceable but opaque.
    pub fn exclude_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(TypeId, &TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.add_exclude(Arc::new(predicate));
        self
    }

    pub fn add_exclude(&mut self, predicate: TypePredicate) {
        self.exclude.push(predicate);
    }

    /// Force `ty` into the output even if nothing references it.
    pub fn include(mut self, ty: TypeId) -> Self {
        self.add_include(ty);
        self
    }

    pub fn add_include(&mut self, ty: TypeId) {
        if !self.include.contains(&ty) {
            self.include.push(ty);
        }
    }

    /// Treat `ty` (or instantiations of it) as array-like.
    pub fn mark_array(mut self, ty: TypeId) -> Self {
        self.arrays.insert(ty);
        self
    }

    /// Treat `ty` (or instantiations of it) as record-like.
    pub fn mark_record(mut self, ty: TypeId) -> Self {
        self.records.insert(ty);
        self
    }

    /// Treat `ty` (or instantiations of it) as an asynchronous wrapper.
    pub fn mark_promise(mut self, ty: TypeId) -> Self {
        self.promises.insert(ty);
        self
    }

    /// Open single-parameter sequence definition every array-like type implements.
    pub fn array_shape(mut self, definition: TypeId) -> Self {
        self.array_shape = Some(definition);
        self
    }

    /// Open two-parameter key/value definition every record-like type implements.
    pub fn record_shape(mut self, definition: TypeId) -> Self {
        self.record_shape = Some(definition);
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn base_type_name(&self, ty: TypeId) -> Option<&str> {
        self.base_types.get(&ty).map(String::as_str)
    }

    pub fn is_base_type(&self, ty: TypeId) -> bool {
        self.base_types.contains_key(&ty)
    }

    pub fn includes(&self) -> &[TypeId] {
        &self.include
    }

    pub fn configured_array_shape(&self) -> Option<TypeId> {
        self.array_shape
    }

    pub fn configured_record_shape(&self) -> Option<TypeId> {
        self.record_shape
    }

    pub fn is_ignored<P: TypeProvider + ?Sized>(&self, provider: &P, ty: TypeId) -> bool {
        Self::any_matches(&self.ignore, provider, ty)
    }

    pub fn is_excluded<P: TypeProvider + ?Sized>(&self, provider: &P, ty: TypeId) -> bool {
        Self::any_matches(&self.exclude, provider, ty)
    }

    /// Marked as a promise wrapper, directly or through its open definition.
    pub fn is_promise<P: TypeProvider + ?Sized>(&self, provider: &P, ty: TypeId) -> bool {
        Self::marked(&self.promises, provider, ty)
    }

    /// Record-like: explicitly marked, or assignable to the record shape.
    pub fn is_record<P: TypeProvider + ?Sized>(&self, provider: &P, ty: TypeId) -> bool {
        Self::marked(&self.records, provider, ty)
            || self
                .record_shape
                .is_some_and(|shape| find_shape(provider, ty, shape).is_some())
    }

    /// Array-like: a concrete array, explicitly marked, or assignable to the
    /// sequence shape.
    pub fn is_array<P: TypeProvider + ?Sized>(&self, provider: &P, ty: TypeId) -> bool {
        let concrete = provider
            .describe(ty)
            .is_some_and(|d| matches!(d.kind, crate::descriptor::TypeKind::Array { .. }));
        concrete
            || Self::marked(&self.arrays, provider, ty)
            || self
                .array_shape
                .is_some_and(|shape| find_shape(provider, ty, shape).is_some())
    }

    /// Predicates see the type itself and, for an instantiation, its definition.
    fn any_matches<P: TypeProvider + ?Sized>(
        predicates: &[TypePredicate],
        provider: &P,
        ty: TypeId,
    ) -> bool {
        if predicates.is_empty() {
            return false;
        }
        let Some(descriptor) = provider.describe(ty) else {
            return false;
        };
        if predicates.iter().any(|p| p(ty, descriptor)) {
            return true;
        }
        match descriptor.generic_definition() {
            Some(def) => provider
                .describe(def)
                .is_some_and(|d| predicates.iter().any(|p| p(def, d))),
            None => false,
        }
    }

    fn marked<P: TypeProvider + ?Sized>(set: &HashSet<TypeId>, provider: &P, ty: TypeId) -> bool {
        if set.contains(&ty) {
            return true;
        }
        provider
            .describe(ty)
            .and_then(TypeDescriptor::generic_definition)
            .is_some_and(|def| set.contains(&def))
    }
}

/// Walk `ty`, its base chain and interface closure looking for an
/// instantiation (or the definition itself) of the open `shape`.
///
/// Returns the matching type's handle.
pub fn find_shape<P: TypeProvider + ?Sized>(provider: &P, ty: TypeId, shape: TypeId) -> Option<TypeId> {
    let mut pending = vec![ty];
    let mut seen = HashSet::new();
    while let Some(current) = pending.pop() {
        if !seen.insert(current) {
            continue;
        }
        let Some(descriptor) = provider.describe(current) else {
            continue;
        };
        if current == shape || descriptor.generic_definition() == Some(shape) {
            return Some(current);
        }
        // Reverse keeps declaration order when popping.
        pending.extend(descriptor.interfaces.iter().rev().copied());
        if let Some(base) = descriptor.base {
            pending.push(base);
        }
    }
    None
}
