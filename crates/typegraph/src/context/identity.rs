// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-session cache of type identities.

use crate::descriptor::{TypeDescriptor, TypeId, TypeProvider};
use crate::error::{MapError, Result};
use crate::namespace::Namespace;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Identity data of one type handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Open generic definition, or the type itself.
    pub open: TypeId,
    /// Parsed namespace of `open`.
    pub namespace: Namespace,
}

/// Open definitions and parsed namespaces, keyed by type handle.
///
/// Owned by one [`super::ProcessingContext`] and dropped with it.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: HashMap<TypeId, Identity>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve<P: TypeProvider + ?Sized>(&mut self, provider: &P, ty: TypeId) -> Result<&Identity> {
        match self.entries.entry(ty) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let descriptor = provider.describe(ty).ok_or(MapError::UnknownType(ty))?;
                let open = descriptor.generic_definition().unwrap_or(ty);
                let namespace = provider
                    .describe(open)
                    .map(|d: &TypeDescriptor| Namespace::from(d.namespace.as_str()))
                    .ok_or(MapError::UnknownType(open))?;
                Ok(entry.insert(Identity { open, namespace }))
            }
        }
    }
}
