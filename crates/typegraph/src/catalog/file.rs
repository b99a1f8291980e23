// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML catalog documents.
//!
//! ```yaml
//! types:
//!   - { name: Int32, namespace: System, kind: value }
//!   - name: List
//!     namespace: System.Collections.Generic
//!     params: [T]
//!     implements: ["IEnumerable<T>"]
//!   - name: Color
//!     namespace: App
//!     kind: enum
//!     values: [Red, Green, { name: Blue, value: 4 }]
//!   - name: Order
//!     namespace: App
//!     fields:
//!       - { name: lines, type: "List<OrderLine>" }
//!       - { name: note, type: "String?" }
//! ```
//!
//! All types are declared first and defined second, so entries may refer to
//! types listed after them.

use super::{CatalogError, TypeCatalog};
use crate::descriptor::TypeId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declared kind of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[default]
    Class,
    Abstract,
    Value,
    Interface,
    Enum,
}

/// Enum constant: a bare name continues numbering from the previous value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumEntry {
    Named(String),
    Valued { name: String, value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    #[serde(default)]
    pub values: Vec<EnumEntry>,
}

/// Root of a catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

impl CatalogDocument {
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build a catalog from every entry.
    pub fn into_catalog(self) -> Result<TypeCatalog, CatalogError> {
        let mut catalog = TypeCatalog::new();

        let mut declared: Vec<(TypeId, TypeEntry)> = Vec::with_capacity(self.types.len());
        for entry in self.types {
            let builder = match entry.kind {
                EntryKind::Class => catalog.class(&entry.namespace, &entry.name),
                EntryKind::Abstract => catalog.abstract_class(&entry.namespace, &entry.name),
                EntryKind::Value => catalog.value_type(&entry.namespace, &entry.name),
                EntryKind::Interface => catalog.interface(&entry.namespace, &entry.name),
                EntryKind::Enum => catalog.enumeration(&entry.namespace, &entry.name),
            };
            let builder = if entry.params.is_empty() {
                builder
            } else {
                builder.params(&entry.params)
            };
            let mut next = 0i64;
            let builder = entry.values.iter().fold(builder, |b, value| match value {
                EnumEntry::Named(name) => {
                    let b = b.value(name.as_str(), next);
                    next += 1;
                    b
                }
                EnumEntry::Valued { name, value } => {
                    next = value.saturating_add(1);
                    b.value(name.as_str(), *value)
                }
            });
            let id = builder.build()?;
            declared.push((id, entry));
        }

        for (id, entry) in declared {
            let mut builder = catalog.edit(id);
            if let Some(base) = entry.extends {
                builder = builder.extends(base);
            }
            for iface in entry.implements {
                builder = builder.implements(iface);
            }
            for field in entry.fields {
                builder = builder.field(field.name, field.ty);
            }
            builder.build()?;
        }

        log::debug!("[catalog] loaded {} types", catalog.len());
        Ok(catalog)
    }
}

impl TypeCatalog {
    /// Parse and build a catalog from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        CatalogDocument::from_yaml_str(content)?.into_catalog()
    }

    /// Load a catalog from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
}
