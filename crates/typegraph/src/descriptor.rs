// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type introspection contract.
//!
//! The mapper never reflects on anything itself. It asks a [`TypeProvider`]
//! for the [`TypeDescriptor`] behind a [`TypeId`] handle and classifies the
//! type from that. [`crate::catalog::TypeCatalog`] is the in-memory provider
//! used by tests and the CLI; a binding to a real runtime implements the same
//! trait.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a type known by a [`TypeProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Nullability annotation carried by a usage site (field, argument).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    #[default]
    NotNull,
    Nullable,
}

impl Nullability {
    pub const fn is_nullable(self) -> bool {
        matches!(self, Self::Nullable)
    }
}

/// Named integer constant of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Structural kind of a type as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Reference type with identity semantics.
    Class { is_abstract: bool },
    /// Value type.
    ValueType,
    Interface,
    Enum(Vec<EnumValue>),
    /// Concrete array of `element`.
    Array { element: TypeId },
    /// Nullable wrapper over a value type.
    Nullable { underlying: TypeId },
    /// Placeholder of an open generic definition.
    GenericParameter,
}

/// Generic shape of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Generic {
    #[default]
    None,
    /// Open generic definition; `parameters` are `GenericParameter` types.
    Definition { parameters: Vec<TypeId> },
    /// Closed (or partially open) instantiation of `definition`.
    Instance {
        definition: TypeId,
        arguments: Vec<TypeId>,
    },
}

/// One declared member slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
    pub nullability: Nullability,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            nullability: Nullability::NotNull,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullability = Nullability::Nullable;
        self
    }
}

/// Everything the mapper may ask about a single type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Display name without namespace or generic arity.
    pub name: String,
    /// Declaring namespace, delimited by `.`.
    pub namespace: String,
    pub kind: TypeKind,
    pub generic: Generic,
    /// Declared own members only.
    pub members: Vec<Member>,
    pub base: Option<TypeId>,
    /// Directly implemented (or extended) interfaces.
    pub interfaces: Vec<TypeId>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            generic: Generic::None,
            members: Vec::new(),
            base: None,
            interfaces: Vec::new(),
        }
    }

    /// `Namespace.Name`, or just the name in the global namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.kind, TypeKind::GenericParameter)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Class { is_abstract: true }) || self.is_interface()
    }

    /// Value types (including enums) can be wrapped by a nullable wrapper.
    pub fn is_value_type(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::ValueType | TypeKind::Enum(_) | TypeKind::Nullable { .. }
        )
    }

    /// Open definition if this is a closed generic instantiation.
    pub fn generic_definition(&self) -> Option<TypeId> {
        match &self.generic {
            Generic::Instance { definition, .. } => Some(*definition),
            _ => None,
        }
    }

    /// Type parameters of a definition or type arguments of an instantiation.
    pub fn generic_arguments(&self) -> &[TypeId] {
        match &self.generic {
            Generic::None => &[],
            Generic::Definition { parameters } => parameters,
            Generic::Instance { arguments, .. } => arguments,
        }
    }

    pub fn enum_values(&self) -> &[EnumValue] {
        match &self.kind {
            TypeKind::Enum(values) => values,
            _ => &[],
        }
    }
}

/// Source of type descriptors (the runtime's introspection facility).
pub trait TypeProvider {
    /// Look up the descriptor behind `ty`, `None` if the handle is unknown.
    fn describe(&self, ty: TypeId) -> Option<&TypeDescriptor>;
}

/// Resolves known concrete implementations of a base type or interface.
pub trait ImplementationRegistry {
    fn implementations(&self, base: TypeId) -> Vec<TypeId>;
}

impl<T: TypeProvider + ?Sized> TypeProvider for &T {
    fn describe(&self, ty: TypeId) -> Option<&TypeDescriptor> {
        (**self).describe(ty)
    }
}
