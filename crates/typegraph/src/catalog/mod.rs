// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-memory type catalog.
//!
//! [`TypeCatalog`] owns a synthetic type system and implements
//! [`TypeProvider`] and [`ImplementationRegistry`] over it. Types are
//! declared through [`TypeBuilder`] (or loaded from a YAML document, see
//! [`file`]) and refer to each other with type expressions such as
//! `List<Order?>` or `System.Int32[]`.
//!
//! Generic instantiations are interned by `(definition, arguments)` and
//! re-derived whenever their definition changes, so declaration order does
//! not matter.

mod expr;
pub mod file;

pub use expr::{Suffix, SyntaxError, TypeExpr};

use crate::descriptor::{
    EnumValue, Generic, ImplementationRegistry, Member, Nullability, TypeDescriptor, TypeId,
    TypeKind, TypeProvider,
};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Instantiations nested deeper than this are rejected as runaway expansion.
pub const MAX_GENERIC_DEPTH: usize = 32;

/// Catalog construction errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid type expression `{expr}`: {error}")]
    Syntax { expr: String, error: SyntaxError },

    #[error("cannot resolve `{name}` in {context}")]
    Unresolved { name: String, context: String },

    #[error("`{name}` is ambiguous in {context}")]
    AmbiguousName { name: String, context: String },

    #[error("type `{0}` is declared twice")]
    Duplicate(String),

    #[error("type `{name}` takes {expected} type arguments, got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("type `{0}` is not a generic definition")]
    NotGeneric(String),

    #[error("generic expansion of `{0}` nests too deeply")]
    ExpansionTooDeep(String),

    #[error("type `{0}` is not an enum")]
    NotEnum(String),

    #[error("unknown type handle {0}")]
    UnknownType(TypeId),
}

/// Owned synthetic type system.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: Vec<TypeDescriptor>,
    by_name: HashMap<String, TypeId>,
    instances: HashMap<(TypeId, Vec<TypeId>), TypeId>,
    arrays: HashMap<TypeId, TypeId>,
    nullables: HashMap<TypeId, TypeId>,
}

impl TypeProvider for TypeCatalog {
    fn describe(&self, ty: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(ty.0 as usize)
    }
}

impl ImplementationRegistry for TypeCatalog {
    /// Declared, concrete types whose base chain or interface closure
    /// contains `base` (or an instantiation of it).
    fn implementations(&self, base: TypeId) -> Vec<TypeId> {
        let target = self.open(base);
        self.types
            .iter()
            .enumerate()
            .filter_map(|(index, descriptor)| {
                let ty = TypeId(u32::try_from(index).ok()?);
                let concrete = matches!(
                    descriptor.kind,
                    TypeKind::Class { is_abstract: false } | TypeKind::ValueType
                );
                let declared = !matches!(descriptor.generic, Generic::Instance { .. });
                (concrete && declared && ty != target && self.derives_from(ty, target))
                    .then_some(ty)
            })
            .collect()
    }
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Find a declared type by `Namespace.Name`.
    pub fn lookup(&self, full_name: &str) -> Option<TypeId> {
        self.by_name.get(full_name).copied()
    }

    /// Declared type names, sorted.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn get(&self, ty: TypeId) -> Result<&TypeDescriptor, CatalogError> {
        self.describe(ty).ok_or(CatalogError::UnknownType(ty))
    }

    fn get_mut(&mut self, ty: TypeId) -> Result<&mut TypeDescriptor, CatalogError> {
        self.types
            .get_mut(ty.0 as usize)
            .ok_or(CatalogError::UnknownType(ty))
    }

    fn push(&mut self, descriptor: TypeDescriptor) -> TypeId {
        // Catalogs beyond u32::MAX types are not a realistic input.
        let id = TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
        self.types.push(descriptor);
        id
    }

    fn open(&self, ty: TypeId) -> TypeId {
        self.describe(ty)
            .and_then(TypeDescriptor::generic_definition)
            .unwrap_or(ty)
    }

    fn derives_from(&self, ty: TypeId, target: TypeId) -> bool {
        let mut pending = vec![ty];
        let mut seen = std::collections::HashSet::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            if current != ty && self.open(current) == target {
                return true;
            }
            if let Some(d) = self.describe(current) {
                pending.extend(d.interfaces.iter().copied());
                pending.extend(d.base);
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Declaration
    // ------------------------------------------------------------------

    fn declare(&mut self, namespace: &str, name: &str, kind: TypeKind) -> TypeBuilder<'_> {
        let descriptor = TypeDescriptor::new(name, namespace, kind);
        let full_name = descriptor.full_name();
        if self.by_name.contains_key(&full_name) {
            return TypeBuilder::failed(self, CatalogError::Duplicate(full_name));
        }
        let id = self.push(descriptor);
        self.by_name.insert(full_name, id);
        TypeBuilder::new(self, id)
    }

    pub fn class(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.declare(namespace, name, TypeKind::Class { is_abstract: false })
    }

    pub fn abstract_class(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.declare(namespace, name, TypeKind::Class { is_abstract: true })
    }

    pub fn value_type(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.declare(namespace, name, TypeKind::ValueType)
    }

    pub fn interface(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.declare(namespace, name, TypeKind::Interface)
    }

    pub fn enumeration(&mut self, namespace: &str, name: &str) -> TypeBuilder<'_> {
        self.declare(namespace, name, TypeKind::Enum(Vec::new()))
    }

    /// Builder that adds to an already declared type.
    pub fn edit(&mut self, ty: TypeId) -> TypeBuilder<'_> {
        if self.describe(ty).is_none() {
            return TypeBuilder::failed(self, CatalogError::UnknownType(ty));
        }
        TypeBuilder::new(self, ty)
    }

    // ------------------------------------------------------------------
    // Derived types
    // ------------------------------------------------------------------

    /// Interned concrete array of `element`.
    pub fn array_of(&mut self, element: TypeId) -> TypeId {
        if let Some(&id) = self.arrays.get(&element) {
            return id;
        }
        let (name, namespace) = self
            .describe(element)
            .map(|d| (format!("{}[]", d.name), d.namespace.clone()))
            .unwrap_or_else(|| ("[]".to_string(), String::new()));
        let id = self.push(TypeDescriptor::new(name, namespace, TypeKind::Array { element }));
        self.arrays.insert(element, id);
        id
    }

    /// Interned nullable wrapper over `value`.
    pub fn nullable_of(&mut self, value: TypeId) -> TypeId {
        if let Some(&id) = self.nullables.get(&value) {
            return id;
        }
        let name = self
            .describe(value)
            .map(|d| format!("{}?", d.name))
            .unwrap_or_else(|| "?".to_string());
        let id = self.push(TypeDescriptor::new(
            name,
            "",
            TypeKind::Nullable { underlying: value },
        ));
        self.nullables.insert(value, id);
        id
    }

    /// Interned instantiation of the open `definition` with `args`.
    ///
    /// Passing the definition's own parameters yields the definition itself.
    pub fn instantiate(&mut self, definition: TypeId, args: &[TypeId]) -> Result<TypeId, CatalogError> {
        let def = self.get(definition)?;
        let Generic::Definition { parameters } = &def.generic else {
            return Err(CatalogError::NotGeneric(def.full_name()));
        };
        if parameters.len() != args.len() {
            return Err(CatalogError::Arity {
                name: def.full_name(),
                expected: parameters.len(),
                found: args.len(),
            });
        }
        if parameters.as_slice() == args {
            return Ok(definition);
        }
        if let Some(&id) = self.instances.get(&(definition, args.to_vec())) {
            return Ok(id);
        }
        if args.iter().any(|&a| self.depth(a) >= MAX_GENERIC_DEPTH) {
            return Err(CatalogError::ExpansionTooDeep(def.full_name()));
        }

        let mut descriptor = TypeDescriptor::new(def.name.clone(), def.namespace.clone(), def.kind.clone());
        descriptor.generic = Generic::Instance {
            definition,
            arguments: args.to_vec(),
        };
        let id = self.push(descriptor);
        self.instances.insert((definition, args.to_vec()), id);
        self.derive_instance(id)?;
        Ok(id)
    }

    fn depth(&self, ty: TypeId) -> usize {
        match self.describe(ty) {
            Some(d) => match &d.kind {
                TypeKind::Array { element } => 1 + self.depth(*element),
                TypeKind::Nullable { underlying } => 1 + self.depth(*underlying),
                _ if d.generic_definition().is_some() => {
                    1 + d
                        .generic_arguments()
                        .iter()
                        .map(|&a| self.depth(a))
                        .max()
                        .unwrap_or(0)
                }
                _ => 1,
            },
            None => 0,
        }
    }

    /// Recompute members, base and interfaces of an instantiation from its
    /// definition.
    fn derive_instance(&mut self, instance: TypeId) -> Result<(), CatalogError> {
        let (definition, args) = match &self.get(instance)?.generic {
            Generic::Instance {
                definition,
                arguments,
            } => (*definition, arguments.clone()),
            _ => return Ok(()),
        };
        let def = self.get(definition)?.clone();
        let map: HashMap<TypeId, TypeId> = def
            .generic_arguments()
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();

        let mut members = Vec::with_capacity(def.members.len());
        for member in &def.members {
            members.push(Member {
                name: member.name.clone(),
                ty: self.substitute(member.ty, &map)?,
                nullability: member.nullability,
            });
        }
        let base = match def.base {
            Some(b) => Some(self.substitute(b, &map)?),
            None => None,
        };
        let mut interfaces = Vec::with_capacity(def.interfaces.len());
        for &i in &def.interfaces {
            interfaces.push(self.substitute(i, &map)?);
        }

        let target = self.get_mut(instance)?;
        target.members = members;
        target.base = base;
        target.interfaces = interfaces;
        Ok(())
    }

    fn substitute(&mut self, ty: TypeId, map: &HashMap<TypeId, TypeId>) -> Result<TypeId, CatalogError> {
        if let Some(&mapped) = map.get(&ty) {
            return Ok(mapped);
        }
        let descriptor = self.get(ty)?;
        match (&descriptor.kind, &descriptor.generic) {
            (TypeKind::Array { element }, _) => {
                let element = *element;
                let element = self.substitute(element, map)?;
                Ok(self.array_of(element))
            }
            (TypeKind::Nullable { underlying }, _) => {
                let underlying = *underlying;
                let underlying = self.substitute(underlying, map)?;
                Ok(self.nullable_of(underlying))
            }
            (
                _,
                Generic::Instance {
                    definition,
                    arguments,
                },
            ) => {
                let definition = *definition;
                let arguments = arguments.clone();
                let mut substituted = Vec::with_capacity(arguments.len());
                for a in arguments {
                    substituted.push(self.substitute(a, map)?);
                }
                self.instantiate(definition, &substituted)
            }
            // The open definition named from inside itself (`Node<T>` in `Node<T>`).
            (_, Generic::Definition { parameters }) if parameters.iter().any(|p| map.contains_key(p)) => {
                let substituted: Vec<TypeId> = parameters
                    .iter()
                    .map(|p| map.get(p).copied().unwrap_or(*p))
                    .collect();
                self.instantiate(ty, &substituted)
            }
            _ => Ok(ty),
        }
    }

    /// Re-derive every instantiation of `definition`.
    fn refresh_instances(&mut self, definition: TypeId) -> Result<(), CatalogError> {
        let instances: Vec<TypeId> = self
            .instances
            .iter()
            .filter(|((def, _), _)| *def == definition)
            .map(|(_, &id)| id)
            .collect();
        for instance in instances {
            self.derive_instance(instance)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Type expressions
    // ------------------------------------------------------------------

    /// Resolve a type expression written inside `scope`'s declaration.
    ///
    /// A trailing `?` on a reference type is returned as a nullable
    /// annotation; anywhere else `?` produces a nullable wrapper.
    pub fn resolve_expr(
        &mut self,
        text: &str,
        scope: Option<TypeId>,
    ) -> Result<(TypeId, Nullability), CatalogError> {
        let expr = TypeExpr::parse(text).map_err(|error| CatalogError::Syntax {
            expr: text.to_string(),
            error,
        })?;
        self.resolve_parsed(&expr, scope)
    }

    fn resolve_parsed(
        &mut self,
        expr: &TypeExpr,
        scope: Option<TypeId>,
    ) -> Result<(TypeId, Nullability), CatalogError> {
        let mut ty = self.resolve_path(expr, scope)?;
        if !expr.args.is_empty() {
            let mut args = Vec::with_capacity(expr.args.len());
            for arg in &expr.args {
                args.push(self.resolve_parsed(arg, scope)?.0);
            }
            ty = self.instantiate(ty, &args)?;
        }

        let mut nullability = Nullability::NotNull;
        let last = expr.suffixes.len().saturating_sub(1);
        for (i, suffix) in expr.suffixes.iter().enumerate() {
            match suffix {
                Suffix::Array => ty = self.array_of(ty),
                Suffix::Nullable => {
                    let value_type = self.get(ty)?.is_value_type()
                        || self.get(ty)?.is_generic_parameter();
                    if i == last && !value_type {
                        nullability = Nullability::Nullable;
                    } else {
                        ty = self.nullable_of(ty);
                    }
                }
            }
        }
        Ok((ty, nullability))
    }

    fn scope_context(&self, scope: Option<TypeId>) -> String {
        scope
            .and_then(|s| self.describe(s))
            .map(|d| format!("`{}`", d.full_name()))
            .unwrap_or_else(|| "global scope".to_string())
    }

    fn resolve_path(&self, expr: &TypeExpr, scope: Option<TypeId>) -> Result<TypeId, CatalogError> {
        let scope_descriptor = scope.and_then(|s| self.describe(s));

        // Generic parameters of the declaring type shadow everything else.
        if let Some(d) = scope_descriptor {
            if let Generic::Definition { parameters } = &d.generic {
                let hit = parameters
                    .iter()
                    .copied()
                    .find(|&p| self.describe(p).is_some_and(|pd| pd.name == expr.path));
                if let Some(p) = hit {
                    return Ok(p);
                }
            }
        }

        if let Some(id) = self.lookup(&expr.path) {
            return Ok(id);
        }

        // Enclosing namespaces, innermost first.
        if let Some(d) = scope_descriptor {
            let mut namespace = crate::namespace::Namespace::from(d.namespace.as_str());
            while !namespace.is_global() {
                if let Some(id) = self.lookup(&namespace.qualify(&expr.path)) {
                    return Ok(id);
                }
                namespace = namespace.parent();
            }
        }

        if !expr.path.contains('.') {
            let candidates: Vec<TypeId> = self
                .by_name
                .iter()
                .filter(|(full, _)| full.rsplit('.').next() == Some(expr.path.as_str()))
                .map(|(_, &id)| id)
                .collect();
            match candidates.as_slice() {
                [only] => return Ok(*only),
                [] => {}
                _ => {
                    return Err(CatalogError::AmbiguousName {
                        name: expr.path.clone(),
                        context: self.scope_context(scope),
                    })
                }
            }
        }

        Err(CatalogError::Unresolved {
            name: expr.path.clone(),
            context: self.scope_context(scope),
        })
    }
}

#[derive(Debug)]
enum Pending {
    Base(String),
    Interface(String),
    Field(String, String),
}

/// Fluent declaration of a catalog type.
///
/// Generic parameters are declared immediately; type expressions are
/// resolved on [`TypeBuilder::build`], so a type may mention itself.
#[derive(Debug)]
pub struct TypeBuilder<'a> {
    catalog: &'a mut TypeCatalog,
    id: Option<TypeId>,
    error: Option<CatalogError>,
    pending: Vec<Pending>,
}

impl<'a> TypeBuilder<'a> {
    fn new(catalog: &'a mut TypeCatalog, id: TypeId) -> Self {
        Self {
            catalog,
            id: Some(id),
            error: None,
            pending: Vec::new(),
        }
    }

    fn failed(catalog: &'a mut TypeCatalog, error: CatalogError) -> Self {
        Self {
            catalog,
            id: None,
            error: Some(error),
            pending: Vec::new(),
        }
    }

    /// Declare generic parameters, turning the type into an open definition.
    pub fn params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(id) = self.id else {
            return self;
        };
        let owner = match self.catalog.describe(id) {
            Some(d) => d.full_name(),
            None => return self,
        };
        let parameters: Vec<TypeId> = names
            .into_iter()
            .map(|n| {
                self.catalog.push(TypeDescriptor::new(
                    n.as_ref(),
                    owner.clone(),
                    TypeKind::GenericParameter,
                ))
            })
            .collect();
        if let Some(d) = self.catalog.types.get_mut(id.0 as usize) {
            d.generic = Generic::Definition { parameters };
        }
        self
    }

    pub fn extends(mut self, expr: impl Into<String>) -> Self {
        self.pending.push(Pending::Base(expr.into()));
        self
    }

    pub fn implements(mut self, expr: impl Into<String>) -> Self {
        self.pending.push(Pending::Interface(expr.into()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.pending.push(Pending::Field(name.into(), expr.into()));
        self
    }

    /// Add an enum constant. Fails on [`TypeBuilder::build`] for any other kind.
    pub fn value(mut self, name: impl Into<String>, value: i64) -> Self {
        let Some(id) = self.id else {
            return self;
        };
        match self.catalog.types.get_mut(id.0 as usize) {
            Some(TypeDescriptor {
                kind: TypeKind::Enum(values),
                ..
            }) => values.push(EnumValue::new(name, value)),
            Some(descriptor) => {
                let full_name = descriptor.full_name();
                self.error.get_or_insert(CatalogError::NotEnum(full_name));
            }
            None => {
                self.error.get_or_insert(CatalogError::UnknownType(id));
            }
        }
        self
    }

    pub fn build(mut self) -> Result<TypeId, CatalogError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let id = self.id.ok_or(CatalogError::UnknownType(TypeId(u32::MAX)))?;
        for pending in std::mem::take(&mut self.pending) {
            match pending {
                Pending::Base(expr) => {
                    let (base, _) = self.catalog.resolve_expr(&expr, Some(id))?;
                    self.catalog.get_mut(id)?.base = Some(base);
                }
                Pending::Interface(expr) => {
                    let (iface, _) = self.catalog.resolve_expr(&expr, Some(id))?;
                    self.catalog.get_mut(id)?.interfaces.push(iface);
                }
                Pending::Field(name, expr) => {
                    let (ty, nullability) = self.catalog.resolve_expr(&expr, Some(id))?;
                    self.catalog.get_mut(id)?.members.push(Member {
                        name,
                        ty,
                        nullability,
                    });
                }
            }
        }
        self.catalog.refresh_instances(id)?;
        Ok(id)
    }
}
