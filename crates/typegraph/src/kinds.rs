// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Element resolution for array-like and record-like types.
//!
//! Both helpers are pure: they read descriptors and the configured shapes,
//! nothing else. The array processor and the array referrer call
//! [`resolve_array_element`]; the record pair calls
//! [`resolve_record_element`].

use crate::config::{find_shape, MapperConfig};
use crate::descriptor::{TypeDescriptor, TypeId, TypeKind, TypeProvider};
use crate::error::{MapError, Result};
use std::collections::HashSet;

fn describe<P: TypeProvider + ?Sized>(provider: &P, ty: TypeId) -> Result<&TypeDescriptor> {
    provider.describe(ty).ok_or(MapError::UnknownType(ty))
}

/// Arguments of the first `shape` instantiation `ty` is assignable to.
fn shape_arguments<'p, P: TypeProvider + ?Sized>(
    provider: &'p P,
    ty: TypeId,
    shape: Option<TypeId>,
) -> Option<&'p [TypeId]> {
    let found = find_shape(provider, ty, shape?)?;
    provider.describe(found).map(TypeDescriptor::generic_arguments)
}

/// Element type of an array-like `ty`.
///
/// A concrete array yields its element. Otherwise `ty` must be assignable to
/// the configured sequence shape and the shape's single argument is
/// returned. A type only marked array-like falls back to its own single
/// generic argument.
pub fn resolve_array_element<P: TypeProvider + ?Sized>(
    provider: &P,
    config: &MapperConfig,
    ty: TypeId,
) -> Result<TypeId> {
    let descriptor = describe(provider, ty)?;
    if let TypeKind::Array { element } = descriptor.kind {
        return Ok(element);
    }

    let from_shape = shape_arguments(provider, ty, config.configured_array_shape());
    let args = from_shape.unwrap_or_else(|| descriptor.generic_arguments());
    match args {
        [element] => Ok(*element),
        _ => Err(MapError::ShapeMismatch {
            type_name: descriptor.full_name(),
            expected: "array-like",
        }),
    }
}

/// Key and value types of a record-like `ty`.
///
/// `ty` must be assignable to the configured key/value shape, or be marked
/// record-like and carry exactly two generic arguments itself.
pub fn resolve_record_element<P: TypeProvider + ?Sized>(
    provider: &P,
    config: &MapperConfig,
    ty: TypeId,
) -> Result<(TypeId, TypeId)> {
    let descriptor = describe(provider, ty)?;
    let from_shape = shape_arguments(provider, ty, config.configured_record_shape());
    let args = from_shape.unwrap_or_else(|| descriptor.generic_arguments());
    match args {
        [key, value] => Ok((*key, *value)),
        _ => Err(MapError::ShapeMismatch {
            type_name: descriptor.full_name(),
            expected: "record-like",
        }),
    }
}

/// Element types of a collection: record key and value, or array element.
///
/// Empty for anything else, including collections whose shape does not
/// resolve (the processor reports those).
fn collection_elements<P: TypeProvider + ?Sized>(
    provider: &P,
    config: &MapperConfig,
    ty: TypeId,
) -> Vec<TypeId> {
    if config.is_record(provider, ty) {
        if let Ok((key, value)) = resolve_record_element(provider, config, ty) {
            return vec![key, value];
        }
    } else if config.is_array(provider, ty) {
        if let Ok(element) = resolve_array_element(provider, config, ty) {
            return vec![element];
        }
    }
    Vec::new()
}

/// Types a reference to `ty` is built from: the nullable underlying type,
/// collection elements and generic arguments.
///
/// Base types and excluded types are opaque leaves.
fn reference_parts<P: TypeProvider + ?Sized>(
    provider: &P,
    config: &MapperConfig,
    ty: TypeId,
) -> Vec<TypeId> {
    let Some(descriptor) = provider.describe(ty) else {
        return Vec::new();
    };
    if config.is_base_type(ty) || config.is_excluded(provider, ty) {
        return Vec::new();
    }
    let mut parts = collection_elements(provider, config, ty);
    if let TypeKind::Nullable { underlying } = descriptor.kind {
        parts.push(underlying);
    }
    if descriptor.generic_definition().is_some() {
        parts.extend_from_slice(descriptor.generic_arguments());
    }
    parts
}

/// Whether `ty`, or any type its reference is built from at any depth,
/// satisfies `predicate`.
pub fn mentions<P, F>(provider: &P, config: &MapperConfig, ty: TypeId, predicate: F) -> bool
where
    P: TypeProvider + ?Sized,
    F: Fn(TypeId) -> bool,
{
    let mut pending = vec![ty];
    let mut seen = HashSet::new();
    while let Some(current) = pending.pop() {
        if !seen.insert(current) {
            continue;
        }
        if predicate(current) {
            return true;
        }
        pending.extend(reference_parts(provider, config, current));
    }
    false
}

/// Whether the reference to collection `ty` would contain `ty` itself,
/// e.g. `class Tree : IEnumerable<Tree>`.
///
/// Such a type cannot be written as an array or record reference and is
/// mapped as a model instead.
pub fn is_self_containing<P: TypeProvider + ?Sized>(
    provider: &P,
    config: &MapperConfig,
    ty: TypeId,
) -> bool {
    let mut pending = collection_elements(provider, config, ty);
    let mut seen = HashSet::new();
    while let Some(current) = pending.pop() {
        if current == ty {
            return true;
        }
        if seen.insert(current) {
            pending.extend(reference_parts(provider, config, current));
        }
    }
    false
}
