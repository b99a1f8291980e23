// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Referrer strategies: produce a [`Ref`] for a type without building new
//! models.

use crate::context::ProcessingContext;
use crate::descriptor::{Nullability, TypeDescriptor, TypeId, TypeKind, TypeProvider};
use crate::error::{MapError, Result};
use crate::kinds;
use crate::reference::Ref;

/// One referrer strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Referrer {
    /// Nullable annotation or nullable value wrapper.
    Nullable,
    /// Opaque `BaseType` carrying the declared name.
    Excluded,
    GenericParameter,
    BaseType,
    Enum,
    /// Asynchronous wrapper, with or without a result type.
    Promise,
    Record,
    Array,
    /// Registered interface model.
    Interface,
    /// Registered struct model (catch-all).
    Struct,
}

impl Referrer {
    pub const STANDARD: [Referrer; 10] = [
        Referrer::Nullable,
        Referrer::Excluded,
        Referrer::GenericParameter,
        Referrer::BaseType,
        Referrer::Enum,
        Referrer::Promise,
        Referrer::Record,
        Referrer::Array,
        Referrer::Interface,
        Referrer::Struct,
    ];

    pub fn can_refer<P: TypeProvider + ?Sized>(
        self,
        ctx: &ProcessingContext<'_, P>,
        ty: TypeId,
        descriptor: &TypeDescriptor,
        nullability: Nullability,
    ) -> bool {
        let provider = ctx.provider();
        let config = ctx.config();
        match self {
            Self::Nullable => {
                nullability.is_nullable() || matches!(descriptor.kind, TypeKind::Nullable { .. })
            }
            Self::Excluded => config.is_excluded(provider, ty),
            Self::GenericParameter => descriptor.is_generic_parameter(),
            Self::BaseType => config.is_base_type(ty),
            Self::Enum => descriptor.is_enum(),
            Self::Promise => config.is_promise(provider, ty),
            Self::Record => {
                config.is_record(provider, ty) && !kinds::is_self_containing(provider, config, ty)
            }
            Self::Array => {
                config.is_array(provider, ty) && !kinds::is_self_containing(provider, config, ty)
            }
            Self::Interface => descriptor.is_interface(),
            Self::Struct => true,
        }
    }

    pub fn refer<'a, P: TypeProvider + ?Sized>(
        self,
        ctx: &mut ProcessingContext<'a, P>,
        ty: TypeId,
        descriptor: &'a TypeDescriptor,
    ) -> Result<Ref> {
        match self {
            Self::Nullable => {
                let inner = match descriptor.kind {
                    TypeKind::Nullable { underlying } => underlying,
                    _ => ty,
                };
                Ok(Ref::nullable(ctx.get_ref(inner, Nullability::NotNull)?))
            }
            Self::Excluded => Ok(Ref::base(descriptor.name.clone())),
            Self::GenericParameter => Ok(Ref::generic_parameter(descriptor.name.clone())),
            Self::BaseType => {
                let name = ctx
                    .config()
                    .base_type_name(ty)
                    .unwrap_or(descriptor.name.as_str());
                Ok(Ref::base(name))
            }
            Self::Enum => {
                let identity = ctx.identity(ty)?;
                let namespace = ctx.namespace_of(identity)?;
                Ok(Ref::enumeration(namespace, descriptor.name.clone()))
            }
            Self::Promise => match descriptor.generic_arguments() {
                [] => Ok(Ref::promise(None)),
                [result] => Ok(Ref::promise(Some(ctx.get_ref(*result, Nullability::NotNull)?))),
                _ => Err(MapError::ShapeMismatch {
                    type_name: descriptor.full_name(),
                    expected: "promise",
                }),
            },
            Self::Record => {
                let (key, value) =
                    kinds::resolve_record_element(ctx.provider(), ctx.config(), ty)?;
                let key = ctx.get_ref(key, Nullability::NotNull)?;
                let value = ctx.get_ref(value, Nullability::NotNull)?;
                Ok(Ref::record(key, value))
            }
            Self::Array => {
                let element = kinds::resolve_array_element(ctx.provider(), ctx.config(), ty)?;
                Ok(Ref::array(ctx.get_ref(element, Nullability::NotNull)?))
            }
            Self::Interface | Self::Struct => ctx.require_ref(ty),
        }
    }
}
