// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Processor strategies: classify an unseen type, register its model and
//! recurse into what it depends on.

use crate::context::ProcessingContext;
use crate::descriptor::{Nullability, TypeDescriptor, TypeId, TypeKind, TypeProvider};
use crate::error::Result;
use crate::kinds;
use crate::model::{EnumModel, FieldModel, InterfaceModel, Model, ModelId, StructModel};
use crate::reference::Ref;

/// One processor strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Processor {
    /// Closed instantiation: process the open definition, then the arguments.
    GenericTemplate,
    /// Matches an ignore predicate: invisible.
    Ignored,
    /// Matches an exclude predicate: referenceable but opaque.
    Excluded,
    /// Nullable wrapper: process the underlying value type.
    NullableUnwrap,
    GenericParameter,
    /// Configured primitive or promise wrapper.
    BaseType,
    Enum,
    Record,
    Array,
    Interface,
    /// Catch-all.
    Struct,
}

impl Processor {
    pub const STANDARD: [Processor; 11] = [
        Processor::GenericTemplate,
        Processor::Ignored,
        Processor::Excluded,
        Processor::NullableUnwrap,
        Processor::GenericParameter,
        Processor::BaseType,
        Processor::Enum,
        Processor::Record,
        Processor::Array,
        Processor::Interface,
        Processor::Struct,
    ];

    pub fn can_process<P: TypeProvider + ?Sized>(
        self,
        ctx: &ProcessingContext<'_, P>,
        ty: TypeId,
        descriptor: &TypeDescriptor,
    ) -> bool {
        let provider = ctx.provider();
        let config = ctx.config();
        match self {
            Self::GenericTemplate => descriptor.generic_definition().is_some(),
            Self::Ignored => config.is_ignored(provider, ty),
            Self::Excluded => config.is_excluded(provider, ty),
            Self::NullableUnwrap => matches!(descriptor.kind, TypeKind::Nullable { .. }),
            Self::GenericParameter => descriptor.is_generic_parameter(),
            Self::BaseType => config.is_base_type(ty) || config.is_promise(provider, ty),
            Self::Enum => descriptor.is_enum(),
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

    pub fn process<'a, P: TypeProvider + ?Sized>(
        self,
        ctx: &mut ProcessingContext<'a, P>,
        ty: TypeId,
        descriptor: &'a TypeDescriptor,
    ) -> Result<()> {
        match self {
            Self::GenericTemplate => process_template(ctx, ty, descriptor),
            Self::Ignored | Self::Excluded | Self::GenericParameter | Self::BaseType => Ok(()),
            Self::NullableUnwrap => match descriptor.kind {
                TypeKind::Nullable { underlying } => ctx.process(underlying),
                _ => Ok(()),
            },
            Self::Enum => process_enum(ctx, ty),
            Self::Record => {
                let (key, value) =
                    kinds::resolve_record_element(ctx.provider(), ctx.config(), ty)?;
                ctx.process(key)?;
                ctx.process(value)
            }
            Self::Array => {
                let element = kinds::resolve_array_element(ctx.provider(), ctx.config(), ty)?;
                ctx.process(element)
            }
            Self::Interface => process_shape(ctx, ty, true),
            Self::Struct => process_shape(ctx, ty, false),
        }
    }
}

fn process_template<'a, P: TypeProvider + ?Sized>(
    ctx: &mut ProcessingContext<'a, P>,
    ty: TypeId,
    descriptor: &'a TypeDescriptor,
) -> Result<()> {
    let Some(definition) = descriptor.generic_definition() else {
        return Ok(());
    };
    ctx.process(definition)?;

    // Arguments of an invisible or opaque generic are never visited.
    if ctx.is_ignored(ty) || ctx.is_excluded(ty) {
        return Ok(());
    }
    for &argument in descriptor.generic_arguments() {
        ctx.process(argument)?;
    }
    Ok(())
}

fn process_enum<P: TypeProvider + ?Sized>(ctx: &mut ProcessingContext<'_, P>, ty: TypeId) -> Result<()> {
    let identity = ctx.identity(ty)?;
    if ctx.is_registered(identity) {
        return Ok(());
    }
    let descriptor = ctx.descriptor(identity)?;
    let namespace = ctx.namespace_of(identity)?;
    let model = EnumModel::new(namespace, descriptor.name.clone(), descriptor.enum_values().to_vec());
    ctx.register(identity, Model::Enum(model))?;
    Ok(())
}

/// Shared body of the interface and struct processors.
///
/// The model is registered before anything it mentions is processed, so a
/// type reachable from itself finds its own (unpopulated) model.
fn process_shape<P: TypeProvider + ?Sized>(
    ctx: &mut ProcessingContext<'_, P>,
    ty: TypeId,
    interface: bool,
) -> Result<()> {
    let identity = ctx.identity(ty)?;
    if ctx.is_registered(identity) {
        return Ok(());
    }
    let descriptor = ctx.descriptor(identity)?;
    let namespace = ctx.namespace_of(identity)?;
    let name = descriptor.name.clone();
    let model = if interface {
        Model::Interface(InterfaceModel::new(namespace, name))
    } else {
        Model::Struct(StructModel::new(namespace, name, descriptor.is_abstract()))
    };
    let id = ctx.register(identity, model)?;

    let mut args = Vec::with_capacity(descriptor.generic_arguments().len());
    for &parameter in descriptor.generic_arguments() {
        ctx.process(parameter)?;
        args.push(ctx.get_ref(parameter, Nullability::NotNull)?);
    }
    populate(ctx, id, Slot::Args(args))?;

    if !interface {
        let base = match descriptor.base {
            Some(base) if !ctx.mentions_ignored(base) => {
                ctx.process(base)?;
                Some(ctx.get_ref(base, Nullability::NotNull)?)
            }
            _ => None,
        };
        populate(ctx, id, Slot::Base(base))?;
    }

    let mut interfaces = Vec::with_capacity(descriptor.interfaces.len());
    for &iface in &descriptor.interfaces {
        if ctx.mentions_ignored(iface) {
            continue;
        }
        ctx.process(iface)?;
        interfaces.push(ctx.get_ref(iface, Nullability::NotNull)?);
    }
    populate(ctx, id, Slot::Interfaces(interfaces))?;

    let mut fields = Vec::with_capacity(descriptor.members.len());
    for member in &descriptor.members {
        if ctx.mentions_ignored(member.ty) {
            log::trace!(
                "[Processor::process] skipping member {}.{}: its type mentions an ignored type",
                descriptor.name,
                member.name
            );
            continue;
        }
        ctx.process(member.ty)?;
        let ty = ctx.get_ref(member.ty, member.nullability)?;
        fields.push(FieldModel::new(member.name.clone(), ty));
    }
    populate(ctx, id, Slot::Fields(fields))
}

enum Slot {
    Args(Vec<Ref>),
    Base(Option<Ref>),
    Interfaces(Vec<Ref>),
    Fields(Vec<FieldModel>),
}

fn populate<P: TypeProvider + ?Sized>(
    ctx: &mut ProcessingContext<'_, P>,
    id: ModelId,
    slot: Slot,
) -> Result<()> {
    match (ctx.model_mut(id)?, slot) {
        (Model::Struct(m), Slot::Args(args)) => m.set_args(args),
        (Model::Struct(m), Slot::Base(base)) => m.set_base(base),
        (Model::Struct(m), Slot::Interfaces(interfaces)) => m.set_interfaces(interfaces),
        (Model::Struct(m), Slot::Fields(fields)) => m.set_fields(fields),
        (Model::Interface(m), Slot::Args(args)) => m.set_args(args),
        (Model::Interface(m), Slot::Interfaces(interfaces)) => m.set_interfaces(interfaces),
        (Model::Interface(m), Slot::Fields(fields)) => m.set_fields(fields),
        _ => Ok(()),
    }
}
