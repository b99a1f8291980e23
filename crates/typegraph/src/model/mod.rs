// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fully realised type models.
//!
//! Struct and interface models are registered as empty shells and populated
//! afterwards, so a type that refers to itself (directly or through other
//! types) can be referenced while its own model is still being built. Each
//! mutable field set accepts exactly one write.

mod registry;

pub use registry::{ModelId, Registry};

use crate::descriptor::EnumValue;
use crate::error::{MapError, Result};
use crate::namespace::Namespace;
use crate::reference::Ref;
use serde::Serialize;

/// One member slot of a struct or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldModel {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Ref,
}

impl FieldModel {
    pub fn new(name: impl Into<String>, ty: Ref) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Closed set of named integer values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumModel {
    pub namespace: Namespace,
    pub name: String,
    pub values: Vec<EnumValue>,
}

impl EnumModel {
    pub fn new(namespace: Namespace, name: impl Into<String>, values: Vec<EnumValue>) -> Self {
        Self {
            namespace,
            name: name.into(),
            values,
        }
    }

    /// Integer value of the constant `name`.
    pub fn value(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, model: &str, field: &'static str) -> Result<()> {
    if slot.is_some() {
        return Err(MapError::AlreadyPopulated {
            model: model.to_string(),
            field,
        });
    }
    *slot = Some(value);
    Ok(())
}

/// Interface shape: generic parameters, extended interfaces and members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceModel {
    pub namespace: Namespace,
    pub name: String,
    args: Option<Vec<Ref>>,
    interfaces: Option<Vec<Ref>>,
    fields: Option<Vec<FieldModel>>,
}

impl InterfaceModel {
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
            args: None,
            interfaces: None,
            fields: None,
        }
    }

    pub fn args(&self) -> &[Ref] {
        self.args.as_deref().unwrap_or_default()
    }

    pub fn interfaces(&self) -> &[Ref] {
        self.interfaces.as_deref().unwrap_or_default()
    }

    pub fn fields(&self) -> &[FieldModel] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn set_args(&mut self, args: Vec<Ref>) -> Result<()> {
        set_once(&mut self.args, args, &self.name, "args")
    }

    pub fn set_interfaces(&mut self, interfaces: Vec<Ref>) -> Result<()> {
        set_once(&mut self.interfaces, interfaces, &self.name, "interfaces")
    }

    pub fn set_fields(&mut self, fields: Vec<FieldModel>) -> Result<()> {
        set_once(&mut self.fields, fields, &self.name, "fields")
    }

    pub fn is_populated(&self) -> bool {
        self.args.is_some() && self.interfaces.is_some() && self.fields.is_some()
    }
}

/// Struct (class or value type) shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructModel {
    pub namespace: Namespace,
    pub name: String,
    pub is_abstract: bool,
    args: Option<Vec<Ref>>,
    base: Option<Option<Ref>>,
    interfaces: Option<Vec<Ref>>,
    fields: Option<Vec<FieldModel>>,
}

impl StructModel {
    pub fn new(namespace: Namespace, name: impl Into<String>, is_abstract: bool) -> Self {
        Self {
            namespace,
            name: name.into(),
            is_abstract,
            args: None,
            base: None,
            interfaces: None,
            fields: None,
        }
    }

    pub fn args(&self) -> &[Ref] {
        self.args.as_deref().unwrap_or_default()
    }

    pub fn base(&self) -> Option<&Ref> {
        self.base.as_ref().and_then(Option::as_ref)
    }

    pub fn interfaces(&self) -> &[Ref] {
        self.interfaces.as_deref().unwrap_or_default()
    }

    pub fn fields(&self) -> &[FieldModel] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn set_args(&mut self, args: Vec<Ref>) -> Result<()> {
        set_once(&mut self.args, args, &self.name, "args")
    }

    pub fn set_base(&mut self, base: Option<Ref>) -> Result<()> {
        set_once(&mut self.base, base, &self.name, "base")
    }

    pub fn set_interfaces(&mut self, interfaces: Vec<Ref>) -> Result<()> {
        set_once(&mut self.interfaces, interfaces, &self.name, "interfaces")
    }

    pub fn set_fields(&mut self, fields: Vec<FieldModel>) -> Result<()> {
        set_once(&mut self.fields, fields, &self.name, "fields")
    }

    pub fn is_populated(&self) -> bool {
        self.args.is_some()
            && self.base.is_some()
            && self.interfaces.is_some()
            && self.fields.is_some()
    }
}

/// A registered type model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    Enum(EnumModel),
    Interface(InterfaceModel),
    Struct(StructModel),
}

impl Model {
    pub fn namespace(&self) -> &Namespace {
        match self {
            Self::Enum(m) => &m.namespace,
            Self::Interface(m) => &m.namespace,
            Self::Struct(m) => &m.namespace,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enum(m) => &m.name,
            Self::Interface(m) => &m.name,
            Self::Struct(m) => &m.name,
        }
    }

    /// Generic parameters (empty for enums and non-generic types).
    pub fn args(&self) -> &[Ref] {
        match self {
            Self::Enum(_) => &[],
            Self::Interface(m) => m.args(),
            Self::Struct(m) => m.args(),
        }
    }

    pub fn fields(&self) -> &[FieldModel] {
        match self {
            Self::Enum(_) => &[],
            Self::Interface(m) => m.fields(),
            Self::Struct(m) => m.fields(),
        }
    }

    /// Reference to this model carrying the given type arguments.
    pub fn reference(&self, args: Vec<Ref>) -> Ref {
        match self {
            Self::Enum(m) => Ref::enumeration(m.namespace.clone(), m.name.clone()),
            Self::Interface(m) => Ref::interface(m.namespace.clone(), m.name.clone(), args),
            Self::Struct(m) => Ref::structure(m.namespace.clone(), m.name.clone(), args),
        }
    }

    /// Reference to the open model, its own parameters as arguments.
    pub fn self_reference(&self) -> Ref {
        self.reference(self.args().to_vec())
    }

    pub fn as_struct(&self) -> Option<&StructModel> {
        match self {
            Self::Struct(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceModel> {
        match self {
            Self::Interface(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumModel> {
        match self {
            Self::Enum(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_accept_one_write() {
        let mut model = StructModel::new(Namespace::from("App"), "Order", false);
        assert!(model.fields().is_empty());
        assert!(!model.is_populated());

        model
            .set_fields(vec![FieldModel::new("id", Ref::base("number"))])
            .unwrap();
        let err = model.set_fields(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            MapError::AlreadyPopulated { field: "fields", .. }
        ));
        assert_eq!(model.fields().len(), 1);
    }

    #[test]
    fn test_absent_base_still_counts_as_populated() {
        let mut model = StructModel::new(Namespace::from("App"), "Order", false);
        model.set_args(Vec::new()).unwrap();
        model.set_base(None).unwrap();
        model.set_interfaces(Vec::new()).unwrap();
        model.set_fields(Vec::new()).unwrap();
        assert!(model.is_populated());
        assert!(model.base().is_none());
        assert!(model.set_base(Some(Ref::base("object"))).is_err());
    }

    #[test]
    fn test_reference_matches_variant() {
        let ns = Namespace::from("App");
        let mut iface = InterfaceModel::new(ns.clone(), "IRepo");
        iface.set_args(vec![Ref::generic_parameter("T")]).unwrap();
        let model = Model::Interface(iface);
        assert_eq!(
            model.self_reference(),
            Ref::interface(ns.clone(), "IRepo", vec![Ref::generic_parameter("T")])
        );

        let color = Model::Enum(EnumModel::new(ns.clone(), "Color", Vec::new()));
        assert_eq!(color.reference(Vec::new()), Ref::enumeration(ns, "Color"));
    }

    #[test]
    fn test_enum_value_lookup() {
        let color = EnumModel::new(
            Namespace::from("App"),
            "Color",
            vec![EnumValue::new("Red", 0), EnumValue::new("Blue", 2)],
        );
        assert_eq!(color.value("Blue"), Some(2));
        assert_eq!(color.value("Green"), None);
    }
}
