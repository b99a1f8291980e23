// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lightweight references: "what type sits here".
//!
//! A [`Ref`] either describes itself completely (base types, generic
//! parameters, nullable/array/record/promise wrappers) or points at a
//! registered [`crate::model::Model`] by namespace and name. It never carries
//! member lists.

use crate::namespace::Namespace;
use serde::Serialize;
use std::fmt;

/// Reference to a type from a field, argument or base slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ref {
    BaseType {
        name: String,
    },
    Nullable {
        inner: Box<Ref>,
    },
    GenericParameter {
        name: String,
    },
    Enum {
        namespace: Namespace,
        name: String,
    },
    Array {
        element: Box<Ref>,
    },
    Record {
        key: Box<Ref>,
        value: Box<Ref>,
    },
    Struct {
        namespace: Namespace,
        name: String,
        args: Vec<Ref>,
    },
    Interface {
        namespace: Namespace,
        name: String,
        args: Vec<Ref>,
    },
    Promise {
        inner: Option<Box<Ref>>,
    },
}

impl Ref {
    pub fn base(name: impl Into<String>) -> Self {
        Self::BaseType { name: name.into() }
    }

    pub fn generic_parameter(name: impl Into<String>) -> Self {
        Self::GenericParameter { name: name.into() }
    }

    pub fn nullable(inner: Ref) -> Self {
        Self::Nullable {
            inner: Box::new(inner),
        }
    }

    pub fn array(element: Ref) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    pub fn record(key: Ref, value: Ref) -> Self {
        Self::Record {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn promise(inner: Option<Ref>) -> Self {
        Self::Promise {
            inner: inner.map(Box::new),
        }
    }

    pub fn enumeration(namespace: Namespace, name: impl Into<String>) -> Self {
        Self::Enum {
            namespace,
            name: name.into(),
        }
    }

    pub fn structure(namespace: Namespace, name: impl Into<String>, args: Vec<Ref>) -> Self {
        Self::Struct {
            namespace,
            name: name.into(),
            args,
        }
    }

    pub fn interface(namespace: Namespace, name: impl Into<String>, args: Vec<Ref>) -> Self {
        Self::Interface {
            namespace,
            name: name.into(),
            args,
        }
    }

    /// `(namespace, name)` of the model this reference points at, if any.
    pub fn target(&self) -> Option<(&Namespace, &str)> {
        match self {
            Self::Enum { namespace, name }
            | Self::Struct {
                namespace, name, ..
            }
            | Self::Interface {
                namespace, name, ..
            } => Some((namespace, name)),
            _ => None,
        }
    }

    /// Type arguments of a struct or interface reference.
    pub fn args(&self) -> &[Ref] {
        match self {
            Self::Struct { args, .. } | Self::Interface { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable { .. })
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Ref]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(">")
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseType { name } | Self::GenericParameter { name } => f.write_str(name),
            Self::Nullable { inner } => write!(f, "{} | null", inner),
            Self::Enum { name, .. } => f.write_str(name),
            Self::Array { element } => match element.as_ref() {
                Self::Nullable { .. } => write!(f, "({})[]", element),
                _ => write!(f, "{}[]", element),
            },
            Self::Record { key, value } => write!(f, "Record<{}, {}>", key, value),
            Self::Struct { name, args, .. } | Self::Interface { name, args, .. } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Self::Promise { inner: Some(inner) } => write!(f, "Promise<{}>", inner),
            Self::Promise { inner: None } => f.write_str("Promise<void>"),
        }
    }
}
