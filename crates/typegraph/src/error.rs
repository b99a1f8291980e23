// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping failure modes.
//!
//! Every variant aborts the `map` call that produced it. A partially built
//! graph is never handed to a downstream generator.

use crate::descriptor::TypeId;
use std::fmt;
use thiserror::Error;

/// Which strategy chain failed to classify a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Process,
    Reference,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process => f.write_str("processor"),
            Self::Reference => f.write_str("referrer"),
        }
    }
}

/// Errors raised while building the model/reference graph.
#[derive(Debug, Error)]
pub enum MapError {
    /// No strategy in the chain claimed the type.
    #[error("no {stage} claims type `{type_name}`")]
    Unclassified { stage: Stage, type_name: String },

    /// A type classified as array-like or record-like lacks the element shape.
    #[error("type `{type_name}` does not expose the {expected} shape")]
    ShapeMismatch {
        type_name: String,
        expected: &'static str,
    },

    /// Two distinct identities resolve to the same `(namespace, name)` pair.
    #[error("types `{first}` and `{second}` both map to `{namespace}` `{name}`")]
    AmbiguousIdentity {
        namespace: String,
        name: String,
        first: String,
        second: String,
    },

    /// A reference carries a different number of type arguments than its model.
    #[error("reference to `{type_name}` carries {found} type arguments, model declares {expected}")]
    GenericArityMismatch {
        type_name: String,
        expected: usize,
        found: usize,
    },

    /// A struct or interface reference was requested before its model exists.
    #[error("type `{type_name}` has no registered model")]
    Unregistered { type_name: String },

    /// The type provider does not know the handle.
    #[error("unknown type handle {0}")]
    UnknownType(TypeId),

    /// Building a reference re-entered the same type (a non-generic
    /// array-like type whose element is itself, for example).
    #[error("reference to `{type_name}` expands into itself")]
    RecursiveReference { type_name: String },

    /// A mutable-once model field was set twice.
    #[error("model `{model}` already has its {field} populated")]
    AlreadyPopulated { model: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, MapError>;
