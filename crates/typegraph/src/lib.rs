// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typegraph: Reflection-Driven Type Model Mapper
//!
//! Turns a handle to a runtime type into a canonical, de-duplicated,
//! language-neutral graph: one [`Model`] per type identity and lightweight
//! [`Ref`]s pointing at them, ready for a downstream code or schema
//! generator.
//!
//! # Features
//!
//! - **Two-tier output**: self-describing references plus fully realised models
//! - **Cycle safety**: models are registered before their members are visited
//! - **Generic sharing**: one model per open definition, arguments live on references
//! - **Configurable classification**: base types, ignore/exclude predicates,
//!   array-like, record-like and promise markers
//! - **Synthetic type systems**: [`TypeCatalog`] built in code or loaded from YAML
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use typegraph::{MapperConfig, ModelMapper, TypeCatalog};
//!
//! let catalog = TypeCatalog::from_yaml_str(r#"
//! types:
//!   - { name: Int32, namespace: System, kind: value }
//!   - name: Node
//!     namespace: App
//!     fields:
//!       - { name: value, type: Int32 }
//!       - { name: next, type: "Node?" }
//! "#).unwrap();
//!
//! let int = catalog.lookup("System.Int32").unwrap();
//! let node = catalog.lookup("App.Node").unwrap();
//! let config = Arc::new(MapperConfig::new().with_base_type(int, "number"));
//!
//! let mut mapper = ModelMapper::new(&catalog, config);
//! assert_eq!(mapper.map(node).unwrap().to_string(), "Node");
//! let fields = mapper.get_models().unwrap()[0].fields().to_vec();
//! assert_eq!(fields[1].ty.to_string(), "Node | null");
//! ```
//!
//! # Settings File
//!
//! ```toml
//! array_shape = "System.Collections.Generic.IEnumerable"
//! record_shape = "System.Collections.Generic.IDictionary"
//! exclude = ["Vendor.*"]
//!
//! [base_types]
//! "System.Int32" = "number"
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod kinds;
pub mod mapper;
pub mod model;
pub mod namespace;
pub mod pipeline;
pub mod reference;

pub use catalog::{CatalogError, TypeBuilder, TypeCatalog};
pub use config::{ConfigError, MapperConfig, MapperSettings, TypePredicate};
pub use context::{IdentityCache, ProcessingContext};
pub use descriptor::{
    EnumValue, Generic, ImplementationRegistry, Member, Nullability, TypeDescriptor, TypeId,
    TypeKind, TypeProvider,
};
pub use error::{MapError, Result, Stage};
pub use mapper::{MappingArtifact, ModelMapper};
pub use model::{EnumModel, FieldModel, InterfaceModel, Model, ModelId, Registry, StructModel};
pub use namespace::Namespace;
pub use pipeline::{Pipeline, Processor, Referrer};
pub use reference::Ref;
