// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Model mapper facade.

use crate::config::MapperConfig;
use crate::context::ProcessingContext;
use crate::descriptor::{ImplementationRegistry, Nullability, TypeId, TypeProvider};
use crate::error::Result;
use crate::model::Model;
use crate::pipeline::Pipeline;
use crate::reference::Ref;
use serde::Serialize;
use std::sync::Arc;

/// Produced graph: the mapped roots and every registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingArtifact {
    pub roots: Vec<Ref>,
    pub models: Vec<Model>,
}

impl MappingArtifact {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Entry point of a mapping session.
///
/// ```
/// use std::sync::Arc;
/// use typegraph::{MapperConfig, ModelMapper, Ref, TypeCatalog};
///
/// let mut catalog = TypeCatalog::new();
/// let int = catalog.value_type("System", "Int32").build().unwrap();
/// let point = catalog
///     .class("Geo", "Point")
///     .field("x", "Int32")
///     .field("y", "Int32")
///     .build()
///     .unwrap();
///
/// let config = Arc::new(MapperConfig::new().with_base_type(int, "number"));
/// let mut mapper = ModelMapper::new(&catalog, config);
/// let root = mapper.map(point).unwrap();
/// assert_eq!(root.to_string(), "Point");
/// assert_eq!(mapper.get_models().unwrap()[0].fields()[0].ty, Ref::base("number"));
/// ```
pub struct ModelMapper<'a, P: TypeProvider + ?Sized> {
    context: ProcessingContext<'a, P>,
    roots: Vec<Ref>,
}

impl<'a, P: TypeProvider + ?Sized> ModelMapper<'a, P> {
    /// Mapper with the standard pipeline.
    pub fn new(provider: &'a P, config: Arc<MapperConfig>) -> Self {
        Self::with_pipeline(provider, config, Pipeline::standard())
    }

    pub fn with_pipeline(provider: &'a P, config: Arc<MapperConfig>, pipeline: Pipeline) -> Self {
        Self {
            context: ProcessingContext::new(provider, config, pipeline),
            roots: Vec::new(),
        }
    }

    /// Attach the polymorphic implementation lookup.
    pub fn with_implementations(mut self, registry: &'a dyn ImplementationRegistry) -> Self {
        self.context = self.context.with_implementations(registry);
        self
    }

    pub fn context(&self) -> &ProcessingContext<'a, P> {
        &self.context
    }

    /// Process `ty` and everything it depends on, then return its reference.
    ///
    /// On error every model registered by this call is dropped again.
    pub fn map(&mut self, ty: TypeId) -> Result<Ref> {
        let checkpoint = self.context.checkpoint();
        let mapped = match self.context.process(ty) {
            Ok(()) => self.context.get_ref(ty, Nullability::NotNull),
            Err(err) => Err(err),
        };
        match mapped {
            Ok(reference) => {
                if !self.roots.contains(&reference) {
                    self.roots.push(reference.clone());
                }
                Ok(reference)
            }
            Err(err) => {
                log::debug!("[ModelMapper::map] mapping {} failed: {}", ty, err);
                self.context.rollback(checkpoint);
                Err(err)
            }
        }
    }

    /// Every registered model, including the configured includes.
    pub fn get_models(&mut self) -> Result<&[Model]> {
        let checkpoint = self.context.checkpoint();
        if let Err(err) = self.context.get_models().map(|_| ()) {
            self.context.rollback(checkpoint);
            return Err(err);
        }
        self.context.get_models()
    }

    pub fn implementations(&self, ty: TypeId) -> Vec<TypeId> {
        self.context.get_implementations(ty)
    }

    /// References returned by successful [`ModelMapper::map`] calls, without
    /// duplicates.
    pub fn roots(&self) -> &[Ref] {
        &self.roots
    }

    pub fn artifact(&mut self) -> Result<MappingArtifact> {
        let models = self.get_models()?.to_vec();
        Ok(MappingArtifact {
            roots: self.roots.clone(),
            models,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeCatalog;
    use crate::error::MapError;

    #[test]
    fn test_failed_map_leaves_no_models() {
        let mut catalog = TypeCatalog::new();
        let int = catalog.value_type("System", "Int32").build().unwrap();
        let seq = catalog.interface("Coll", "ISeq").params(["T"]).build().unwrap();
        catalog.class("App", "Bag").build().unwrap();
        let order = catalog
            .class("App", "Order")
            .field("id", "Int32")
            .field("bag", "Bag")
            .build()
            .unwrap();
        let bag = catalog.lookup("App.Bag").unwrap();

        // Bag is marked array-like but has no element type.
        let config = MapperConfig::new()
            .with_base_type(int, "number")
            .array_shape(seq)
            .mark_array(bag);
        let mut mapper = ModelMapper::new(&catalog, Arc::new(config));
        let err = mapper.map(order).unwrap_err();
        assert!(matches!(err, MapError::ShapeMismatch { .. }));
        assert!(mapper.get_models().unwrap().is_empty());
        assert!(mapper.roots().is_empty());
    }

    #[test]
    fn test_artifact_serializes() {
        let mut catalog = TypeCatalog::new();
        let color = catalog
            .enumeration("App", "Color")
            .value("Red", 0)
            .build()
            .unwrap();
        let mut mapper = ModelMapper::new(&catalog, Arc::new(MapperConfig::new()));
        mapper.map(color).unwrap();
        mapper.map(color).unwrap();

        let artifact = mapper.artifact().unwrap();
        assert_eq!(artifact.roots.len(), 1);
        let json: serde_json::Value =
            serde_json::from_str(&artifact.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["roots"][0]["kind"], "enum");
        assert_eq!(json["models"][0]["kind"], "enum");
        assert_eq!(json["models"][0]["values"][0]["name"], "Red");
    }
}
