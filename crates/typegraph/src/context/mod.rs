// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Processing context: one mapping session.
//!
//! The context owns the session registry and dispatches every type to the
//! processor and referrer chains of its [`Pipeline`]. Configuration and
//! pipeline are shared (`Arc`); registry and caches are not, so a context
//! is used by one thread at a time.

mod identity;

pub use identity::{Identity, IdentityCache};

use crate::config::MapperConfig;
use crate::descriptor::{ImplementationRegistry, Nullability, TypeDescriptor, TypeId, TypeProvider};
use crate::error::{MapError, Result, Stage};
use crate::kinds;
use crate::model::{Model, ModelId, Registry};
use crate::namespace::Namespace;
use crate::pipeline::Pipeline;
use crate::reference::Ref;
use std::sync::Arc;

/// Mapping session state.
pub struct ProcessingContext<'a, P: TypeProvider + ?Sized> {
    provider: &'a P,
    config: Arc<MapperConfig>,
    pipeline: Pipeline,
    registry: Registry,
    implementations: Option<&'a dyn ImplementationRegistry>,
    identities: IdentityCache,
    /// Types whose processing is in progress.
    processing: Vec<TypeId>,
    /// References under construction.
    resolving: Vec<(TypeId, Nullability)>,
    includes_processed: bool,
}

impl<'a, P: TypeProvider + ?Sized> ProcessingContext<'a, P> {
    pub fn new(provider: &'a P, config: Arc<MapperConfig>, pipeline: Pipeline) -> Self {
        Self {
            provider,
            config,
            pipeline,
            registry: Registry::new(),
            implementations: None,
            identities: IdentityCache::new(),
            processing: Vec::new(),
            resolving: Vec::new(),
            includes_processed: false,
        }
    }

    /// Attach the polymorphic implementation lookup.
    pub fn with_implementations(mut self, registry: &'a dyn ImplementationRegistry) -> Self {
        self.implementations = Some(registry);
        self
    }

    pub fn provider(&self) -> &'a P {
        self.provider
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn descriptor(&self, ty: TypeId) -> Result<&'a TypeDescriptor> {
        self.provider.describe(ty).ok_or(MapError::UnknownType(ty))
    }

    /// Identity of `ty`: its open generic definition, or `ty` itself.
    pub fn identity(&mut self, ty: TypeId) -> Result<TypeId> {
        Ok(self.identities.resolve(self.provider, ty)?.open)
    }

    /// Namespace of the identity of `ty`.
    pub fn namespace_of(&mut self, ty: TypeId) -> Result<Namespace> {
        Ok(self.identities.resolve(self.provider, ty)?.namespace.clone())
    }

    pub fn is_ignored(&self, ty: TypeId) -> bool {
        self.config.is_ignored(self.provider, ty)
    }

    pub fn is_excluded(&self, ty: TypeId) -> bool {
        self.config.is_excluded(self.provider, ty)
    }

    /// Whether `ty` is ignored or built from an ignored type at any depth
    /// (`Object[]`, `List<Object>`, `Task<Object>`). Members, bases and
    /// interfaces of such types are dropped.
    pub fn mentions_ignored(&self, ty: TypeId) -> bool {
        let provider = self.provider;
        let config = &*self.config;
        kinds::mentions(provider, config, ty, |t| config.is_ignored(provider, t))
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Whether the identity of `ty` already owns a model.
    pub fn is_registered(&self, ty: TypeId) -> bool {
        let identity = self
            .provider
            .describe(ty)
            .and_then(TypeDescriptor::generic_definition)
            .unwrap_or(ty);
        self.registry.contains(identity)
    }

    /// Register `model` for `identity`; a no-op returning the existing id if
    /// the identity is already registered.
    pub fn register(&mut self, identity: TypeId, model: Model) -> Result<ModelId> {
        let provider = self.provider;
        let describe = |ty: TypeId| {
            provider
                .describe(ty)
                .map(TypeDescriptor::full_name)
                .unwrap_or_else(|| ty.to_string())
        };
        let namespace = model.namespace().clone();
        let name = model.name().to_string();
        let id = self.registry.insert(identity, model, &describe)?;
        log::debug!(
            "[ProcessingContext::register] {} registered as {} (model {})",
            describe(identity),
            namespace.qualify(&name),
            id.0
        );
        Ok(id)
    }

    pub fn model_mut(&mut self, id: ModelId) -> Result<&mut Model> {
        let provider = self.provider;
        let owner = self.registry.iter().nth(id.0).map(|(ty, _)| ty);
        self.registry.get_mut(id).ok_or_else(|| MapError::Unregistered {
            type_name: owner
                .and_then(|ty| provider.describe(ty))
                .map(TypeDescriptor::full_name)
                .unwrap_or_else(|| format!("model {}", id.0)),
        })
    }

    /// Registered model of the identity of `ty`.
    pub fn model_of(&self, ty: TypeId) -> Option<&Model> {
        let identity = self
            .provider
            .describe(ty)
            .and_then(TypeDescriptor::generic_definition)
            .unwrap_or(ty);
        self.registry.by_identity(identity)
    }

    /// Registry length, for [`ProcessingContext::rollback`].
    pub fn checkpoint(&self) -> usize {
        self.registry.len()
    }

    /// Forget every model registered since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: usize) {
        let dropped = self.registry.len().saturating_sub(checkpoint);
        self.registry.truncate(checkpoint);
        self.processing.clear();
        self.resolving.clear();
        if dropped > 0 {
            log::debug!(
                "[ProcessingContext::rollback] dropped {} partially built models",
                dropped
            );
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Run the first processor that claims `ty`.
    pub fn process(&mut self, ty: TypeId) -> Result<()> {
        let descriptor = self.descriptor(ty)?;
        if self.processing.contains(&ty) {
            log::trace!(
                "[ProcessingContext::process] {} already in progress",
                descriptor.full_name()
            );
            return Ok(());
        }

        self.processing.push(ty);
        let result = self.dispatch_process(ty, descriptor);
        self.processing.pop();
        result
    }

    fn dispatch_process(&mut self, ty: TypeId, descriptor: &'a TypeDescriptor) -> Result<()> {
        let pipeline = self.pipeline.clone();
        for &processor in pipeline.processors() {
            if processor.can_process(self, ty, descriptor) {
                log::trace!(
                    "[ProcessingContext::process] {:?} claims {}",
                    processor,
                    descriptor.full_name()
                );
                return processor.process(self, ty, descriptor);
            }
        }
        Err(MapError::Unclassified {
            stage: Stage::Process,
            type_name: descriptor.full_name(),
        })
    }

    /// Reference to `ty` from the first referrer that claims it.
    pub fn get_ref(&mut self, ty: TypeId, nullability: Nullability) -> Result<Ref> {
        let descriptor = self.descriptor(ty)?;
        if self.resolving.contains(&(ty, nullability)) {
            return Err(MapError::RecursiveReference {
                type_name: descriptor.full_name(),
            });
        }

        self.resolving.push((ty, nullability));
        let result = self.dispatch_ref(ty, descriptor, nullability);
        self.resolving.pop();
        result
    }

    fn dispatch_ref(
        &mut self,
        ty: TypeId,
        descriptor: &'a TypeDescriptor,
        nullability: Nullability,
    ) -> Result<Ref> {
        let pipeline = self.pipeline.clone();
        for &referrer in pipeline.referrers() {
            if referrer.can_refer(self, ty, descriptor, nullability) {
                log::trace!(
                    "[ProcessingContext::get_ref] {:?} refers to {}",
                    referrer,
                    descriptor.full_name()
                );
                return referrer.refer(self, ty, descriptor);
            }
        }
        Err(MapError::Unclassified {
            stage: Stage::Reference,
            type_name: descriptor.full_name(),
        })
    }

    /// Struct, interface or enum reference to the registered model of `ty`.
    ///
    /// A closed instantiation carries references to its own arguments; any
    /// other type carries the model's parameters.
    pub fn require_ref(&mut self, ty: TypeId) -> Result<Ref> {
        let descriptor = self.descriptor(ty)?;
        if self.is_ignored(ty) {
            // Invisible types have no model to point at.
            return Err(MapError::Unclassified {
                stage: Stage::Reference,
                type_name: descriptor.full_name(),
            });
        }
        let identity = self.identity(ty)?;
        let Some(id) = self.registry.id_of(identity) else {
            return Err(MapError::Unregistered {
                type_name: descriptor.full_name(),
            });
        };

        let args = if descriptor.generic_definition().is_some() {
            let mut args = Vec::with_capacity(descriptor.generic_arguments().len());
            for &argument in descriptor.generic_arguments() {
                args.push(self.get_ref(argument, Nullability::NotNull)?);
            }
            args
        } else {
            self.registry
                .get(id)
                .map(|model| model.args().to_vec())
                .unwrap_or_default()
        };

        let model = self.registry.get(id).ok_or_else(|| MapError::Unregistered {
            type_name: descriptor.full_name(),
        })?;
        if let Model::Struct(_) | Model::Interface(_) = model {
            if args.len() != model.args().len() {
                return Err(MapError::GenericArityMismatch {
                    type_name: descriptor.full_name(),
                    expected: model.args().len(),
                    found: args.len(),
                });
            }
        }
        Ok(model.reference(args))
    }

    // ------------------------------------------------------------------
    // Session queries
    // ------------------------------------------------------------------

    /// Known concrete implementations of `ty`; empty without a lookup.
    pub fn get_implementations(&self, ty: TypeId) -> Vec<TypeId> {
        self.implementations
            .map(|registry| registry.implementations(ty))
            .unwrap_or_default()
    }

    /// Every registered model, after processing the configured includes
    /// (once per session).
    pub fn get_models(&mut self) -> Result<&[Model]> {
        if !self.includes_processed {
            let config = Arc::clone(&self.config);
            for &ty in config.includes() {
                self.process(ty)?;
            }
            self.includes_processed = true;
        }
        Ok(self.registry.models())
    }
}
