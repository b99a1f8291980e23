// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Strategy chains.
//!
//! A [`Pipeline`] is the ordered processor chain plus the ordered referrer
//! chain. Order is significant: the first strategy that claims a type owns
//! it. Strategies are stateless, so one pipeline is shared by any number of
//! sessions (and threads).

mod processor;
mod referrer;

pub use processor::Processor;
pub use referrer::Referrer;

use std::sync::Arc;

/// Ordered processor and referrer chains.
#[derive(Debug, Clone)]
pub struct Pipeline {
    processors: Arc<[Processor]>,
    referrers: Arc<[Referrer]>,
}

impl Pipeline {
    /// Pipeline in an arbitrary order.
    ///
    /// Dropping the catch-all [`Processor::Struct`] or [`Referrer::Struct`]
    /// makes unclaimed types fail with `Unclassified`.
    pub fn new(
        processors: impl Into<Arc<[Processor]>>,
        referrers: impl Into<Arc<[Referrer]>>,
    ) -> Self {
        Self {
            processors: processors.into(),
            referrers: referrers.into(),
        }
    }

    /// The fixed standard order.
    pub fn standard() -> Self {
        Self::new(Processor::STANDARD.to_vec(), Referrer::STANDARD.to_vec())
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn referrers(&self) -> &[Referrer] {
        &self.referrers
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}
