//! One [`HartContext`] per hart, sharing a single configuration snapshot.
//!
//! Reservations are never shared between harts. A store by one hart does not
//! invalidate another hart's reservation; modelling that requires the engine
//! to call [`HartContext::cancel_reservation`] on the affected harts itself.

use std::sync::Arc;

use rvplat_config::PlatformConfig;

use crate::console::ConsoleSink;
use crate::context::{HartContext, HartId};

/// The harts of one emulated machine, indexed by [`HartId`].
pub struct HartSet<C: ConsoleSink> {
    harts: Vec<HartContext<C>>,
}

impl<C: ConsoleSink> HartSet<C> {
    /// Create `count` harts with ids `0..count`, each with its own console.
    pub fn new(
        config: Arc<PlatformConfig>,
        count: usize,
        mut make_console: impl FnMut(HartId) -> C,
    ) -> Self {
        let harts = (0..count)
            .map(HartId)
            .map(|id| HartContext::new(id, Arc::clone(&config), make_console(id)))
            .collect();
        tracing::debug!(platform = config.name(), count, "created hart set");
        Self { harts }
    }

    pub fn len(&self) -> usize {
        self.harts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.harts.is_empty()
    }

    pub fn hart(&self, id: HartId) -> Option<&HartContext<C>> {
        self.harts.get(id.0)
    }

    pub fn hart_mut(&mut self, id: HartId) -> Option<&mut HartContext<C>> {
        self.harts.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HartContext<C>> {
        self.harts.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut HartContext<C>> {
        self.harts.iter_mut()
    }
}
