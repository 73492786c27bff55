//! Registry-scoped display context shared with the proxies

use crate::representation::{DisplayMode, GraphicsBackend, RepresentationId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::warn;

/// Display state shared by one registry and its proxies
pub struct SceneContext {
    backend: Box<dyn GraphicsBackend>,
    display_modes: HashMap<RepresentationId, DisplayMode>,
}

/// Strong reference held by the registry
pub type SharedContext = Rc<RefCell<SceneContext>>;

impl SceneContext {
    pub fn new(backend: Box<dyn GraphicsBackend>) -> Self {
        Self {
            backend,
            display_modes: HashMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedContext {
        Rc::new(RefCell::new(self))
    }

    /// Record the mode of a representation and forward it to the renderer
    pub fn set_display_mode(&mut self, representation: RepresentationId, mode: DisplayMode) {
        self.display_modes.insert(representation, mode);
        self.backend.set_display_mode(representation, mode);
    }

    pub fn display_mode(&self, representation: RepresentationId) -> Option<DisplayMode> {
        self.display_modes.get(&representation).copied()
    }

    /// Drop state kept for an erased representation
    pub fn forget(&mut self, representation: RepresentationId) {
        self.display_modes.remove(&representation);
    }

    pub fn backend(&self) -> &dyn GraphicsBackend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn GraphicsBackend {
        self.backend.as_mut()
    }
}

impl fmt::Debug for SceneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneContext")
            .field("display_modes", &self.display_modes)
            .finish_non_exhaustive()
    }
}

/// Non-owning handle a proxy keeps on its registry's context
#[derive(Debug, Clone, Default)]
pub struct ContextHandle(Weak<RefCell<SceneContext>>);

impl ContextHandle {
    pub fn new(context: &SharedContext) -> Self {
        Self(Rc::downgrade(context))
    }

    /// Run `f` on the context; `None` once the registry is gone or while
    /// the context is already borrowed
    pub fn with<R>(&self, f: impl FnOnce(&mut SceneContext) -> R) -> Option<R> {
        let cell = self.0.upgrade()?;
        let Ok(mut context) = cell.try_borrow_mut() else {
            warn!("Scene context is busy, request dropped");
            return None;
        };
        Some(f(&mut context))
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
