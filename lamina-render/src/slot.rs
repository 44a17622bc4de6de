//! One live forest entry.

use std::fmt;

use lamina_core::{Layer, LayerState};

/// A layer as the engine holds it: the caller's boxed layer value, the
/// accumulated state it owns (present iff initialized and not finalized),
/// and, between match and update, the predecessor it was matched against.
pub struct LayerSlot {
    pub(crate) layer: Box<dyn Layer>,
    pub(crate) state: Option<LayerState>,
    pub(crate) predecessor: Option<Box<dyn Layer>>,
}

impl LayerSlot {
    pub(crate) fn new(layer: Box<dyn Layer>) -> Self {
        Self {
            layer,
            state: None,
            predecessor: None,
        }
    }

    pub fn layer(&self) -> &dyn Layer {
        self.layer.as_ref()
    }

    pub(crate) fn layer_mut(&mut self) -> &mut dyn Layer {
        self.layer.as_mut()
    }

    pub fn id(&self) -> &str {
        self.layer.id()
    }

    pub fn state(&self) -> Option<&LayerState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut LayerState> {
        self.state.as_mut()
    }

    /// Whether the layer has live state.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Whether matching paired this layer with a predecessor this frame.
    /// Only meaningful between match and update.
    pub(crate) fn is_matched(&self) -> bool {
        self.predecessor.is_some()
    }

    /// Consult (and optionally clear) the layer's redraw flag.
    pub(crate) fn needs_redraw(&mut self, clear: bool) -> bool {
        match self.state.as_mut() {
            Some(state) => self.layer.get_needs_redraw(state, clear),
            None => false,
        }
    }
}

impl fmt::Debug for LayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerSlot")
            .field("id", &self.id())
            .field("initialized", &self.state.is_some())
            .field("matched", &self.predecessor.is_some())
            .finish()
    }
}
