//! The layer capability trait and its parameter types.
//!
//! A layer is a declarative description of a renderable unit. Callers
//! build a fresh set of layer values every frame; the reconciler matches
//! them by id against the previous frame and drives each through the
//! initialize / update / finalize transitions. All dispatch goes through
//! this one interface; the engine never inspects concrete layer types.

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::change::ChangeFlags;
use crate::context::ViewportContext;
use crate::error::LayerError;
use crate::state::LayerState;
use crate::viewport::Uniforms;

/// Props shared by every layer kind.
///
/// `id` must be unique within one frame's forest; it is the matching key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerProps {
    pub id: String,
    pub visible: bool,
    pub opacity: f32,
    pub pickable: bool,
}

impl LayerProps {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            opacity: 1.0,
            pickable: false,
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }
}

/// Child layers produced by a composite layer.
pub enum RenderedLayers {
    None,
    Single(Box<dyn Layer>),
    Many(Vec<Box<dyn Layer>>),
}

impl RenderedLayers {
    pub fn into_vec(self) -> Vec<Box<dyn Layer>> {
        match self {
            Self::None => Vec::new(),
            Self::Single(layer) => vec![layer],
            Self::Many(layers) => layers,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Single(_) => 1,
            Self::Many(layers) => layers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RenderedLayers {
    fn default() -> Self {
        Self::None
    }
}

impl From<Box<dyn Layer>> for RenderedLayers {
    fn from(layer: Box<dyn Layer>) -> Self {
        Self::Single(layer)
    }
}

impl From<Vec<Box<dyn Layer>>> for RenderedLayers {
    fn from(layers: Vec<Box<dyn Layer>>) -> Self {
        Self::Many(layers)
    }
}

/// Arguments to the initialize and update callbacks.
pub struct LifecycleParams<'a> {
    /// The layer this one was matched against, if any. `None` means the
    /// diff baseline is an empty prop set.
    pub old_props: Option<&'a dyn Layer>,
    /// Current frame's context. Read-only for layers.
    pub context: &'a ViewportContext,
    /// Previous frame's context, for before/after comparison.
    pub old_context: &'a ViewportContext,
    /// What changed since the matched layer, viewport bit included.
    pub change_flags: ChangeFlags,
}

/// The fixed capability interface every layer kind implements.
///
/// Only [`props`](Layer::props) and [`as_any`](Layer::as_any) are
/// required; everything else defaults to the behavior of a minimal
/// stateless layer, so composite layers that exist only to produce
/// children stay a few lines long.
pub trait Layer {
    /// Common props. The id inside is the matching key.
    fn props(&self) -> &LayerProps;

    /// The matching key.
    fn id(&self) -> &str {
        &self.props().id
    }

    /// Compare this layer's props against a predecessor's.
    ///
    /// The default is the conservative everything-changed answer; layers
    /// with expensive updates implement a real diff (downcast `old`
    /// through [`Layer::as_any`]).
    fn diff_props(&self, old: &dyn Layer, context: &ViewportContext) -> ChangeFlags {
        let _ = (old, context);
        ChangeFlags::all()
    }

    /// Create this layer's accumulated state.
    ///
    /// Runs exactly once per lineage, when a layer matches nothing from
    /// the previous frame. Returning a payload parks GPU resources in the
    /// new state; returning `None` still creates (empty) state, which is
    /// what marks the layer as live.
    fn initialize_layer(
        &mut self,
        params: &LifecycleParams<'_>,
    ) -> Result<Option<Box<dyn Any>>, LayerError> {
        let _ = params;
        Ok(None)
    }

    /// React to new props with state carried over from the predecessor.
    fn update_layer(
        &mut self,
        state: &mut LayerState,
        params: &LifecycleParams<'_>,
    ) -> Result<(), LayerError> {
        let _ = (state, params);
        Ok(())
    }

    /// Release resources before the state is dropped.
    ///
    /// Runs on the previous frame's layer value when no new layer matched
    /// it.
    fn finalize_layer(&mut self, state: &mut LayerState) -> Result<(), LayerError> {
        let _ = state;
        Ok(())
    }

    /// Produce child layers.
    ///
    /// Called during matching, before any lifecycle callback, so children
    /// must derive from props alone. Children are flattened into the
    /// forest directly after their parent and matched by id like any
    /// other layer.
    fn render_layers(&self) -> Result<RenderedLayers, LayerError> {
        Ok(RenderedLayers::None)
    }

    /// Report and optionally clear this layer's redraw flag.
    fn get_needs_redraw(&self, state: &mut LayerState, clear: bool) -> bool {
        state.consume_needs_redraw(clear)
    }

    /// Draw with the current frame's uniforms.
    ///
    /// Only called while the layer is visible and initialized.
    fn draw_layer(&mut self, state: &mut LayerState, uniforms: &Uniforms) -> Result<(), LayerError> {
        let _ = (state, uniforms);
        Ok(())
    }

    /// Concrete-type escape hatch for prop diffing.
    fn as_any(&self) -> &dyn Any;
}

// ===================================================================
// Tests
// ===================================================================
