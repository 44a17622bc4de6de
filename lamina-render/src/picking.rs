//! The picking collaborator seam.
//!
//! Color-buffer picking is a renderer concern, not a reconciliation one;
//! the engine only hands the collaborator everything it needs per call:
//! the device coordinates, the live forest, and the current uniforms.

use lamina_core::Uniforms;

use crate::slot::LayerSlot;

/// What kind of interaction triggered the pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    Click,
    Hover,
}

/// One pick request.
pub struct PickParams<'a> {
    /// Device x coordinate, in pixels.
    pub x: f64,
    /// Device y coordinate, in pixels.
    pub y: f64,
    pub kind: PickKind,
    /// Current frame's uniform bundle.
    pub uniforms: Uniforms,
    /// The live forest, in draw order. Mutable so the collaborator can
    /// render layers into its pick buffer.
    pub layers: &'a mut [LayerSlot],
}

/// What a pick resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct PickInfo {
    /// Id of the picked layer (the state's owner back-link).
    pub layer_id: String,
    /// Index of the picked object within the layer, if the layer draws
    /// more than one.
    pub object_index: Option<usize>,
    /// Unprojected common-space coordinate of the pick, if available.
    pub coordinate: Option<[f64; 2]>,
}

/// The collaborator contract.
pub trait PickLayers {
    fn pick_layers(&mut self, params: PickParams<'_>) -> Option<PickInfo>;
}
