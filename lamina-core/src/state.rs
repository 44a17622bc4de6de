//! Exclusively-owned, GPU-resource-owning layer state.
//!
//! A `LayerState` is created when a layer is initialized and lives until
//! the layer is finalized. Exactly one forest slot owns it at any time:
//! the reconciler moves it (never copies it) from a matched old slot to
//! its new counterpart, and the source slot reads empty afterwards.

use std::any::Any;
use std::fmt;

/// Accumulated per-layer state.
///
/// The payload slot is opaque to the engine; layers park whatever they
/// accumulate across frames in it (GPU buffers, programs, attribute
/// tables). Dropping the state drops the payload with it.
pub struct LayerState {
    owner: String,
    needs_redraw: bool,
    payload: Option<Box<dyn Any>>,
}

impl LayerState {
    /// Create state for the layer with the given id.
    ///
    /// Fresh state starts dirty so a newly initialized layer is drawn on
    /// its first frame.
    pub fn new(owner: impl Into<String>, payload: Option<Box<dyn Any>>) -> Self {
        Self {
            owner: owner.into(),
            needs_redraw: true,
            payload,
        }
    }

    /// Id of the layer currently owning this state.
    ///
    /// External callbacks (picking, for one) use this to map a state back
    /// to its layer.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Re-point the back-link at a new owning layer.
    ///
    /// Called by the reconciler when state moves across a match.
    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    /// Mark this layer as needing a redraw.
    pub fn set_needs_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Read the redraw flag, optionally clearing it.
    pub fn consume_needs_redraw(&mut self, clear: bool) -> bool {
        let dirty = self.needs_redraw;
        if clear {
            self.needs_redraw = false;
        }
        dirty
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Borrow the payload, downcast to its concrete type.
    pub fn payload<T: 'static>(&self) -> Option<&T> {
        self.payload.as_ref().and_then(|p| p.downcast_ref())
    }

    /// Mutably borrow the payload, downcast to its concrete type.
    pub fn payload_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.payload.as_mut().and_then(|p| p.downcast_mut())
    }

    /// Replace the payload, dropping any previous one.
    pub fn set_payload(&mut self, payload: Box<dyn Any>) {
        self.payload = Some(payload);
    }

    /// Take the payload out, leaving the slot empty.
    pub fn take_payload(&mut self) -> Option<Box<dyn Any>> {
        self.payload.take()
    }
}

impl fmt::Debug for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerState")
            .field("owner", &self.owner)
            .field("needs_redraw", &self.needs_redraw)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

// ===================================================================
// Tests
// ===================================================================
