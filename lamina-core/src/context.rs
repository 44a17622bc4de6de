//! Per-frame viewport context and its change tracker.
//!
//! The context is shared by reference with every layer in a frame and is
//! read-only from their side; only the tracker rebuilds it, and only
//! between frames. A shadow copy of the previous frame's context is kept
//! so lifecycle callbacks can compare before and after.

use crate::camera::CameraParams;
use crate::viewport::{Uniforms, Viewport};

/// Everything a layer may read about the current frame's view.
#[derive(Debug, Clone)]
pub struct ViewportContext {
    /// The camera parameters this context was built from.
    pub camera: CameraParams,
    /// Derived viewport (projection, scale, center).
    pub viewport: Viewport,
    /// Uniform bundle handed to draw calls.
    pub uniforms: Uniforms,
}

impl ViewportContext {
    pub fn from_camera(camera: CameraParams) -> Self {
        let viewport = Viewport::new(&camera);
        let uniforms = viewport.uniforms();
        Self {
            camera,
            viewport,
            uniforms,
        }
    }
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self::from_camera(CameraParams::default())
    }
}

/// Tracks the current and previous frame's context.
///
/// `set_context` is the cheap path: identical camera parameters with an
/// existing context recompute nothing and leave every flag untouched.
#[derive(Debug)]
pub struct ContextTracker {
    context: ViewportContext,
    previous: ViewportContext,
    viewport_changed: bool,
    has_context: bool,
}

impl ContextTracker {
    pub fn new() -> Self {
        Self {
            context: ViewportContext::default(),
            previous: ViewportContext::default(),
            viewport_changed: false,
            has_context: false,
        }
    }

    /// Install camera parameters for the coming frame.
    ///
    /// Returns `true` when the context was rebuilt. On the very first call
    /// the previous context is the default context and the viewport is
    /// always considered changed.
    pub fn set_context(&mut self, camera: CameraParams) -> bool {
        if self.has_context && self.context.camera == camera {
            return false;
        }
        self.previous = self.context.clone();
        self.context = ViewportContext::from_camera(camera);
        self.viewport_changed = true;
        self.has_context = true;
        true
    }

    pub fn context(&self) -> &ViewportContext {
        &self.context
    }

    /// The previous frame's context, for before/after comparison in
    /// lifecycle callbacks.
    pub fn old_context(&self) -> &ViewportContext {
        &self.previous
    }

    pub fn viewport_changed(&self) -> bool {
        self.viewport_changed
    }

    /// Read the viewport-changed flag, optionally clearing it.
    ///
    /// With `clear = true` under a once-per-frame check cycle the flag is
    /// valid for exactly one frame.
    pub fn consume_viewport_changed(&mut self, clear: bool) -> bool {
        let changed = self.viewport_changed;
        if clear {
            self.viewport_changed = false;
        }
        changed
    }

    pub fn uniforms(&self) -> Uniforms {
        self.context.uniforms
    }
}

impl Default for ContextTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// Tests
// ===================================================================
