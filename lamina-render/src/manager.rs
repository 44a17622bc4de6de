//! The public layer-reconciliation engine.
//!
//! `LayerManager` owns the live forest and the viewport context. Once per
//! frame the application calls `set_context` with the camera, hands
//! `update_layers` a fresh list of layer descriptors, and then draws,
//! picks, and checks redraw against the reconciled forest.

use lamina_core::{CameraParams, ContextTracker, Diagnostics, Layer, Uniforms, ViewportContext};

use crate::error::{LifecyclePhase, ReconcileError};
use crate::picking::{PickInfo, PickKind, PickLayers, PickParams};
use crate::reconcile::{
    finalize_unmatched, initialize_new, match_forests, update_matched, PhaseOutcome,
};
use crate::redraw::RedrawTracker;
use crate::slot::LayerSlot;

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Layers in the new live forest, generated children included.
    pub total: usize,
    /// Pairings that moved state from the previous frame.
    pub matched: usize,
    /// Layers initialized fresh.
    pub initialized: usize,
    /// Old layers finalized.
    pub finalized: usize,
}

/// Frame draw statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Layers drawn.
    pub drawn: usize,
    /// Layers skipped (hidden, uninitialized, or failed).
    pub skipped: usize,
}

/// Reconciles each frame's declarative layer list against the previous
/// frame's, reusing accumulated GPU state across matches.
///
/// # Usage
///
/// ```ignore
/// let mut manager = LayerManager::new();
/// manager.set_context(camera);
/// manager.update_layers(layers)?;
/// if manager.needs_redraw(true) {
///     manager.draw_layers()?;
/// }
/// ```
pub struct LayerManager {
    tracker: ContextTracker,
    layers: Vec<LayerSlot>,
    redraw: RedrawTracker,
    diag: Diagnostics,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            tracker: ContextTracker::new(),
            layers: Vec::new(),
            redraw: RedrawTracker::new(),
            diag: Diagnostics::new(),
        }
    }

    /// Install camera parameters for the coming frame.
    ///
    /// Unchanged parameters are a no-op; otherwise the viewport context
    /// is rebuilt, the previous one is kept for old/new comparison in
    /// lifecycle callbacks, and the frame is flagged viewport-changed.
    pub fn set_context(&mut self, camera: CameraParams) -> &mut Self {
        if self.tracker.set_context(camera) {
            log::debug!(
                "viewport context rebuilt (zoom {}, {}x{})",
                camera.zoom,
                camera.width,
                camera.height
            );
        }
        self
    }

    pub fn context(&self) -> &ViewportContext {
        self.tracker.context()
    }

    /// Reconcile a fresh frame of layer descriptors.
    ///
    /// Runs matching, then the lifecycle phases in their fixed order:
    /// finalize dropped layers, update matched layers, initialize new
    /// ones. Per-layer failures never stop the pass; after everything is
    /// applied, the first error encountered (in pass order) is returned.
    /// The forest is fully updated either way.
    pub fn update_layers(
        &mut self,
        new_layers: Vec<Box<dyn Layer>>,
    ) -> Result<ReconcileStats, ReconcileError> {
        let mut old: Vec<Option<LayerSlot>> = self.layers.drain(..).map(Some).collect();

        let mut result = match_forests(&mut old, new_layers, &mut self.diag)?;
        let finalize = finalize_unmatched(&mut old, &mut self.diag);

        let viewport_changed = self.tracker.viewport_changed();
        let update = update_matched(
            &mut result.forest,
            self.tracker.context(),
            self.tracker.old_context(),
            viewport_changed,
            &mut self.diag,
        );
        let initialize = initialize_new(
            &mut result.forest,
            self.tracker.context(),
            self.tracker.old_context(),
            &mut self.diag,
        );

        let stats = ReconcileStats {
            total: result.forest.len(),
            matched: result.matched,
            initialized: initialize.applied,
            finalized: finalize.applied,
        };
        self.layers = result.forest;
        log::debug!(
            "reconciled {} layers ({} matched, {} initialized, {} finalized)",
            stats.total,
            stats.matched,
            stats.initialized,
            stats.finalized
        );

        let first_error = result
            .outcome
            .first_error
            .or(finalize.first_error)
            .or(update.first_error)
            .or(initialize.first_error);
        match first_error {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }

    /// Draw every visible, initialized layer in forest order.
    ///
    /// Per-layer draw failures are isolated like lifecycle failures: the
    /// layer is skipped, the sweep continues, and the first error is
    /// returned at the end.
    pub fn draw_layers(&mut self) -> Result<DrawStats, ReconcileError> {
        let uniforms = self.tracker.uniforms();
        let mut stats = DrawStats::default();
        let mut outcome = PhaseOutcome::default();

        for slot in &mut self.layers {
            let LayerSlot { layer, state, .. } = slot;
            if !layer.props().visible {
                stats.skipped += 1;
                continue;
            }
            let Some(state) = state.as_mut() else {
                // broken or stateless layer: nothing drawable this frame
                stats.skipped += 1;
                continue;
            };
            match layer.draw_layer(state, &uniforms) {
                Ok(()) => stats.drawn += 1,
                Err(err) => {
                    stats.skipped += 1;
                    let err = ReconcileError::lifecycle(layer.id(), LifecyclePhase::Draw, err);
                    outcome.record(err, &mut self.diag);
                }
            }
        }

        match outcome.first_error {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }

    /// Resolve what sits under a device coordinate.
    ///
    /// A thin pass-through: the collaborator receives the live forest and
    /// the current uniforms and does the rest.
    pub fn pick_layer(
        &mut self,
        picker: &mut dyn PickLayers,
        x: f64,
        y: f64,
        kind: PickKind,
    ) -> Option<PickInfo> {
        let uniforms = self.tracker.uniforms();
        picker.pick_layers(PickParams {
            x,
            y,
            kind,
            uniforms,
            layers: &mut self.layers,
        })
    }

    /// Whether anything visible must be regenerated this frame.
    ///
    /// True when the viewport changed, when any visible layer flagged
    /// itself dirty, or (exactly once) when the forest just became empty.
    /// With `clear_redraw_flags` every consulted flag is reset.
    pub fn needs_redraw(&mut self, clear_redraw_flags: bool) -> bool {
        let viewport = self.tracker.consume_viewport_changed(clear_redraw_flags);
        let forest = self.redraw.check(&mut self.layers, clear_redraw_flags);
        viewport | forest
    }

    /// The live forest, in draw order.
    pub fn layers(&self) -> &[LayerSlot] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Current frame's uniform bundle.
    pub fn uniforms(&self) -> Uniforms {
        self.tracker.uniforms()
    }

    /// Distinct diagnostics emitted so far.
    pub fn diagnostics_emitted(&self) -> usize {
        self.diag.emitted()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_manager_is_empty() {
        let manager = LayerManager::new();
        assert!(manager.is_empty());
        assert_eq!(manager.layer_count(), 0);
    }

    #[test]
    fn test_empty_update_is_clean() {
        let mut manager = LayerManager::new();
        let stats = manager.update_layers(Vec::new()).unwrap();
        assert_eq!(stats, ReconcileStats::default());
    }

    #[test]
    fn test_set_context_chains() {
        let mut manager = LayerManager::new();
        manager
            .set_context(CameraParams::new(800, 600))
            .set_context(CameraParams::new(800, 600));
        assert_eq!(manager.context().camera.width, 800);
        assert!(manager.needs_redraw(true));
        assert!(!manager.needs_redraw(true));
    }
}
