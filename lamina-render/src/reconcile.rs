//! Identity matching and the lifecycle phases.
//!
//! One frame's reconciliation is four steps over two forests:
//!
//! 1. match the new forest against the old one by id, expanding child
//!    layers as they are discovered and moving state across each pairing;
//! 2. finalize old layers nothing matched;
//! 3. update matched layers;
//! 4. initialize layers that matched nothing.
//!
//! Every step isolates per-layer failures: the failing layer is recorded
//! and the rest of the forest is still processed. Each step reports a
//! [`PhaseOutcome`]; the caller surfaces the first error across the whole
//! pass once everything has been applied.

use lamina_core::{ChangeFlags, Diagnostics, Layer, LayerState, LifecycleParams, ViewportContext};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{LifecyclePhase, ReconcileError};
use crate::slot::LayerSlot;

/// Result of one phase: how many layers it applied cleanly, and the
/// first failure it saw. Explicit data instead of catch-and-continue
/// control flow, so callers decide what an error means.
#[derive(Debug, Default)]
pub struct PhaseOutcome {
    pub applied: usize,
    pub first_error: Option<ReconcileError>,
}

impl PhaseOutcome {
    pub(crate) fn record(&mut self, err: ReconcileError, diag: &mut Diagnostics) {
        diag.warn_once(err.to_string());
        if self.first_error.is_none() {
            self.first_error = Some(err);
        }
    }
}

/// Output of the matching pass.
pub(crate) struct MatchResult {
    /// The new live forest, in depth-first discovery order.
    pub(crate) forest: Vec<LayerSlot>,
    /// Number of pairings that moved state.
    pub(crate) matched: usize,
    pub(crate) outcome: PhaseOutcome,
}

/// Match the new layers against the old forest.
///
/// The old forest arrives as options so a matched slot can be taken out;
/// whatever is left over belongs to [`finalize_unmatched`]. Matching is
/// global per forest build: a child produced during expansion can match
/// any old layer with its id, not just an old child of the same parent.
///
/// Duplicate-id policy, both forests: the first bearer in forest order
/// owns the id; later bearers are diagnosed and treated as if their id
/// were fresh.
pub(crate) fn match_forests(
    old: &mut [Option<LayerSlot>],
    new_layers: Vec<Box<dyn Layer>>,
    diag: &mut Diagnostics,
) -> Result<MatchResult, ReconcileError> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for (i, slot) in old.iter().enumerate() {
        let Some(slot) = slot else { continue };
        if index.contains_key(slot.id()) {
            diag.warn_once(format!("duplicate layer id `{}` in previous forest", slot.id()));
        } else {
            index.insert(slot.id().to_string(), i);
        }
    }

    let mut forest: Vec<LayerSlot> = Vec::with_capacity(new_layers.len());
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut matched = 0;
    let mut outcome = PhaseOutcome::default();

    // Depth-first worklist. Children are pushed in reverse directly after
    // their parent is placed, which yields the required order: parent
    // first, its whole subtree next, later siblings after that.
    let mut stack: Vec<Box<dyn Layer>> = new_layers;
    stack.reverse();

    while let Some(layer) = stack.pop() {
        let id = layer.id().to_string();
        let mut slot = LayerSlot::new(layer);

        if !seen.insert(id.clone()) {
            diag.warn_once(format!("duplicate layer id `{id}` in new forest"));
        } else if let Some(&i) = index.get(&id) {
            match old[i].take() {
                Some(old_slot) if old_slot.state.is_some() => {
                    transfer_state(old_slot, &mut slot)?;
                    matched += 1;
                }
                // A stateless predecessor (its initialization failed in a
                // prior frame) has nothing to donate; the new layer
                // initializes fresh and the husk is dropped here.
                Some(_) | None => {}
            }
        }

        match slot.layer().render_layers() {
            Ok(children) => {
                let mut children = children.into_vec();
                children.reverse();
                stack.append(&mut children);
            }
            Err(err) => {
                outcome.record(
                    ReconcileError::lifecycle(&id, LifecyclePhase::Matching, err),
                    diag,
                );
            }
        }

        forest.push(slot);
        outcome.applied += 1;
    }

    Ok(MatchResult {
        forest,
        matched,
        outcome,
    })
}

/// Move state from a matched old slot into its successor.
///
/// Ownership rules do the heavy lifting: the source is consumed, so it
/// cannot be the destination and cannot be read through afterwards. The
/// stateless-source check stays as a loud guard against engine bugs.
fn transfer_state(mut old_slot: LayerSlot, new_slot: &mut LayerSlot) -> Result<(), ReconcileError> {
    let Some(mut state) = old_slot.state.take() else {
        return Err(ReconcileError::Invariant(format!(
            "state transfer attempted from stateless layer `{}`",
            old_slot.id()
        )));
    };
    state.set_owner(new_slot.id());
    new_slot.state = Some(state);
    new_slot.predecessor = Some(old_slot.layer);
    Ok(())
}

/// Finalize every old layer matching left behind.
///
/// State is cleared whether or not the callback succeeds; a layer with no
/// state was never initialized (or already finalized) and is skipped
/// silently.
pub(crate) fn finalize_unmatched(
    old: &mut [Option<LayerSlot>],
    diag: &mut Diagnostics,
) -> PhaseOutcome {
    let mut outcome = PhaseOutcome::default();
    for slot in old.iter_mut() {
        let Some(slot) = slot.as_mut() else { continue };
        let Some(mut state) = slot.state.take() else { continue };
        match slot.layer_mut().finalize_layer(&mut state) {
            Ok(()) => outcome.applied += 1,
            Err(err) => {
                let err = ReconcileError::lifecycle(slot.id(), LifecyclePhase::Finalize, err);
                outcome.record(err, diag);
            }
        }
        // state (and the GPU payload it owns) drops here
    }
    outcome
}

/// Update every layer that was matched this frame.
///
/// The predecessor serves as the old props for the diff and the callback,
/// and is dropped afterwards: old props are only retained between match
/// and update.
pub(crate) fn update_matched(
    forest: &mut [LayerSlot],
    context: &ViewportContext,
    old_context: &ViewportContext,
    viewport_changed: bool,
    diag: &mut Diagnostics,
) -> PhaseOutcome {
    let mut outcome = PhaseOutcome::default();
    for slot in forest.iter_mut() {
        let LayerSlot {
            layer,
            state,
            predecessor,
        } = slot;
        let Some(old_layer) = predecessor.take() else { continue };
        let Some(state) = state.as_mut() else { continue };

        let mut change_flags = layer.diff_props(old_layer.as_ref(), context);
        change_flags.viewport_changed |= viewport_changed;
        let params = LifecycleParams {
            old_props: Some(old_layer.as_ref()),
            context,
            old_context,
            change_flags,
        };
        match layer.update_layer(state, &params) {
            Ok(()) => {
                if change_flags.something_changed() {
                    state.set_needs_redraw();
                }
                outcome.applied += 1;
            }
            Err(err) => {
                let err = ReconcileError::lifecycle(layer.id(), LifecyclePhase::Update, err);
                outcome.record(err, diag);
            }
        }
    }
    outcome
}

/// Initialize every layer that matched nothing.
///
/// On success the layer gets fresh state back-linked to its id. On
/// failure the layer stays stateless: it contributes no drawable state
/// this frame, and a successor matching its id next frame will simply
/// initialize again.
pub(crate) fn initialize_new(
    forest: &mut [LayerSlot],
    context: &ViewportContext,
    old_context: &ViewportContext,
    diag: &mut Diagnostics,
) -> PhaseOutcome {
    let mut outcome = PhaseOutcome::default();
    for slot in forest.iter_mut() {
        if slot.state.is_some() {
            continue;
        }
        let params = LifecycleParams {
            old_props: None,
            context,
            old_context,
            change_flags: ChangeFlags::all(),
        };
        match slot.layer_mut().initialize_layer(&params) {
            Ok(payload) => {
                let id = slot.id().to_string();
                slot.state = Some(LayerState::new(id, payload));
                outcome.applied += 1;
            }
            Err(err) => {
                let err = ReconcileError::lifecycle(slot.id(), LifecyclePhase::Initialize, err);
                outcome.record(err, diag);
            }
        }
    }
    outcome
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use std::any::Any;

    use lamina_core::{LayerProps, RenderedLayers};

    use super::*;

    struct Bare {
        props: LayerProps,
        children: Vec<&'static str>,
    }

    impl Bare {
        fn boxed(id: &str) -> Box<dyn Layer> {
            Box::new(Self {
                props: LayerProps::new(id),
                children: Vec::new(),
            })
        }

        fn with_children(id: &str, children: Vec<&'static str>) -> Box<dyn Layer> {
            Box::new(Self {
                props: LayerProps::new(id),
                children,
            })
        }
    }

    impl Layer for Bare {
        fn props(&self) -> &LayerProps {
            &self.props
        }

        fn render_layers(&self) -> Result<RenderedLayers, lamina_core::LayerError> {
            if self.children.is_empty() {
                return Ok(RenderedLayers::None);
            }
            Ok(self
                .children
                .iter()
                .map(|id| Bare::boxed(id))
                .collect::<Vec<_>>()
                .into())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn ids(forest: &[LayerSlot]) -> Vec<&str> {
        forest.iter().map(LayerSlot::id).collect()
    }

    #[test]
    fn test_expansion_is_depth_first() {
        let mut diag = Diagnostics::new();
        let new_layers = vec![
            Bare::with_children("p", vec!["x", "y"]),
            Bare::boxed("q"),
        ];
        let result = match_forests(&mut [], new_layers, &mut diag).unwrap();
        assert_eq!(ids(&result.forest), ["p", "x", "y", "q"]);
        assert_eq!(result.matched, 0);
    }

    #[test]
    fn test_duplicate_new_id_is_treated_as_fresh() {
        let mut diag = Diagnostics::new();
        let mut old = vec![Some({
            let mut slot = LayerSlot::new(Bare::boxed("a"));
            slot.state = Some(LayerState::new("a", None));
            slot
        })];
        let new_layers = vec![Bare::boxed("a"), Bare::boxed("a")];
        let result = match_forests(&mut old, new_layers, &mut diag).unwrap();
        assert_eq!(result.matched, 1);
        assert!(result.forest[0].is_matched());
        assert!(!result.forest[1].is_matched());
        assert_eq!(diag.emitted(), 1);
    }

    #[test]
    fn test_stateless_predecessor_donates_nothing() {
        let mut diag = Diagnostics::new();
        let mut old = vec![Some(LayerSlot::new(Bare::boxed("a")))];
        let result = match_forests(&mut old, vec![Bare::boxed("a")], &mut diag).unwrap();
        assert_eq!(result.matched, 0);
        assert!(!result.forest[0].is_matched());
        // the husk was consumed, so finalize has nothing left to visit
        assert!(old[0].is_none());
    }
}
