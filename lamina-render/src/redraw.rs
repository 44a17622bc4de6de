//! Frame-level dirtiness aggregation.

use crate::slot::LayerSlot;

/// Collapses per-layer redraw flags and the empty-forest transition into
/// one answer per check.
///
/// The screen-cleared rule: when every layer is removed, one more redraw
/// must happen to clear the previous frame's pixels. The tracker
/// remembers whether it has observed a drawn, non-empty forest and fires
/// exactly once after it empties.
#[derive(Debug)]
pub(crate) struct RedrawTracker {
    screen_cleared: bool,
}

impl RedrawTracker {
    pub(crate) fn new() -> Self {
        Self {
            // nothing has been drawn yet, so there is nothing to clear
            screen_cleared: true,
        }
    }

    /// OR together the forest's redraw signals.
    ///
    /// Deliberately no short-circuiting: with `clear_flags` set, every
    /// visible layer's flag must be consulted (and so reset) even when
    /// the answer is already known to be true.
    pub(crate) fn check(&mut self, forest: &mut [LayerSlot], clear_flags: bool) -> bool {
        let mut redraw = false;

        if forest.is_empty() {
            if !self.screen_cleared {
                redraw = true;
                self.screen_cleared = true;
            }
        } else {
            self.screen_cleared = false;
        }

        for slot in forest.iter_mut() {
            if !slot.layer().props().visible {
                continue;
            }
            redraw |= slot.needs_redraw(clear_flags);
        }

        redraw
    }
}

impl Default for RedrawTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use std::any::Any;

    use lamina_core::{Layer, LayerProps, LayerState};

    use super::*;

    struct Bare {
        props: LayerProps,
    }

    impl Layer for Bare {
        fn props(&self) -> &LayerProps {
            &self.props
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn slot(id: &str, visible: bool) -> LayerSlot {
        let mut slot = LayerSlot::new(Box::new(Bare {
            props: LayerProps::new(id).with_visible(visible),
        }));
        slot.state = Some(LayerState::new(id, None));
        slot
    }

    #[test]
    fn test_empty_forest_never_drawn_needs_nothing() {
        let mut tracker = RedrawTracker::new();
        assert!(!tracker.check(&mut [], true));
        assert!(!tracker.check(&mut [], true));
    }

    #[test]
    fn test_clears_once_after_forest_empties() {
        let mut tracker = RedrawTracker::new();
        let mut forest = vec![slot("a", true)];
        assert!(tracker.check(&mut forest, true)); // fresh state is dirty
        assert!(!tracker.check(&mut forest, true));

        assert!(tracker.check(&mut [], true));
        assert!(!tracker.check(&mut [], true));
    }

    #[test]
    fn test_hidden_layers_are_not_consulted() {
        let mut tracker = RedrawTracker::new();
        let mut forest = vec![slot("a", false)];
        assert!(!tracker.check(&mut forest, true));
        // the hidden layer's flag was left alone
        assert!(forest[0].state_mut().unwrap().consume_needs_redraw(false));
    }

    #[test]
    fn test_clear_flags_false_keeps_layer_flags() {
        let mut tracker = RedrawTracker::new();
        let mut forest = vec![slot("a", true)];
        assert!(tracker.check(&mut forest, false));
        assert!(tracker.check(&mut forest, false));
        assert!(tracker.check(&mut forest, true));
        assert!(!tracker.check(&mut forest, true));
    }
}
