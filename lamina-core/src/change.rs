//! Prop-diff result flags.
//!
//! Produced by a layer's `diff_props` and consumed by the update
//! callback; the reconciler merges in the frame's viewport-changed bit.

/// What changed for a layer between two frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeFlags {
    /// The layer's source data changed; GPU attributes need a rebuild.
    pub data_changed: bool,
    /// Any other prop changed.
    pub props_changed: bool,
    /// The viewport changed this frame.
    pub viewport_changed: bool,
}

impl ChangeFlags {
    /// Nothing changed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything changed.
    ///
    /// This is the diff of an empty prop set against the current props,
    /// used when a layer is initialized and as the conservative default
    /// for layers that do not implement a real diff.
    pub fn all() -> Self {
        Self {
            data_changed: true,
            props_changed: true,
            viewport_changed: true,
        }
    }

    pub fn something_changed(&self) -> bool {
        self.data_changed || self.props_changed || self.viewport_changed
    }

    pub fn merge(&mut self, other: Self) {
        self.data_changed |= other.data_changed;
        self.props_changed |= other.props_changed;
        self.viewport_changed |= other.viewport_changed;
    }
}

// ===================================================================
// Tests
// ===================================================================
