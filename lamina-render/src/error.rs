//! Reconciliation errors.

use std::fmt;

use lamina_core::LayerError;
use thiserror::Error;

/// Which step of the frame a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Matching,
    Finalize,
    Update,
    Initialize,
    Draw,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Matching => "matching",
            Self::Finalize => "finalize",
            Self::Update => "update",
            Self::Initialize => "initialize",
            Self::Draw => "draw",
        };
        f.write_str(name)
    }
}

/// What `update_layers` (or `draw_layers`) reports.
///
/// A `Lifecycle` error is the first per-layer failure of the pass; the
/// rest of the forest was still fully processed. An `Invariant` error is
/// a bug in the caller or the engine and aborts the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("layer `{id}` failed during {phase}: {source}")]
    Lifecycle {
        id: String,
        phase: LifecyclePhase,
        #[source]
        source: LayerError,
    },

    #[error("reconciler invariant violated: {0}")]
    Invariant(String),
}

impl ReconcileError {
    pub(crate) fn lifecycle(id: &str, phase: LifecyclePhase, source: LayerError) -> Self {
        Self::Lifecycle {
            id: id.to_string(),
            phase,
            source,
        }
    }

    /// The id of the failing layer, for `Lifecycle` errors.
    pub fn layer_id(&self) -> Option<&str> {
        match self {
            Self::Lifecycle { id, .. } => Some(id),
            Self::Invariant(_) => None,
        }
    }

    /// The phase the failure happened in, for `Lifecycle` errors.
    pub fn phase(&self) -> Option<LifecyclePhase> {
        match self {
            Self::Lifecycle { phase, .. } => Some(*phase),
            Self::Invariant(_) => None,
        }
    }
}
