//! # lamina-core
//!
//! Data model and contracts for the lamina layer-reconciliation engine.
//!
//! ## Architecture
//!
//! ```text
//!  CameraParams
//!       │
//!       ▼
//!  ContextTracker.set_context()     ◀─── rebuilds only when a field changed
//!       │
//!       ▼
//!  ViewportContext                  ◀─── camera + viewport + uniform bundle,
//!       │                                shared read-only with every layer
//!       ▼
//!  Layer (trait) callbacks          ◀─── initialize / update / finalize,
//!                                        driven by lamina-render
//! ```
//!
//! ## Crate modules
//!
//! - [`camera`] — camera input parameters
//! - [`viewport`] — projection collaborator and GPU uniform bundle
//! - [`context`] — per-frame viewport context and its change tracker
//! - [`layer`] — the layer capability trait and its parameter types
//! - [`state`] — exclusively-owned, GPU-resource-owning layer state
//! - [`change`] — prop-diff result flags
//! - [`error`] — the error type lifecycle callbacks return
//! - [`diag`] — log-once diagnostics sink

pub mod camera;
pub mod change;
pub mod context;
pub mod diag;
pub mod error;
pub mod layer;
pub mod state;
pub mod viewport;

// Re-exports for convenience
pub use camera::CameraParams;
pub use change::ChangeFlags;
pub use context::{ContextTracker, ViewportContext};
pub use diag::Diagnostics;
pub use error::LayerError;
pub use layer::{Layer, LayerProps, LifecycleParams, RenderedLayers};
pub use state::LayerState;
pub use viewport::{Uniforms, Viewport};
