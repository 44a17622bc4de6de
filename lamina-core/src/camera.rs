//! Camera input parameters.
//!
//! `CameraParams` is the caller-supplied description of the view for one
//! frame. The context tracker compares it field by field against the
//! previous frame to decide whether the viewport must be rebuilt.

use serde::{Deserialize, Serialize};

/// Camera parameters for one frame.
///
/// Plain data: comparing two values field by field is exact, so an
/// unchanged camera is detected without recomputing any projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Latitude of the view center, in degrees.
    pub latitude: f64,
    /// Longitude of the view center, in degrees.
    pub longitude: f64,
    /// Zoom level; the projection scale is `2^zoom`.
    pub zoom: f64,
    /// Pitch (tilt) in degrees.
    pub pitch: f64,
    /// Bearing (rotation around the view center) in degrees.
    pub bearing: f64,
    /// Camera altitude in screen heights.
    pub altitude: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            latitude: 0.0,
            longitude: 0.0,
            zoom: 0.0,
            pitch: 0.0,
            bearing: 0.0,
            altitude: 1.5,
        }
    }
}

impl CameraParams {
    /// Construct with a viewport size and default view settings.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, longitude: f64, latitude: f64, zoom: f64) -> Self {
        self.longitude = longitude;
        self.latitude = latitude;
        self.zoom = zoom;
        self
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch;
        self
    }
}

// ===================================================================
// Tests
// ===================================================================
