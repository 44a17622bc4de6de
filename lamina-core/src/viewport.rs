//! Projection collaborator and GPU uniform bundle.
//!
//! `Viewport` turns `CameraParams` into a Web-Mercator-style common space:
//! the world is a square of `512 * 2^zoom` units, and the camera looks at a
//! projected center point with an optional bearing rotation. `Uniforms` is
//! the per-frame bundle handed to every layer's draw call; it derives
//! `bytemuck::Pod` + `Zeroable` for zero-copy upload to GPU buffers.

use bytemuck::{Pod, Zeroable};

use crate::camera::CameraParams;

/// Size of the world square at zoom 0, in common-space units.
const TILE_SIZE: f64 = 512.0;

/// Mercator breaks down at the poles; clamp like every slippy-map does.
const MAX_LATITUDE: f64 = 85.05113;

/// Per-frame view state derived from `CameraParams`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    scale: f64,
    center: [f64; 2],
    bearing: f64,
    pitch: f64,
    altitude: f64,
}

impl Viewport {
    pub fn new(camera: &CameraParams) -> Self {
        let scale = camera.zoom.exp2();
        Self {
            width: f64::from(camera.width),
            height: f64::from(camera.height),
            scale,
            center: project(camera.longitude, camera.latitude, scale),
            bearing: camera.bearing,
            pitch: camera.pitch,
            altitude: camera.altitude,
        }
    }

    /// Projection scale: `2^zoom`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Projected view center in common-space units.
    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    /// Project a lng/lat pair into common space at this viewport's scale.
    pub fn project_lng_lat(&self, longitude: f64, latitude: f64) -> [f64; 2] {
        project(longitude, latitude, self.scale)
    }

    /// Build the uniform bundle for this viewport.
    ///
    /// The matrix maps common-space positions to NDC with the view center
    /// at the origin, Y growing downward on screen, rotated by `bearing`.
    /// Row-vector convention: `ndc = pos * view_proj` (column-major
    /// storage, same as the rest of the pipeline expects).
    pub fn uniforms(&self) -> Uniforms {
        let sx = 2.0 / self.width;
        let sy = -2.0 / self.height;
        let (sin_b, cos_b) = self.bearing.to_radians().sin_cos();
        let [cx, cy] = self.center;

        // view = R(bearing) * (pos - center); ndc = (view.x * sx, view.y * sy)
        let tx = sx * (-cos_b * cx - sin_b * cy);
        let ty = sy * (sin_b * cx - cos_b * cy);

        Uniforms {
            view_proj: [
                [(sx * cos_b) as f32, (-sy * sin_b) as f32, 0.0, 0.0],
                [(sx * sin_b) as f32, (sy * cos_b) as f32, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [tx as f32, ty as f32, 0.0, 1.0],
            ],
            center: [cx as f32, cy as f32],
            scale: self.scale as f32,
            pitch: self.pitch as f32,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&CameraParams::default())
    }
}

fn project(longitude: f64, latitude: f64, scale: f64) -> [f64; 2] {
    let world = TILE_SIZE * scale;
    let lat = latitude
        .clamp(-MAX_LATITUDE, MAX_LATITUDE)
        .to_radians();
    let x = world * (longitude / 360.0 + 0.5);
    let y = world * (0.5 - (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln() / std::f64::consts::TAU);
    [x, y]
}

// ───────────────────────────────────────────────────────────────────
// Uniform bundle
// ───────────────────────────────────────────────────────────────────

/// Viewport uniforms sent to the GPU once per frame.
///
/// 80 bytes — fits in a single uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Uniforms {
    /// 4×4 view-projection matrix (column-major).
    pub view_proj: [[f32; 4]; 4],
    /// Projected view center in common-space units.
    pub center: [f32; 2],
    /// Projection scale: `2^zoom`.
    pub scale: f32,
    /// Pitch in degrees, for shader-side foreshortening.
    pub pitch: f32,
}

impl Uniforms {
    /// Apply the view-projection matrix to a common-space position.
    pub fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        let m = &self.view_proj;
        [
            x * m[0][0] + y * m[1][0] + m[3][0],
            x * m[0][1] + y * m[1][1] + m[3][1],
        ]
    }
}

// ===================================================================
// Tests
// ===================================================================
