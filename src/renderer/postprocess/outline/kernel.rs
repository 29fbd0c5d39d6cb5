//! CPU evaluation of the outline composite.
//!
//! Mirrors `outline.wgsl` step for step (clamp-to-edge neighbors, 4-way
//! depth ring, 8-way normal ring, multiply/saturate/bias shaping, debug
//! views) so parameters can be tuned and checked without a GPU.

use glam::{Vec3, Vec4};

use super::params::{DebugView, OutlineSettings};
use crate::camera::core::validate_clip_planes;
use crate::error::ConfigError;
use crate::gpu::texture::validate_size;

/// Axis-aligned neighbor directions used for depth.
const DEPTH_RING: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Axis-aligned and diagonal neighbor directions used for normals.
const NORMAL_RING: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Depth-buffer value in `[0, 1]` to depth linear in view distance, with
/// `0` at the near plane and `1` at the far plane.
pub fn linear_depth(depth: f32, near: f32, far: f32) -> f32 {
    let distance = near * far / (far - depth * (far - near));
    (distance - near) / (far - near)
}

/// Multiply, saturate, raise to `bias`. Zero stays zero.
pub fn shape_response(raw: f32, multiplier: f32, bias: f32) -> f32 {
    let saturated = (raw * multiplier).clamp(0.0, 1.0);
    if saturated <= 0.0 {
        return 0.0;
    }
    saturated.powf(bias)
}

/// Row-major, top-left origin view of the three composite inputs.
#[derive(Debug, Clone, Copy)]
pub struct GBufferImage<'a> {
    width: u32,
    height: u32,
    color: &'a [Vec4],
    depth: &'a [f32],
    normal: &'a [Vec3],
}

impl<'a> GBufferImage<'a> {
    /// Wrap the scene color, raw depth, and encoded normal planes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the size is zero or a plane does not hold
    /// `width * height` entries.
    pub fn new(
        width: u32,
        height: u32,
        color: &'a [Vec4],
        depth: &'a [f32],
        normal: &'a [Vec3],
    ) -> Result<Self, ConfigError> {
        validate_size(width, height)?;
        let expected = width as usize * height as usize;
        for (name, actual) in [
            ("color", color.len()),
            ("depth", depth.len()),
            ("normal", normal.len()),
        ] {
            if actual != expected {
                return Err(ConfigError::BufferLength {
                    name,
                    expected,
                    actual,
                });
            }
        }
        Ok(Self {
            width,
            height,
            color,
            depth,
            normal,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> usize {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        y * self.width as usize + x
    }
}

/// Per-pixel intermediate values of the composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSample {
    /// Linear depth of the center pixel.
    pub depth: f32,
    /// Encoded normal of the center pixel.
    pub normal: Vec3,
    /// Raw depth accumulator (nearer neighbors only).
    pub depth_diff: f32,
    /// Raw normal accumulator.
    pub normal_diff: f32,
    /// Shaped depth response.
    pub depth_edge: f32,
    /// Shaped normal response.
    pub normal_edge: f32,
    /// `depth_edge + normal_edge`, unclamped.
    pub strength: f32,
}

/// Validated settings plus clip planes, ready to evaluate pixels.
#[derive(Debug, Clone, Copy)]
pub struct OutlineKernel {
    settings: OutlineSettings,
    near: f32,
    far: f32,
}

impl OutlineKernel {
    /// Validate and capture the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid settings or clip planes.
    pub fn new(
        settings: OutlineSettings,
        near: f32,
        far: f32,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        validate_clip_planes(near, far)?;
        Ok(Self {
            settings,
            near,
            far,
        })
    }

    /// Settings in use.
    pub fn settings(&self) -> &OutlineSettings {
        &self.settings
    }

    fn depth_at(&self, image: &GBufferImage<'_>, x: i64, y: i64) -> f32 {
        linear_depth(image.depth[image.index(x, y)], self.near, self.far)
    }

    /// Discontinuity signals at pixel `(x, y)`.
    pub fn sample(&self, image: &GBufferImage<'_>, x: u32, y: u32) -> EdgeSample {
        let (x, y) = (i64::from(x), i64::from(y));
        let w = i64::from(self.settings.width);

        let depth = self.depth_at(image, x, y);
        let normal = image.normal[image.index(x, y)];

        let depth_diff: f32 = DEPTH_RING
            .iter()
            .map(|&(dx, dy)| {
                (depth - self.depth_at(image, x + dx * w, y + dy * w)).max(0.0)
            })
            .sum();
        let normal_diff: f32 = NORMAL_RING
            .iter()
            .map(|&(dx, dy)| {
                normal.distance(image.normal[image.index(x + dx * w, y + dy * w)])
            })
            .sum();

        let s = &self.settings;
        let depth_edge =
            shape_response(depth_diff, s.depth_multiplier, s.depth_bias);
        let normal_edge =
            shape_response(normal_diff, s.normal_multiplier, s.normal_bias);

        EdgeSample {
            depth,
            normal,
            depth_diff,
            normal_diff,
            depth_edge,
            normal_edge,
            strength: depth_edge + normal_edge,
        }
    }

    /// Final color at pixel `(x, y)`.
    pub fn shade(&self, image: &GBufferImage<'_>, x: u32, y: u32) -> Vec4 {
        let scene = image.color[image.index(i64::from(x), i64::from(y))];
        let edge = self.sample(image, x, y);
        match self.settings.debug_view {
            DebugView::Off => {
                let outline = Vec3::from_array(self.settings.outline_color).extend(1.0);
                scene.lerp(outline, edge.strength.clamp(0.0, 1.0))
            }
            DebugView::Color => scene,
            DebugView::Depth => Vec3::splat(edge.depth).extend(1.0),
            DebugView::Normal => edge.normal.extend(1.0),
            DebugView::OutlineMask => Vec3::splat(edge.strength).extend(1.0),
        }
    }

    /// Shade every pixel, row-major.
    pub fn render(&self, image: &GBufferImage<'_>) -> Vec<Vec4> {
        (0..image.height)
            .flat_map(|y| (0..image.width).map(move |x| (x, y)))
            .map(|(x, y)| self.shade(image, x, y))
            .collect()
    }
}
