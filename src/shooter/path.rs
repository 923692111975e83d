//! Spiral track the ball chain rolls along
//!
//! Positions are normalized: 0 is the entry on the outer ring, 1 is the sink
//! at the center. The track is a precomputed point table; lookups interpolate
//! between neighbouring samples.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::LazyLock;

use crate::{heading, polar_to_cartesian};

/// Spiral center, also where the shooter sits
pub const PATH_CENTER: Vec2 = Vec2::new(150.0, 150.0);
pub const PATH_START_RADIUS: f32 = 130.0;
pub const PATH_END_RADIUS: f32 = 40.0;
pub const PATH_TURNS: f32 = 2.5;
/// Number of segments; the table holds one more point than this
pub const PATH_SEGMENTS: usize = 200;

static SPIRAL: LazyLock<SpiralPath> = LazyLock::new(SpiralPath::new);

/// The shared spiral table
pub fn spiral() -> &'static SpiralPath {
    &SPIRAL
}

#[derive(Debug, Clone)]
pub struct SpiralPath {
    points: Vec<Vec2>,
}

impl Default for SpiralPath {
    fn default() -> Self {
        Self::new()
    }
}

impl SpiralPath {
    pub fn new() -> Self {
        let points = (0..=PATH_SEGMENTS)
            .map(|i| {
                let t = i as f32 / PATH_SEGMENTS as f32;
                let angle = t * PATH_TURNS * TAU - FRAC_PI_2;
                let radius = PATH_START_RADIUS - (PATH_START_RADIUS - PATH_END_RADIUS) * t;
                polar_to_cartesian(PATH_CENTER, radius, angle)
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Segment index and fraction for a position, clamped to the track
    fn locate(&self, position: f32) -> (usize, f32) {
        let last_segment = self.points.len() - 2;
        let scaled = position.clamp(0.0, 1.0) * (self.points.len() - 1) as f32;
        let index = (scaled.floor() as usize).min(last_segment);
        (index, scaled - index as f32)
    }

    /// Coordinates of a normalized position
    pub fn point_at(&self, position: f32) -> Vec2 {
        let (i, frac) = self.locate(position);
        self.points[i].lerp(self.points[i + 1], frac)
    }

    /// Heading of the track (direction of travel) at a position
    pub fn angle_at(&self, position: f32) -> f32 {
        let (i, _) = self.locate(position);
        heading(self.points[i], self.points[i + 1])
    }

    /// Unit tangent at a position
    pub fn tangent_at(&self, position: f32) -> Vec2 {
        Vec2::from_angle(self.angle_at(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spiral_endpoints() {
        let path = spiral();
        assert_eq!(path.points().len(), PATH_SEGMENTS + 1);
        // Entry straight above the center on the outer ring
        assert!(path.point_at(0.0).distance(Vec2::new(150.0, 20.0)) < 1e-3);
        // Sink on the inner ring
        assert!((path.point_at(1.0).distance(PATH_CENTER) - PATH_END_RADIUS).abs() < 1e-3);
    }

    #[test]
    fn test_point_at_interpolates() {
        let path = spiral();
        let step = 1.0 / PATH_SEGMENTS as f32;
        let a = path.point_at(10.0 * step);
        let b = path.point_at(11.0 * step);
        let mid = path.point_at(10.5 * step);
        assert!(mid.distance((a + b) / 2.0) < 1e-2);
    }

    #[test]
    fn test_positions_are_clamped() {
        let path = spiral();
        assert_eq!(path.point_at(-0.5), path.point_at(0.0));
        assert_eq!(path.point_at(2.0), path.point_at(1.0));
    }

    #[test]
    fn test_tangent_follows_travel() {
        let path = spiral();
        // Entry heads clockwise on screen (angle increasing): toward +x from the top
        let tangent = path.tangent_at(0.0);
        assert!(tangent.x > 0.9);
        assert!((tangent.length() - 1.0).abs() < 1e-5);
    }
}
