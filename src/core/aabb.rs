//! Axis-aligned bounding box for spatial operations.
//!
//! [`Aabb`] represents a rectangular volume in 3D space, used for:
//! - Obstacle extents and footprint queries
//! - Distance-to-surface queries feeding the distance field
//! - Penetration tests in the collision resolver
//! - Bounding the voxel sub-range an obstacle can influence

use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner (smallest coordinate on every axis).
    pub min: Point3<f32>,
    /// Maximum corner (largest coordinate on every axis).
    pub max: Point3<f32>,
}

impl Aabb {
    /// Create a new bounding box from min and max corners.
    #[inline]
    pub const fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Create a box from its center and half-extents.
    #[inline]
    pub fn from_center_half_extents(center: Point3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Half-extents of the box.
    #[inline]
    pub fn half_extents(&self) -> Vector3<f32> {
        (self.max - self.min) * 0.5
    }

    /// Check if a point is inside the box (faces inclusive).
    #[inline]
    pub fn contains(&self, p: Point3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Check if a point is strictly inside the box (faces exclusive).
    ///
    /// A point resting exactly on a face counts as outside, so a resolved
    /// position on a roof or wall does not re-trigger penetration.
    #[inline]
    pub fn contains_strict(&self, p: Point3<f32>) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }

    /// Check if a horizontal coordinate falls within the box footprint
    /// (the X/Z extent, faces inclusive).
    #[inline]
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    /// Expand the box by a margin on all sides.
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Euclidean distance from a point to the box surface.
    ///
    /// Zero for points inside or on the surface.
    #[inline]
    pub fn surface_distance(&self, p: Point3<f32>) -> f32 {
        let dx = (self.min.x - p.x).max(p.x - self.max.x).max(0.0);
        let dy = (self.min.y - p.y).max(p.y - self.max.y).max(0.0);
        let dz = (self.min.z - p.z).max(p.z - self.max.z).max(0.0);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::from_center_half_extents(Point3::origin(), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_from_center_half_extents() {
        let b = Aabb::from_center_half_extents(Point3::new(10.0, 5.0, -2.0), Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(b.min, Point3::new(8.0, 2.0, -6.0));
        assert_eq!(b.max, Point3::new(12.0, 8.0, 2.0));
        assert_eq!(b.center(), Point3::new(10.0, 5.0, -2.0));
        assert_eq!(b.half_extents(), Vector3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_contains_inclusive_vs_strict() {
        let b = unit_box();
        let on_face = Point3::new(1.0, 0.0, 0.0);
        assert!(b.contains(on_face));
        assert!(!b.contains_strict(on_face));
        assert!(b.contains_strict(Point3::new(0.5, -0.5, 0.9)));
        assert!(!b.contains(Point3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_contains_xz() {
        let b = Aabb::from_center_half_extents(Point3::new(4.0, 50.0, -4.0), Vector3::new(2.0, 10.0, 2.0));
        assert!(b.contains_xz(4.0, -4.0));
        assert!(b.contains_xz(6.0, -2.0));
        assert!(!b.contains_xz(6.1, -4.0));
        assert!(!b.contains_xz(4.0, -6.1));
    }

    #[test]
    fn test_expand() {
        let b = unit_box().expand(0.5);
        assert_eq!(b.min, Point3::new(-1.5, -1.5, -1.5));
        assert_eq!(b.max, Point3::new(1.5, 1.5, 1.5));
    }

    #[test]
    fn test_surface_distance_inside_is_zero() {
        let b = unit_box();
        assert_eq!(b.surface_distance(Point3::origin()), 0.0);
        assert_eq!(b.surface_distance(Point3::new(1.0, 1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_surface_distance_face_edge_corner() {
        let b = unit_box();
        // Face: straight out along +X.
        assert_relative_eq!(b.surface_distance(Point3::new(3.0, 0.0, 0.0)), 2.0, epsilon = 1e-6);
        // Edge: out along +X and +Y.
        assert_relative_eq!(
            b.surface_distance(Point3::new(2.0, 2.0, 0.0)),
            std::f32::consts::SQRT_2,
            epsilon = 1e-6
        );
        // Corner: out along all three axes.
        assert_relative_eq!(
            b.surface_distance(Point3::new(2.0, 2.0, 2.0)),
            3.0f32.sqrt(),
            epsilon = 1e-6
        );
    }
}
