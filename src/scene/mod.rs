//! Obstacle registry: the immutable set of forbidden volumes.
//!
//! Obstacles are axis-aligned boxes with a landing-eligibility flag and a
//! roof height for the landing funnel. Geometry is validated once at
//! construction; after that the registry is immutable for the session and
//! every other layer reads it through shared references.

pub mod city;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::Aabb;
use crate::error::{RakshaError, Result};

pub use city::generate_city;

/// Unvalidated mirror of [`Obstacle`]; serde input converts through
/// [`Obstacle::new`].
#[derive(Deserialize)]
struct RawObstacle {
    center: Point3<f32>,
    half_extents: Vector3<f32>,
    landable: bool,
    roof_height: f32,
}

/// One forbidden volume in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObstacle")]
pub struct Obstacle {
    center: Point3<f32>,
    half_extents: Vector3<f32>,
    landable: bool,
    roof_height: f32,
}

impl Obstacle {
    /// Create an obstacle, rejecting degenerate geometry.
    ///
    /// Half-extents must be strictly positive on every axis; a flat or
    /// inverted box would silently corrupt the distance field.
    pub fn new(
        center: Point3<f32>,
        half_extents: Vector3<f32>,
        landable: bool,
        roof_height: f32,
    ) -> Result<Self> {
        if !(half_extents.x > 0.0 && half_extents.y > 0.0 && half_extents.z > 0.0) {
            return Err(RakshaError::InvalidObstacle(format!(
                "half-extents must be strictly positive, got ({}, {}, {})",
                half_extents.x, half_extents.y, half_extents.z
            )));
        }
        if !(center.coords.iter().all(|c| c.is_finite()) && roof_height.is_finite()) {
            return Err(RakshaError::InvalidObstacle(
                "center and roof height must be finite".into(),
            ));
        }
        Ok(Self {
            center,
            half_extents,
            landable,
            roof_height,
        })
    }

    #[inline]
    pub fn center(&self) -> Point3<f32> {
        self.center
    }

    #[inline]
    pub fn half_extents(&self) -> Vector3<f32> {
        self.half_extents
    }

    /// Whether an agent may descend onto this obstacle's roof.
    #[inline]
    pub fn landable(&self) -> bool {
        self.landable
    }

    /// Roof height used by the landing funnel (world Y of the pad).
    #[inline]
    pub fn roof_height(&self) -> f32 {
        self.roof_height
    }

    /// The obstacle's bounding box.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents)
    }

    /// Whether a horizontal position falls within the obstacle footprint.
    #[inline]
    pub fn footprint_contains(&self, x: f32, z: f32) -> bool {
        self.aabb().contains_xz(x, z)
    }

    /// Horizontal distance from a point to the obstacle center.
    #[inline]
    pub fn horizontal_distance(&self, x: f32, z: f32) -> f32 {
        let dx = x - self.center.x;
        let dz = z - self.center.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl TryFrom<RawObstacle> for Obstacle {
    type Error = RakshaError;

    fn try_from(raw: RawObstacle) -> Result<Self> {
        Self::new(raw.center, raw.half_extents, raw.landable, raw.roof_height)
    }
}

/// Immutable obstacle set supplied once at startup.
#[derive(Clone, Debug, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    #[inline]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Number of landable obstacles in the set.
    pub fn landable_count(&self) -> usize {
        self.obstacles.iter().filter(|o| o.landable).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(x: f32, z: f32, height: f32) -> Obstacle {
        Obstacle::new(
            Point3::new(x, height / 2.0, z),
            Vector3::new(5.0, height / 2.0, 5.0),
            false,
            height,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_non_positive_half_extents() {
        let bad = Obstacle::new(
            Point3::origin(),
            Vector3::new(5.0, 0.0, 5.0),
            false,
            10.0,
        );
        assert!(matches!(bad, Err(RakshaError::InvalidObstacle(_))));

        let negative = Obstacle::new(
            Point3::origin(),
            Vector3::new(-1.0, 5.0, 5.0),
            false,
            10.0,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn test_rejects_non_finite_geometry() {
        let bad = Obstacle::new(
            Point3::new(f32::NAN, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            false,
            10.0,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_deserialized_obstacles_are_validated() {
        // Flat boxes must be rejected on the serde path, same as in
        // Obstacle::new.
        let degenerate = r#"
            center = [0.0, 0.0, 0.0]
            half_extents = [5.0, 0.0, 5.0]
            landable = false
            roof_height = 10.0
        "#;
        assert!(toml::from_str::<Obstacle>(degenerate).is_err());

        let valid = r#"
            center = [0.0, 10.0, 0.0]
            half_extents = [5.0, 10.0, 5.0]
            landable = true
            roof_height = 20.0
        "#;
        let o: Obstacle = toml::from_str(valid).unwrap();
        assert!(o.landable());
        assert_eq!(o.roof_height(), 20.0);
    }

    #[test]
    fn test_footprint_contains() {
        let o = tower(10.0, -10.0, 30.0);
        assert!(o.footprint_contains(10.0, -10.0));
        assert!(o.footprint_contains(15.0, -5.0));
        assert!(!o.footprint_contains(15.1, -10.0));
        assert!(!o.footprint_contains(10.0, -15.1));
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let o = tower(0.0, 0.0, 40.0);
        assert_eq!(o.horizontal_distance(3.0, 4.0), 5.0);
    }

    #[test]
    fn test_registry_counts() {
        let mut obstacles = vec![tower(0.0, 0.0, 20.0), tower(50.0, 0.0, 35.0)];
        obstacles.push(
            Obstacle::new(
                Point3::new(-50.0, 15.0, 0.0),
                Vector3::new(10.0, 15.0, 10.0),
                true,
                30.0,
            )
            .unwrap(),
        );

        let registry = ObstacleRegistry::new(obstacles);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.landable_count(), 1);
        assert!(!registry.is_empty());
    }
}
