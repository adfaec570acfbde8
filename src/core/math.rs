//! Scalar and vector math helpers shared across the engine.
//!
//! World frame is Y-up with -Z forward at zero yaw (counter-clockwise
//! positive rotation about +Y). Distances and speeds are in world units.

use nalgebra::Vector3;

/// Hermite smoothstep between two edges.
///
/// Returns 0 for `x <= edge0`, 1 for `x >= edge1`, and the cubic
/// `3t² − 2t³` in between. Degenerate edges (`edge0 >= edge1`) fall back
/// to a hard step at `edge0`.
///
/// # Example
/// ```
/// use raksha_nav::core::math::smoothstep;
///
/// assert_eq!(smoothstep(0.0, 8.0, -1.0), 0.0);
/// assert_eq!(smoothstep(0.0, 8.0, 4.0), 0.5);
/// assert_eq!(smoothstep(0.0, 8.0, 9.0), 1.0);
/// ```
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 >= edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp a vector's length to `max`, preserving direction.
///
/// Vectors at or below `max` (and the zero vector) pass through
/// unchanged.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use raksha_nav::core::math::clamp_length;
///
/// let v = clamp_length(Vector3::new(3.0, 0.0, 4.0), 1.0);
/// assert!((v.norm() - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn clamp_length(v: Vector3<f32>, max: f32) -> Vector3<f32> {
    let len = v.norm();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}

/// Convert a yaw angle in radians to a compass-style heading in degrees,
/// normalized to `[0, 360)`.
#[inline]
pub fn heading_degrees(yaw: f32) -> f32 {
    yaw.to_degrees().rem_euclid(360.0)
}
