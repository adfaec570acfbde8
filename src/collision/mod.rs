//! Hard AABB penetration resolution.
//!
//! The safety backstop behind the soft force field: if a proposed
//! position ends up strictly inside an obstacle box, it is pushed out
//! along the axis of least penetration to just past the nearer face,
//! and the velocity component along that axis is dropped. Runs fresh
//! every tick against the full obstacle set and keeps no state.

use nalgebra::{Point3, Vector3};

use crate::scene::ObstacleRegistry;

/// Resolve penetrations of `position` against every obstacle, mutating
/// position and velocity in place. Returns whether any contact was
/// resolved.
///
/// Positions exactly on a face count as outside, so a resolved contact
/// (or an agent resting on a roof) does not re-trigger next tick.
pub fn resolve_collisions(
    position: &mut Point3<f32>,
    velocity: &mut Vector3<f32>,
    registry: &ObstacleRegistry,
    epsilon: f32,
) -> bool {
    let mut collided = false;

    for obstacle in registry.iter() {
        let aabb = obstacle.aabb();
        if !aabb.contains_strict(*position) {
            continue;
        }
        collided = true;

        let center = obstacle.center();
        let half = obstacle.half_extents();
        let dx = position.x - center.x;
        let dy = position.y - center.y;
        let dz = position.z - center.z;
        let pen_x = half.x - dx.abs();
        let pen_y = half.y - dy.abs();
        let pen_z = half.z - dz.abs();

        // Least penetration wins; later axes win exact ties.
        let mut axis = 0;
        let mut pen = pen_x;
        if pen_y <= pen {
            axis = 1;
            pen = pen_y;
        }
        if pen_z <= pen {
            axis = 2;
        }

        match axis {
            0 => {
                position.x = center.x + (half.x + epsilon).copysign(dx);
                velocity.x = 0.0;
            }
            1 => {
                position.y = center.y + (half.y + epsilon).copysign(dy);
                velocity.y = 0.0;
            }
            _ => {
                position.z = center.z + (half.z + epsilon).copysign(dz);
                velocity.z = 0.0;
            }
        }
    }

    collided
}
