//! Repulsive potential-force model over the distance field.
//!
//! Converts a sampled distance/gradient pair into a bounded repulsive
//! acceleration: strong near obstacle surfaces, fading to exactly zero
//! at the influence radius. Landable roofs carve an exception into the
//! field in two layers: a hard funnel window directly over the pad in
//! which the force is identically zero, and a smooth gate above it that
//! suppresses repulsion over the pad center while leaving the rim fully
//! repulsive, so an approach from altitude is funneled in rather than
//! pushed away.

use nalgebra::{Point3, Vector3};

use crate::config::ForceConfig;
use crate::core::math::smoothstep;
use crate::field::VoxelGrid;
use crate::scene::{Obstacle, ObstacleRegistry};

/// Vertical tolerance below a roof within which the hard funnel window
/// still applies, covering an agent settling onto the pad surface.
const FUNNEL_FLOOR: f32 = -0.5;

/// Borrowing view that evaluates the repulsive field. Cheap to
/// construct every tick; holds no state of its own.
pub struct ForceField<'a> {
    grid: &'a VoxelGrid,
    registry: &'a ObstacleRegistry,
    cfg: &'a ForceConfig,
}

impl<'a> ForceField<'a> {
    pub fn new(grid: &'a VoxelGrid, registry: &'a ObstacleRegistry, cfg: &'a ForceConfig) -> Self {
        Self {
            grid,
            registry,
            cfg,
        }
    }

    /// Repulsive acceleration at a world position.
    ///
    /// Zero inside a landing funnel, at or beyond the influence radius,
    /// and wherever the gradient direction is ambiguous.
    pub fn force_at(&self, p: &Point3<f32>) -> Vector3<f32> {
        if self.in_landing_funnel(p) {
            return Vector3::zeros();
        }
        let distance = self.grid.sample_distance(p);
        if distance >= self.grid.influence_radius() {
            return Vector3::zeros();
        }
        let mag = self.magnitude(distance);
        if mag <= 0.0 {
            return Vector3::zeros();
        }
        let grad = self.grid.sample_gradient(p);
        let norm = grad.norm();
        if norm < self.cfg.gradient_epsilon {
            // Ambiguous direction, e.g. the exact center of a box.
            return Vector3::zeros();
        }
        grad * (mag * self.landing_gate(p) / norm)
    }

    /// Scalar repulsion magnitude for a sampled distance, saturating at
    /// the configured maximum.
    pub fn magnitude(&self, distance: f32) -> f32 {
        let inv = 1.0 / (distance + self.cfg.epsilon);
        let shaping = inv - 1.0 / self.grid.influence_radius();
        if shaping <= 0.0 {
            return 0.0;
        }
        (self.cfg.gain * shaping * inv * inv).min(self.cfg.max_force)
    }

    /// Hard funnel window: directly over a landable roof, from slightly
    /// below pad level up to the funnel height.
    pub fn in_landing_funnel(&self, p: &Point3<f32>) -> bool {
        self.registry.iter().any(|o| {
            o.landable() && o.footprint_contains(p.x, p.z) && {
                let dy = p.y - o.roof_height();
                (FUNNEL_FLOOR..=self.cfg.funnel_height).contains(&dy)
            }
        })
    }

    /// Smooth suppression factor in [0, 1] above landing pads, taken as
    /// the minimum across every pad under the position. 1 when no pad
    /// applies.
    fn landing_gate(&self, p: &Point3<f32>) -> f32 {
        let mut gate = 1.0_f32;
        for o in self.registry.iter() {
            if !o.landable() || !o.footprint_contains(p.x, p.z) {
                continue;
            }
            let dy = p.y - o.roof_height();
            let r = o.horizontal_distance(p.x, p.z);
            let rp = self.pad_radius(o);
            let g = 1.0
                - smoothstep(0.0, self.cfg.funnel_height, dy) * smoothstep(0.0, rp, rp - r);
            gate = gate.min(g);
        }
        gate
    }

    /// Effective pad radius: a configured fraction of the footprint's
    /// smaller half-extent.
    fn pad_radius(&self, o: &Obstacle) -> f32 {
        let he = o.half_extents();
        self.cfg.pad_radius_frac * he.x.min(he.z)
    }

    #[inline]
    pub fn distance_at(&self, p: &Point3<f32>) -> f32 {
        self.grid.sample_distance(p)
    }

    #[inline]
    pub fn influence_radius(&self) -> f32 {
        self.grid.influence_radius()
    }
}
