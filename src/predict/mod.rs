//! Forward trajectory rollout and early warning.
//!
//! Integrates the agent forward with explicit Euler under the clamped
//! repulsive field: accelerate, damp, advance. The rollout is a lazy
//! finite iterator rebuilt from scratch each tick; nothing accumulates
//! across ticks. The same one-step integration drives the early
//! warning, which fires only when the next position is well inside the
//! influence region, meaningfully repelled, and not on a legitimate
//! landing approach.

use nalgebra::{Point3, Vector3};

use crate::avoidance::ForceField;
use crate::config::PredictConfig;
use crate::core::math::clamp_length;
use crate::core::AgentState;

/// One explicit-Euler step under the (optional) repulsive field.
fn euler_step(
    position: &Point3<f32>,
    velocity: &Vector3<f32>,
    force: Option<&ForceField<'_>>,
    cfg: &PredictConfig,
) -> (Point3<f32>, Vector3<f32>) {
    let accel = match force {
        Some(field) => clamp_length(field.force_at(position), cfg.max_accel),
        None => Vector3::zeros(),
    };
    let velocity = (*velocity + accel * cfg.dt) * cfg.damping;
    let position = *position + velocity * cfg.dt;
    (position, velocity)
}

/// Lazy rollout of predicted positions, starting one step after the
/// agent's current state. A missing force field (not built yet, or
/// build failed) integrates ballistically.
pub struct TrajectoryRollout<'a> {
    position: Point3<f32>,
    velocity: Vector3<f32>,
    remaining: usize,
    force: Option<&'a ForceField<'a>>,
    cfg: &'a PredictConfig,
}

impl<'a> TrajectoryRollout<'a> {
    pub fn new(
        state: &AgentState,
        force: Option<&'a ForceField<'a>>,
        cfg: &'a PredictConfig,
    ) -> Self {
        Self {
            position: state.position,
            velocity: state.velocity,
            remaining: cfg.steps,
            force,
            cfg,
        }
    }
}

impl Iterator for TrajectoryRollout<'_> {
    type Item = Point3<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let (position, velocity) =
            euler_step(&self.position, &self.velocity, self.force, self.cfg);
        self.position = position;
        self.velocity = velocity;
        Some(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TrajectoryRollout<'_> {}

/// Predicted look-ahead polyline: the current position followed by
/// `steps` integrated positions.
pub fn predict_path(
    state: &AgentState,
    force: Option<&ForceField<'_>>,
    cfg: &PredictConfig,
) -> Vec<Point3<f32>> {
    let mut path = Vec::with_capacity(cfg.steps + 1);
    path.push(state.position);
    path.extend(TrajectoryRollout::new(state, force, cfg));
    path
}

/// Whether the agent's next position is entering the repulsive field.
///
/// Requires all three of: sampled distance under the warning fraction
/// of the influence radius, force magnitude over the warning floor, and
/// no active landing funnel at the probe. The conjunction keeps the
/// flag quiet over weak far-field repulsion and legitimate landing
/// approaches.
pub fn early_warning(
    state: &AgentState,
    force: Option<&ForceField<'_>>,
    cfg: &PredictConfig,
) -> bool {
    let field = match force {
        Some(field) => field,
        None => return false,
    };
    let (probe, _) = euler_step(&state.position, &state.velocity, force, cfg);
    field.distance_at(&probe) < cfg.warn_distance_frac * field.influence_radius()
        && field.force_at(&probe).norm() > cfg.warn_force_min
        && !field.in_landing_funnel(&probe)
}
