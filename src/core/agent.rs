//! Agent kinematic state, control intent, and derived telemetry.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::math::heading_degrees;

/// Kinematic state of the flying agent, updated once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// World position.
    pub position: Point3<f32>,
    /// World velocity in units per tick.
    pub velocity: Vector3<f32>,
    /// Heading about +Y in radians; -Z is forward at zero yaw.
    pub yaw: f32,
}

impl AgentState {
    /// Create an agent at rest at the given position.
    #[inline]
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            yaw: 0.0,
        }
    }

    /// Current speed (velocity magnitude).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }
}

/// Normalized control intent for one tick.
///
/// `forward`, `right`, and `up` are in `[-1, 1]`; `yaw_rate` is in
/// `[-1, 1]` and scales the configured per-tick yaw step. Forward and
/// right are in the agent's body frame and are rotated by yaw before
/// integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    pub yaw_rate: f32,
}

impl ControlInput {
    /// No input: the agent coasts under drag.
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-tick telemetry snapshot for HUD-style consumers.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FlightTelemetry {
    /// Display speed, scaled the way the HUD expects (speed × 100).
    pub speed_kmh: f32,
    /// Height above ground level.
    pub altitude: f32,
    /// Compass heading in degrees, [0, 360).
    pub heading_deg: f32,
    /// World position.
    pub position: Point3<f32>,
}

impl FlightTelemetry {
    pub fn from_state(state: &AgentState) -> Self {
        Self {
            speed_kmh: state.speed() * 100.0,
            altitude: state.position.y,
            heading_deg: heading_degrees(state.yaw),
            position: state.position,
        }
    }
}
