//! Owned navigation state and the per-tick update loop.
//!
//! `NavigationWorld` owns everything the engine needs: the obstacle
//! registry, the ground occupancy raster, the volumetric distance
//! field, and the agent state. `tick` advances the world by one step
//! in a fixed order: control integration, soft avoidance, drag and
//! speed cap, hard collision resolution, world clamps, then prediction
//! and warning. The heavy field build runs on a background thread and
//! is polled at the top of every tick; until it lands, the soft force
//! and early warning no-op and only the hard collision resolver
//! protects the agent.

pub mod build_task;

use std::sync::Arc;

use log::{debug, info, warn};
use nalgebra::{Point3, Rotation3, Vector3};

use crate::avoidance::ForceField;
use crate::collision::resolve_collisions;
use crate::config::RakshaConfig;
use crate::core::math::clamp_length;
use crate::core::{AgentState, ControlInput, FlightTelemetry};
use crate::error::Result;
use crate::field::{build_distance_field, VoxelGrid};
use crate::occupancy::OccupancyGrid;
use crate::predict::{early_warning, predict_path};
use crate::scene::ObstacleRegistry;

use build_task::FieldBuildTask;

/// Agent spawn point, above the central plaza.
const SPAWN: Point3<f32> = Point3::new(0.0, 10.0, 0.0);

/// Everything produced by one tick, for HUD and rendering consumers.
#[derive(Clone, Debug)]
pub struct TickReport {
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    pub yaw: f32,
    /// The hard resolver pushed the agent out of an obstacle this tick.
    pub collided: bool,
    /// The predicted next position is entering the repulsive field.
    pub early_warning: bool,
    pub telemetry: FlightTelemetry,
    /// Look-ahead polyline starting at the current position.
    pub path: Vec<Point3<f32>>,
}

/// Owned world state driven by a single tick loop.
pub struct NavigationWorld {
    config: RakshaConfig,
    registry: Arc<ObstacleRegistry>,
    occupancy: OccupancyGrid,
    field: Option<VoxelGrid>,
    field_ready: bool,
    agent: AgentState,
    build: Option<FieldBuildTask>,
    last_build_error: Option<String>,
    warning: bool,
    ticks: u64,
}

impl NavigationWorld {
    /// Create a world over an obstacle set. Rasterizes the ground
    /// occupancy immediately; the volumetric field is built separately
    /// via [`start_field_build`](Self::start_field_build) or
    /// [`build_field_blocking`](Self::build_field_blocking).
    pub fn new(config: RakshaConfig, registry: ObstacleRegistry) -> Result<Self> {
        config.validate()?;
        let occupancy = OccupancyGrid::rasterize(&registry, &config.occupancy);
        info!(
            "world created: {} obstacles ({} landable), occupancy {}x{}",
            registry.len(),
            registry.landable_count(),
            occupancy.dims().0,
            occupancy.dims().1
        );
        Ok(Self {
            config,
            registry: Arc::new(registry),
            occupancy,
            field: None,
            field_ready: false,
            agent: AgentState::new(SPAWN),
            build: None,
            last_build_error: None,
            warning: false,
            ticks: 0,
        })
    }

    /// Kick off the deferred field build on a background thread. A
    /// build already in flight is left alone.
    pub fn start_field_build(&mut self) -> Result<()> {
        if self.build.is_some() {
            return Ok(());
        }
        self.build = Some(FieldBuildTask::spawn(
            Arc::clone(&self.registry),
            self.config.grid.clone(),
        )?);
        Ok(())
    }

    /// Build the field synchronously on the calling thread.
    pub fn build_field_blocking(&mut self) -> Result<()> {
        match build_distance_field(&self.registry, &self.config.grid) {
            Ok(grid) => {
                self.field = Some(grid);
                self.field_ready = true;
                self.last_build_error = None;
                Ok(())
            }
            Err(e) => {
                self.field_ready = false;
                self.last_build_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Collect a finished background build, if any. A failed build
    /// leaves any previous grid untouched but inactive; the hard
    /// collision resolver stays as the only protection.
    fn poll_field_build(&mut self) {
        let Some(task) = self.build.as_mut() else {
            return;
        };
        let Some(result) = task.try_take() else {
            return;
        };
        self.build = None;
        match result {
            Ok(grid) => {
                self.field = Some(grid);
                self.field_ready = true;
                self.last_build_error = None;
            }
            Err(e) => {
                self.field_ready = false;
                self.last_build_error = Some(e.to_string());
                warn!("soft avoidance disabled: {}", e);
            }
        }
    }

    #[inline]
    fn active_field(&self) -> Option<&VoxelGrid> {
        if self.field_ready {
            self.field.as_ref()
        } else {
            None
        }
    }

    /// Advance the world by one tick. `dt` is in ticks; pass 1.0 for
    /// the nominal rate the defaults are tuned for.
    pub fn tick(&mut self, input: &ControlInput, dt: f32) -> TickReport {
        self.poll_field_build();
        let flight = &self.config.flight;

        // Heading and vertical position respond to input directly.
        self.agent.yaw += input.yaw_rate * flight.yaw_step * dt;
        self.agent.position.y += input.up * flight.vertical_step * dt;
        self.agent.position.y = self
            .agent
            .position
            .y
            .clamp(flight.min_altitude, flight.max_altitude);

        // Horizontal thrust: body-frame intent rotated by yaw.
        let intent = Vector3::new(input.right, 0.0, -input.forward);
        if let Some(dir) = intent.try_normalize(1e-6) {
            let world_dir = Rotation3::from_axis_angle(&Vector3::y_axis(), self.agent.yaw) * dir;
            self.agent.velocity += world_dir * flight.acceleration * dt;
        }

        // Soft avoidance, once the field is ready.
        let avoid = match self.active_field() {
            Some(grid) => {
                let field = ForceField::new(grid, &self.registry, &self.config.force);
                field.force_at(&self.agent.position)
            }
            None => Vector3::zeros(),
        };
        self.agent.velocity += avoid * dt;

        self.agent.velocity *= flight.drag;
        self.agent.velocity = clamp_length(self.agent.velocity, flight.max_speed);

        // Integrate, then let the hard resolver veto the new position.
        let mut proposed = self.agent.position + self.agent.velocity * dt;
        let collided = resolve_collisions(
            &mut proposed,
            &mut self.agent.velocity,
            &self.registry,
            self.config.collision.epsilon,
        );

        let half = self.config.grid.world_half_extent;
        proposed.x = proposed.x.clamp(-half, half);
        proposed.z = proposed.z.clamp(-half, half);
        proposed.y = proposed.y.clamp(flight.min_altitude, flight.max_altitude);
        self.agent.position = proposed;

        let (path, warned) = match self.active_field() {
            Some(grid) => {
                let field = ForceField::new(grid, &self.registry, &self.config.force);
                (
                    predict_path(&self.agent, Some(&field), &self.config.predict),
                    early_warning(&self.agent, Some(&field), &self.config.predict),
                )
            }
            None => (predict_path(&self.agent, None, &self.config.predict), false),
        };

        self.ticks += 1;
        let warning = collided || warned;
        if warning != self.warning {
            debug!(
                "warning {} at tick {} ({:.1}, {:.1}, {:.1})",
                if warning { "raised" } else { "cleared" },
                self.ticks,
                self.agent.position.x,
                self.agent.position.y,
                self.agent.position.z
            );
        }
        self.warning = warning;

        TickReport {
            position: self.agent.position,
            velocity: self.agent.velocity,
            yaw: self.agent.yaw,
            collided,
            early_warning: warned,
            telemetry: FlightTelemetry::from_state(&self.agent),
            path,
        }
    }

    /// Sampled distance at an arbitrary point, for overlays. Reads as
    /// the influence radius until the field is ready.
    pub fn sample_distance(&self, p: &Point3<f32>) -> f32 {
        match self.active_field() {
            Some(grid) => grid.sample_distance(p),
            None => self.config.grid.influence_radius,
        }
    }

    /// Repulsive force at an arbitrary point, for overlays. Zero until
    /// the field is ready.
    pub fn sample_force(&self, p: &Point3<f32>) -> Vector3<f32> {
        match self.active_field() {
            Some(grid) => {
                ForceField::new(grid, &self.registry, &self.config.force).force_at(p)
            }
            None => Vector3::zeros(),
        }
    }

    /// The active distance field, for direct gradient/overlay sampling.
    /// `None` until a build has completed successfully.
    #[inline]
    pub fn field(&self) -> Option<&VoxelGrid> {
        self.active_field()
    }

    #[inline]
    pub fn field_ready(&self) -> bool {
        self.field_ready
    }

    #[inline]
    pub fn build_in_flight(&self) -> bool {
        self.build.is_some()
    }

    pub fn last_build_error(&self) -> Option<&str> {
        self.last_build_error.as_deref()
    }

    #[inline]
    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    #[inline]
    pub fn agent_mut(&mut self) -> &mut AgentState {
        &mut self.agent
    }

    #[inline]
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    #[inline]
    pub fn registry(&self) -> &ObstacleRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &RakshaConfig {
        &self.config
    }

    #[inline]
    pub fn warning_active(&self) -> bool {
        self.warning
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
