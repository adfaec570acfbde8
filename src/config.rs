//! Configuration loading for RakshaNav
//!
//! All sections have full defaults, so an empty TOML file (or no file at
//! all) yields a runnable configuration tuned for the default city scene.
//! Defaults for the flight and collision sections reproduce the original
//! simulator constants; the force and grid sections are tuned so the
//! default city fits a grid in the low hundred-thousands of voxels.

use crate::error::{RakshaError, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RakshaConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub occupancy: OccupancyConfig,
    #[serde(default)]
    pub force: ForceConfig,
    #[serde(default)]
    pub collision: CollisionConfig,
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub predict: PredictConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

/// Voxel grid extents and distance-field parameters
#[derive(Clone, Debug, Deserialize)]
pub struct GridConfig {
    /// Half-extent of the world on X and Z (world spans ±this)
    #[serde(default = "default_world_half_extent")]
    pub world_half_extent: f32,

    /// Edge length of one cubic voxel
    #[serde(default = "default_voxel_size")]
    pub cell_size: f32,

    /// Bottom of the sampled volume
    #[serde(default = "default_min_y")]
    pub min_y: f32,

    /// Top of the sampled volume; also the implicit ceiling obstacle
    #[serde(default = "default_max_y")]
    pub max_y: f32,

    /// Influence radius r0: fill value and clamp ceiling of the field
    #[serde(default = "default_influence_radius")]
    pub influence_radius: f32,

    /// Worker threads for the field build (1 = serial)
    #[serde(default = "default_build_threads")]
    pub build_threads: usize,
}

/// 2D restricted-zone raster parameters
#[derive(Clone, Debug, Deserialize)]
pub struct OccupancyConfig {
    /// Edge length of one ground cell
    #[serde(default = "default_occupancy_cell")]
    pub cell_size: f32,

    /// Horizontal safety buffer around occupied cells (world units)
    #[serde(default = "default_buffer")]
    pub buffer: f32,

    /// Extra height added above rasterized rooftops
    #[serde(default = "default_vertical_clearance")]
    pub vertical_clearance: f32,
}

/// Repulsive force shaping
#[derive(Clone, Debug, Deserialize)]
pub struct ForceConfig {
    /// Gain η of the repulsion magnitude
    #[serde(default = "default_gain")]
    pub gain: f32,

    /// Small positive ε keeping the magnitude finite at zero distance
    #[serde(default = "default_force_epsilon")]
    pub epsilon: f32,

    /// Saturation ceiling for the force magnitude
    #[serde(default = "default_max_force")]
    pub max_force: f32,

    /// Height of the landing funnel above a landable roof
    #[serde(default = "default_funnel_height")]
    pub funnel_height: f32,

    /// Pad radius as a fraction of the smaller horizontal half-extent
    #[serde(default = "default_pad_radius_frac")]
    pub pad_radius_frac: f32,

    /// Gradient magnitudes below this are treated as "no direction"
    #[serde(default = "default_gradient_epsilon")]
    pub gradient_epsilon: f32,
}

/// Hard collision backstop
#[derive(Clone, Debug, Deserialize)]
pub struct CollisionConfig {
    /// Margin added outside the face when pushing a penetration out
    #[serde(default = "default_collision_epsilon")]
    pub epsilon: f32,
}

/// Flight model constants (per tick at dt = 1)
#[derive(Clone, Debug, Deserialize)]
pub struct FlightConfig {
    /// Acceleration added per tick of full control input
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,

    /// Multiplicative velocity drag per tick
    #[serde(default = "default_drag")]
    pub drag: f32,

    /// Speed ceiling
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Vertical position step per tick of full up/down input
    #[serde(default = "default_vertical_step")]
    pub vertical_step: f32,

    /// Yaw step per tick of full yaw input (radians)
    #[serde(default = "default_yaw_step")]
    pub yaw_step: f32,

    /// Lowest allowed altitude
    #[serde(default = "default_min_altitude")]
    pub min_altitude: f32,

    /// Highest allowed altitude
    #[serde(default = "default_max_altitude")]
    pub max_altitude: f32,
}

/// Trajectory rollout and early warning
#[derive(Clone, Debug, Deserialize)]
pub struct PredictConfig {
    /// Number of explicit-Euler steps per rollout
    #[serde(default = "default_predict_steps")]
    pub steps: usize,

    /// Integration step size (ticks)
    #[serde(default = "default_predict_dt")]
    pub dt: f32,

    /// Ceiling on the force magnitude during rollout
    #[serde(default = "default_max_accel")]
    pub max_accel: f32,

    /// Multiplicative velocity damping per rollout step
    #[serde(default = "default_damping")]
    pub damping: f32,

    /// Warn when sampled distance drops below this fraction of r0
    #[serde(default = "default_warn_distance_frac")]
    pub warn_distance_frac: f32,

    /// Warn only when force magnitude also exceeds this floor
    #[serde(default = "default_warn_force_min")]
    pub warn_force_min: f32,
}

/// Seeded city generation
#[derive(Clone, Debug, Deserialize)]
pub struct SceneConfig {
    /// PRNG seed; the same seed always yields the same city
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Blocks span indices [-range, range] on both axes
    #[serde(default = "default_block_range")]
    pub block_range: i32,

    /// Distance between block centers
    #[serde(default = "default_block_pitch")]
    pub block_pitch: f32,

    /// Blocks with both |indices| <= this stay empty (central plaza)
    #[serde(default = "default_plaza_radius")]
    pub plaza_radius: i32,

    /// Minimum buildings per block
    #[serde(default = "default_min_buildings")]
    pub min_buildings: usize,

    /// Maximum buildings per block
    #[serde(default = "default_max_buildings")]
    pub max_buildings: usize,

    /// Lowest building height
    #[serde(default = "default_min_height")]
    pub min_height: f32,

    /// Height spread above the minimum
    #[serde(default = "default_height_range")]
    pub height_range: f32,

    /// Full width of the uniform placement jitter inside a block
    #[serde(default = "default_placement_jitter")]
    pub placement_jitter: f32,

    /// Probability that a building is flagged landable
    #[serde(default = "default_landable_prob")]
    pub landable_prob: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            world_half_extent: default_world_half_extent(),
            cell_size: default_voxel_size(),
            min_y: default_min_y(),
            max_y: default_max_y(),
            influence_radius: default_influence_radius(),
            build_threads: default_build_threads(),
        }
    }
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            cell_size: default_occupancy_cell(),
            buffer: default_buffer(),
            vertical_clearance: default_vertical_clearance(),
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            gain: default_gain(),
            epsilon: default_force_epsilon(),
            max_force: default_max_force(),
            funnel_height: default_funnel_height(),
            pad_radius_frac: default_pad_radius_frac(),
            gradient_epsilon: default_gradient_epsilon(),
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            epsilon: default_collision_epsilon(),
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            acceleration: default_acceleration(),
            drag: default_drag(),
            max_speed: default_max_speed(),
            vertical_step: default_vertical_step(),
            yaw_step: default_yaw_step(),
            min_altitude: default_min_altitude(),
            max_altitude: default_max_altitude(),
        }
    }
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            steps: default_predict_steps(),
            dt: default_predict_dt(),
            max_accel: default_max_accel(),
            damping: default_damping(),
            warn_distance_frac: default_warn_distance_frac(),
            warn_force_min: default_warn_force_min(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            block_range: default_block_range(),
            block_pitch: default_block_pitch(),
            plaza_radius: default_plaza_radius(),
            min_buildings: default_min_buildings(),
            max_buildings: default_max_buildings(),
            min_height: default_min_height(),
            height_range: default_height_range(),
            placement_jitter: default_placement_jitter(),
            landable_prob: default_landable_prob(),
        }
    }
}

// Default value functions

fn default_world_half_extent() -> f32 {
    180.0
}
fn default_voxel_size() -> f32 {
    4.0
}
fn default_min_y() -> f32 {
    0.0
}
fn default_max_y() -> f32 {
    80.0
}
fn default_influence_radius() -> f32 {
    20.0
}
fn default_build_threads() -> usize {
    1
}

fn default_occupancy_cell() -> f32 {
    2.0
}
fn default_buffer() -> f32 {
    5.0
}
fn default_vertical_clearance() -> f32 {
    5.0
}

fn default_gain() -> f32 {
    6.0
}
fn default_force_epsilon() -> f32 {
    0.15
}
fn default_max_force() -> f32 {
    0.5
}
fn default_funnel_height() -> f32 {
    8.0
}
fn default_pad_radius_frac() -> f32 {
    0.5
}
fn default_gradient_epsilon() -> f32 {
    1e-4
}

fn default_collision_epsilon() -> f32 {
    0.05
}

fn default_acceleration() -> f32 {
    0.02
}
fn default_drag() -> f32 {
    0.95
}
fn default_max_speed() -> f32 {
    0.5
}
fn default_vertical_step() -> f32 {
    0.2
}
fn default_yaw_step() -> f32 {
    0.03
}
fn default_min_altitude() -> f32 {
    2.0
}
fn default_max_altitude() -> f32 {
    80.0
}

fn default_predict_steps() -> usize {
    45
}
fn default_predict_dt() -> f32 {
    1.0
}
fn default_max_accel() -> f32 {
    0.1
}
fn default_damping() -> f32 {
    0.95
}
fn default_warn_distance_frac() -> f32 {
    0.5
}
fn default_warn_force_min() -> f32 {
    0.02
}

fn default_seed() -> u64 {
    7
}
fn default_block_range() -> i32 {
    3
}
fn default_block_pitch() -> f32 {
    60.0
}
fn default_plaza_radius() -> i32 {
    1
}
fn default_min_buildings() -> usize {
    2
}
fn default_max_buildings() -> usize {
    4
}
fn default_min_height() -> f32 {
    15.0
}
fn default_height_range() -> f32 {
    50.0
}
fn default_placement_jitter() -> f32 {
    30.0
}
fn default_landable_prob() -> f32 {
    0.35
}

impl RakshaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RakshaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: RakshaConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a consistent world.
    pub fn validate(&self) -> Result<()> {
        if self.grid.cell_size <= 0.0 || self.occupancy.cell_size <= 0.0 {
            return Err(RakshaError::Config("cell sizes must be positive".into()));
        }
        if self.grid.world_half_extent <= 0.0 {
            return Err(RakshaError::Config(
                "world half-extent must be positive".into(),
            ));
        }
        if self.grid.max_y <= self.grid.min_y {
            return Err(RakshaError::Config(
                "grid max_y must be above min_y".into(),
            ));
        }
        if self.grid.influence_radius <= 0.0 {
            return Err(RakshaError::Config(
                "influence radius must be positive".into(),
            ));
        }
        if self.force.epsilon <= 0.0 {
            return Err(RakshaError::Config("force epsilon must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.flight.drag) || !(0.0..=1.0).contains(&self.predict.damping)
        {
            return Err(RakshaError::Config(
                "drag and damping must lie in [0, 1]".into(),
            ));
        }
        if self.scene.min_buildings > self.scene.max_buildings {
            return Err(RakshaError::Config(
                "scene min_buildings exceeds max_buildings".into(),
            ));
        }
        if self.scene.min_height <= 0.0 || self.scene.height_range <= 0.0 {
            return Err(RakshaError::Config(
                "building heights must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scene.landable_prob) {
            return Err(RakshaError::Config(
                "landable probability must lie in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
