//! RakshaNav - Spatial avoidance engine for urban drone flight
//!
//! Keeps a flying agent out of forbidden volumes around city obstacles
//! using a precomputed clamped distance field and a repulsive potential
//! force, with a relaxed "landing funnel" over designated rooftop pads,
//! a hard AABB collision resolver as the safety backstop, and a forward
//! trajectory rollout for look-ahead rendering and early warning.
//!
//! # Architecture
//!
//! The crate is organized into 5 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                     world/                          │  ← Tick loop & ownership
//! │            (NavigationWorld, build task)            │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │         avoidance/   collision/   predict/          │  ← Steering
//! │      (potential force, push-out, rollout)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               field/      occupancy/                │  ← Spatial queries
//! │       (voxel distance field, ground raster)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     scene/                          │  ← Obstacles
//! │           (registry, seeded city generator)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               core/   config   error                │  ← Foundation
//! │            (aabb, agent state, math)                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Tick pipeline
//!
//! Each call to [`NavigationWorld::tick`] runs a fixed sequence:
//! control integration → repulsive force → drag and speed cap → hard
//! collision resolution → world clamps → trajectory prediction and
//! early warning. The heavy distance-field build runs once on a
//! background thread; until it completes, the force model and warning
//! no-op and only the hard resolver protects the agent.

// ============================================================================
// Layer 1: Foundation (no internal deps)
// ============================================================================
pub mod config;
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Scene (depends on core)
// ============================================================================
pub mod scene;

// ============================================================================
// Layer 3: Spatial queries (depends on core, scene)
// ============================================================================
pub mod field;
pub mod occupancy;

// ============================================================================
// Layer 4: Steering (depends on field, scene)
// ============================================================================
pub mod avoidance;
pub mod collision;
pub mod predict;

// ============================================================================
// Layer 5: World orchestration (depends on all layers)
// ============================================================================
pub mod world;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Foundation
pub use config::{
    CollisionConfig, FlightConfig, ForceConfig, GridConfig, OccupancyConfig, PredictConfig,
    RakshaConfig, SceneConfig,
};
pub use core::{Aabb, AgentState, ControlInput, FlightTelemetry};
pub use error::{RakshaError, Result};

// Scene
pub use scene::{generate_city, Obstacle, ObstacleRegistry};

// Spatial queries
pub use field::{build_distance_field, VoxelGrid};
pub use occupancy::{BoundaryEdge, OccupancyGrid};

// Steering
pub use avoidance::ForceField;
pub use collision::resolve_collisions;
pub use predict::{early_warning, predict_path, TrajectoryRollout};

// World
pub use world::build_task::FieldBuildTask;
pub use world::{NavigationWorld, TickReport};
