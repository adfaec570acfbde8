//! Volumetric distance field: grid storage, construction, sampling.

pub mod builder;
pub mod grid;
mod sampler;

pub use builder::build_distance_field;
pub use grid::VoxelGrid;
