//! Distance-field construction.
//!
//! Sweeps the gridded volume once per obstacle, clipped to the
//! obstacle's influence-expanded box, min-merging exact box surface
//! distances. A final per-layer pass folds in the ceiling plane. All
//! work is per Y layer, so layers can be filled on worker threads
//! without any locking; serial and parallel builds produce bit-equal
//! grids.

use std::thread;

use log::debug;
use nalgebra::Point3;

use crate::config::GridConfig;
use crate::error::{RakshaError, Result};
use crate::field::grid::VoxelGrid;
use crate::scene::ObstacleRegistry;

/// Hard cap on grid allocation, guarding against a misconfigured cell
/// size blowing up memory. 32M voxels is 128 MiB of f32.
const MAX_VOXELS: usize = 32_000_000;

/// Build the clamped distance field for an obstacle set.
pub fn build_distance_field(registry: &ObstacleRegistry, cfg: &GridConfig) -> Result<VoxelGrid> {
    let half = cfg.world_half_extent;
    let cell = cfg.cell_size;
    let origin = Point3::new(-half, cfg.min_y, -half);
    let nx = ((2.0 * half) / cell).ceil() as usize;
    let ny = ((cfg.max_y - cfg.min_y) / cell).ceil() as usize;
    let nz = nx;

    let count = nx
        .checked_mul(ny)
        .and_then(|c| c.checked_mul(nz))
        .ok_or_else(|| RakshaError::FieldBuild("voxel count overflows usize".into()))?;
    if count == 0 {
        return Err(RakshaError::FieldBuild(format!(
            "degenerate grid {}x{}x{}",
            nx, ny, nz
        )));
    }
    if count > MAX_VOXELS {
        return Err(RakshaError::FieldBuild(format!(
            "grid {}x{}x{} is {} voxels, over the {} cap",
            nx, ny, nz, count, MAX_VOXELS
        )));
    }

    debug!(
        "building distance field: {}x{}x{} voxels, cell {}, influence {}",
        nx, ny, nz, cell, cfg.influence_radius
    );

    let mut grid = VoxelGrid::new(origin, cell, nx, ny, nz, cfg.influence_radius);
    let influence = cfg.influence_radius;
    let ceiling_y = cfg.max_y;
    let threads = cfg.build_threads.max(1);
    let layer = grid.layer_len();

    if threads == 1 || ny <= 1 {
        for (iy, slab) in grid.layers_mut().enumerate() {
            fill_layer(
                slab, iy, registry, origin, cell, nx, nz, influence, ceiling_y,
            );
        }
    } else {
        let mut slabs: Vec<(usize, &mut [f32])> = grid.layers_mut().enumerate().collect();
        let per_thread = slabs.len().div_ceil(threads);
        thread::scope(|s| {
            for batch in slabs.chunks_mut(per_thread) {
                s.spawn(move || {
                    for (iy, slab) in batch.iter_mut() {
                        fill_layer(
                            slab, *iy, registry, origin, cell, nx, nz, influence, ceiling_y,
                        );
                    }
                });
            }
        });
        debug_assert_eq!(layer * ny, count);
    }

    Ok(grid)
}

/// Fill one Y layer: min-merge surface distances of every obstacle
/// whose influence-expanded box reaches this altitude, then fold in the
/// ceiling plane.
#[allow(clippy::too_many_arguments)]
fn fill_layer(
    slab: &mut [f32],
    iy: usize,
    registry: &ObstacleRegistry,
    origin: Point3<f32>,
    cell: f32,
    nx: usize,
    nz: usize,
    influence: f32,
    ceiling_y: f32,
) {
    let y = origin.y + (iy as f32 + 0.5) * cell;

    for obstacle in registry.iter() {
        let reach = obstacle.aabb().expand(influence);
        if y < reach.min.y || y > reach.max.y {
            continue;
        }

        // Clip the sweep to the cells the expanded box can touch.
        let ix0 = (((reach.min.x - origin.x) / cell).floor().max(0.0)) as usize;
        let ix1 = ((((reach.max.x - origin.x) / cell).ceil()).max(0.0) as usize).min(nx);
        let iz0 = (((reach.min.z - origin.z) / cell).floor().max(0.0)) as usize;
        let iz1 = ((((reach.max.z - origin.z) / cell).ceil()).max(0.0) as usize).min(nz);

        let aabb = obstacle.aabb();
        for iz in iz0..iz1 {
            let z = origin.z + (iz as f32 + 0.5) * cell;
            for ix in ix0..ix1 {
                let x = origin.x + (ix as f32 + 0.5) * cell;
                let d = aabb.surface_distance(Point3::new(x, y, z));
                let idx = iz * nx + ix;
                if d < slab[idx] {
                    slab[idx] = d;
                }
            }
        }
    }

    // Ceiling plane: distance is uniform across the layer.
    let ceiling_d = (ceiling_y - y).max(0.0);
    if ceiling_d < influence {
        for v in slab.iter_mut() {
            if ceiling_d < *v {
                *v = ceiling_d;
            }
        }
    }
}
