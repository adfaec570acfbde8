//! Clamped distance-field voxel grid.
//!
//! Stores one f32 per voxel: the distance to the nearest obstacle
//! surface (or the ceiling plane), clamped to the influence radius.
//! Values always lie in `[0, influence_radius]`; a voxel at the
//! influence radius exerts no force.
//!
//! Layout is row-major with Y outermost: `idx = (iy * nz + iz) * nx + ix`.
//! Each Y layer is therefore one contiguous slab of `nx * nz` values,
//! which is what the builder splits across worker threads.

use nalgebra::Point3;

/// Dense voxel grid of clamped obstacle distances.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    origin: Point3<f32>,
    cell_size: f32,
    nx: usize,
    ny: usize,
    nz: usize,
    influence_radius: f32,
    values: Vec<f32>,
}

impl VoxelGrid {
    /// Allocate a grid with every voxel at the influence radius
    /// (i.e. "no obstacle anywhere near").
    pub fn new(
        origin: Point3<f32>,
        cell_size: f32,
        nx: usize,
        ny: usize,
        nz: usize,
        influence_radius: f32,
    ) -> Self {
        Self {
            origin,
            cell_size,
            nx,
            ny,
            nz,
            influence_radius,
            values: vec![influence_radius; nx * ny * nz],
        }
    }

    #[inline]
    fn idx(&self, ix: usize, iy: usize, iz: usize) -> usize {
        debug_assert!(
            ix < self.nx && iy < self.ny && iz < self.nz,
            "voxel index out of bounds: ({}, {}, {}) in {}x{}x{}",
            ix,
            iy,
            iz,
            self.nx,
            self.ny,
            self.nz
        );
        (iy * self.nz + iz) * self.nx + ix
    }

    #[inline]
    pub fn get(&self, ix: usize, iy: usize, iz: usize) -> f32 {
        self.values[self.idx(ix, iy, iz)]
    }

    #[inline]
    pub fn set(&mut self, ix: usize, iy: usize, iz: usize, value: f32) {
        debug_assert!(
            (0.0..=self.influence_radius).contains(&value),
            "distance {} outside [0, {}]",
            value,
            self.influence_radius
        );
        let idx = self.idx(ix, iy, iz);
        self.values[idx] = value;
    }

    /// World position of a voxel center.
    #[inline]
    pub fn cell_center(&self, ix: usize, iy: usize, iz: usize) -> Point3<f32> {
        Point3::new(
            self.origin.x + (ix as f32 + 0.5) * self.cell_size,
            self.origin.y + (iy as f32 + 0.5) * self.cell_size,
            self.origin.z + (iz as f32 + 0.5) * self.cell_size,
        )
    }

    /// Whether a world position lies inside the gridded volume.
    #[inline]
    pub fn contains(&self, p: &Point3<f32>) -> bool {
        let span_x = self.nx as f32 * self.cell_size;
        let span_y = self.ny as f32 * self.cell_size;
        let span_z = self.nz as f32 * self.cell_size;
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.z >= self.origin.z
            && p.x <= self.origin.x + span_x
            && p.y <= self.origin.y + span_y
            && p.z <= self.origin.z + span_z
    }

    #[inline]
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    #[inline]
    pub fn influence_radius(&self) -> f32 {
        self.influence_radius
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.values.len()
    }

    /// Number of voxels in one Y layer.
    #[inline]
    pub fn layer_len(&self) -> usize {
        self.nx * self.nz
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Mutable Y layers, bottom to top. Each slab is one contiguous
    /// `nx * nz` run, independent of every other slab.
    pub fn layers_mut(&mut self) -> std::slice::ChunksMut<'_, f32> {
        let layer = self.nx * self.nz;
        self.values.chunks_mut(layer)
    }
}
