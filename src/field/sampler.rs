//! Continuous sampling over the voxel grid.
//!
//! Distances live at voxel centers; `sample_distance` blends the eight
//! surrounding centers trilinearly, and `sample_gradient` takes central
//! differences with a step of one cell. Outside the gridded volume the
//! field reads as the influence radius (no obstacle information), and
//! probes within half a cell of the rim clamp onto the boundary centers
//! rather than extrapolating.

use nalgebra::{Point3, Vector3};

use crate::field::grid::VoxelGrid;

impl VoxelGrid {
    /// Trilinearly interpolated distance at a world position.
    pub fn sample_distance(&self, p: &Point3<f32>) -> f32 {
        if !self.contains(p) {
            return self.influence_radius();
        }
        let (nx, ny, nz) = self.dims();
        let origin = self.origin();
        let inv = 1.0 / self.cell_size();

        let fx = ((p.x - origin.x) * inv - 0.5).clamp(0.0, (nx - 1) as f32);
        let fy = ((p.y - origin.y) * inv - 0.5).clamp(0.0, (ny - 1) as f32);
        let fz = ((p.z - origin.z) * inv - 0.5).clamp(0.0, (nz - 1) as f32);

        let ix = (fx as usize).min(nx.saturating_sub(2));
        let iy = (fy as usize).min(ny.saturating_sub(2));
        let iz = (fz as usize).min(nz.saturating_sub(2));
        let jx = (ix + 1).min(nx - 1);
        let jy = (iy + 1).min(ny - 1);
        let jz = (iz + 1).min(nz - 1);

        let tx = (fx - ix as f32).clamp(0.0, 1.0);
        let ty = (fy - iy as f32).clamp(0.0, 1.0);
        let tz = (fz - iz as f32).clamp(0.0, 1.0);

        let c000 = self.get(ix, iy, iz);
        let c100 = self.get(jx, iy, iz);
        let c010 = self.get(ix, jy, iz);
        let c110 = self.get(jx, jy, iz);
        let c001 = self.get(ix, iy, jz);
        let c101 = self.get(jx, iy, jz);
        let c011 = self.get(ix, jy, jz);
        let c111 = self.get(jx, jy, jz);

        let c00 = c000 + (c100 - c000) * tx;
        let c10 = c010 + (c110 - c010) * tx;
        let c01 = c001 + (c101 - c001) * tx;
        let c11 = c011 + (c111 - c011) * tx;

        let c0 = c00 + (c10 - c00) * ty;
        let c1 = c01 + (c11 - c01) * ty;

        c0 + (c1 - c0) * tz
    }

    /// Central-difference gradient of the sampled field, one cell wide.
    /// Points from low distance toward high distance, i.e. away from
    /// obstacles.
    pub fn sample_gradient(&self, p: &Point3<f32>) -> Vector3<f32> {
        let h = self.cell_size();
        let inv2h = 1.0 / (2.0 * h);
        let dx = self.sample_distance(&Point3::new(p.x + h, p.y, p.z))
            - self.sample_distance(&Point3::new(p.x - h, p.y, p.z));
        let dy = self.sample_distance(&Point3::new(p.x, p.y + h, p.z))
            - self.sample_distance(&Point3::new(p.x, p.y - h, p.z));
        let dz = self.sample_distance(&Point3::new(p.x, p.y, p.z + h))
            - self.sample_distance(&Point3::new(p.x, p.y, p.z - h));
        Vector3::new(dx * inv2h, dy * inv2h, dz * inv2h)
    }
}
