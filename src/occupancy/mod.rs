//! 2D restricted-zone raster over the city ground plane.
//!
//! Projects every obstacle straight down onto a ground grid: a cell is
//! occupied if a vertical ray through its center hits an obstacle, and it
//! records the highest hit. The occupied mask is then dilated by the
//! configured horizontal buffer (Chebyshev metric in cell units) with
//! max-height propagation, and the dilated mask's outline is extracted as
//! world-space boundary segments for the restricted-zone overlay.
//!
//! Grid bounds are derived from the obstacle set itself (footprints plus
//! buffer plus one clear rim cell), so the outline always closes and
//! cells outside the derived bounds are simply never sampled.

use nalgebra::Point2;

use crate::config::OccupancyConfig;
use crate::scene::ObstacleRegistry;

/// One segment of the restricted-zone outline, on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryEdge {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
    /// Top of the restricted zone at the dilated cell this edge borders.
    pub height: f32,
}

/// Ground-plane occupancy raster with height map and dilated mask.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    origin_x: f32,
    origin_z: f32,
    cell_size: f32,
    nx: usize,
    nz: usize,
    height: Vec<f32>,
    occupied: Vec<bool>,
    dilated: Vec<bool>,
    buffer: f32,
    vertical_clearance: f32,
}

impl OccupancyGrid {
    /// Rasterize the obstacle set and dilate by the configured buffer.
    pub fn rasterize(registry: &ObstacleRegistry, cfg: &OccupancyConfig) -> Self {
        let cell = cfg.cell_size;

        // Derive bounds: tightest box around all footprints, widened by
        // the buffer and one rim cell so dilation never touches the edge.
        let mut min_x = f32::INFINITY;
        let mut min_z = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_z = f32::NEG_INFINITY;
        for o in registry.iter() {
            let b = o.aabb();
            min_x = min_x.min(b.min.x);
            min_z = min_z.min(b.min.z);
            max_x = max_x.max(b.max.x);
            max_z = max_z.max(b.max.z);
        }

        if registry.is_empty() || cell <= 0.0 {
            return Self {
                origin_x: 0.0,
                origin_z: 0.0,
                cell_size: cell.max(f32::EPSILON),
                nx: 0,
                nz: 0,
                height: Vec::new(),
                occupied: Vec::new(),
                dilated: Vec::new(),
                buffer: cfg.buffer,
                vertical_clearance: cfg.vertical_clearance,
            };
        }

        let margin = cfg.buffer + cell;
        let origin_x = min_x - margin;
        let origin_z = min_z - margin;
        let nx = (((max_x + margin) - origin_x) / cell).ceil() as usize + 1;
        let nz = (((max_z + margin) - origin_z) / cell).ceil() as usize + 1;

        let mut grid = Self {
            origin_x,
            origin_z,
            cell_size: cell,
            nx,
            nz,
            height: vec![0.0; nx * nz],
            occupied: vec![false; nx * nz],
            dilated: vec![false; nx * nz],
            buffer: cfg.buffer,
            vertical_clearance: cfg.vertical_clearance,
        };

        // Vertical casting: for a box scene this reduces to a footprint
        // containment test; the recorded height is the tallest hit plus
        // the configured clearance.
        for iz in 0..nz {
            for ix in 0..nx {
                let (x, z) = grid.cell_center(ix, iz);
                let mut top: Option<f32> = None;
                for o in registry.iter() {
                    if o.footprint_contains(x, z) {
                        let roof = o.aabb().max.y;
                        top = Some(top.map_or(roof, |t: f32| t.max(roof)));
                    }
                }
                if let Some(t) = top {
                    let idx = grid.idx(ix, iz);
                    grid.occupied[idx] = true;
                    grid.height[idx] = t + cfg.vertical_clearance;
                }
            }
        }

        grid.dilate(cfg.buffer);
        grid
    }

    /// Dilate the occupied mask by `buffer` world units (Chebyshev in
    /// cell units), propagating the maximum height into each dilated
    /// cell. Propagation fans out from a snapshot of the rasterized
    /// cells, so a height raised during the pass never relays further
    /// than the radius, the result is independent of obstacle
    /// iteration order, and re-running with buffer 0 is a no-op on an
    /// already-dilated mask.
    pub fn dilate(&mut self, buffer: f32) {
        let radius = (buffer / self.cell_size).ceil() as isize;

        let mut sources = Vec::new();
        for iz in 0..self.nz as isize {
            for ix in 0..self.nx as isize {
                let src = self.idx(ix as usize, iz as usize);
                if self.occupied[src] {
                    sources.push((ix, iz, self.height[src]));
                }
            }
        }

        for (ix, iz, h) in sources {
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let jx = ix + dx;
                    let jz = iz + dz;
                    if jx < 0 || jz < 0 || jx >= self.nx as isize || jz >= self.nz as isize {
                        continue;
                    }
                    let dst = self.idx(jx as usize, jz as usize);
                    self.dilated[dst] = true;
                    if h > self.height[dst] {
                        self.height[dst] = h;
                    }
                }
            }
        }
    }

    /// Extract the outline of the dilated mask.
    ///
    /// An edge between two adjacent cells is a boundary edge iff exactly
    /// one of the pair is dilated; the emitted segment is their shared
    /// cell edge in world coordinates, tagged with the dilated side's
    /// height.
    pub fn boundary_edges(&self) -> Vec<BoundaryEdge> {
        let mut edges = Vec::new();
        if self.nx == 0 || self.nz == 0 {
            return edges;
        }

        for iz in 0..self.nz {
            for ix in 0..self.nx {
                let here = self.is_dilated(ix, iz);

                // Edge shared with the +X neighbor.
                if ix + 1 < self.nx {
                    let there = self.is_dilated(ix + 1, iz);
                    if here != there {
                        let x = self.origin_x + (ix as f32 + 1.0) * self.cell_size;
                        let z0 = self.origin_z + iz as f32 * self.cell_size;
                        edges.push(BoundaryEdge {
                            start: Point2::new(x, z0),
                            end: Point2::new(x, z0 + self.cell_size),
                            height: self.restricted_height(ix, iz, ix + 1, iz),
                        });
                    }
                }

                // Edge shared with the +Z neighbor.
                if iz + 1 < self.nz {
                    let there = self.is_dilated(ix, iz + 1);
                    if here != there {
                        let z = self.origin_z + (iz as f32 + 1.0) * self.cell_size;
                        let x0 = self.origin_x + ix as f32 * self.cell_size;
                        edges.push(BoundaryEdge {
                            start: Point2::new(x0, z),
                            end: Point2::new(x0 + self.cell_size, z),
                            height: self.restricted_height(ix, iz, ix, iz + 1),
                        });
                    }
                }
            }
        }
        edges
    }

    /// Height of whichever side of an edge pair is dilated.
    fn restricted_height(&self, ax: usize, az: usize, bx: usize, bz: usize) -> f32 {
        if self.is_dilated(ax, az) {
            self.height[self.idx(ax, az)]
        } else {
            self.height[self.idx(bx, bz)]
        }
    }

    #[inline]
    fn idx(&self, ix: usize, iz: usize) -> usize {
        debug_assert!(ix < self.nx && iz < self.nz);
        iz * self.nx + ix
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.nz)
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn buffer(&self) -> f32 {
        self.buffer
    }

    #[inline]
    pub fn vertical_clearance(&self) -> f32 {
        self.vertical_clearance
    }

    /// World coordinates of a cell center.
    #[inline]
    pub fn cell_center(&self, ix: usize, iz: usize) -> (f32, f32) {
        (
            self.origin_x + (ix as f32 + 0.5) * self.cell_size,
            self.origin_z + (iz as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell indices containing a world position, if inside the raster.
    pub fn world_to_cell(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let gx = (x - self.origin_x) / self.cell_size;
        let gz = (z - self.origin_z) / self.cell_size;
        if gx < 0.0 || gz < 0.0 {
            return None;
        }
        let ix = gx as usize;
        let iz = gz as usize;
        if ix >= self.nx || iz >= self.nz {
            return None;
        }
        Some((ix, iz))
    }

    /// Whether a cell is directly under an obstacle. Out of bounds reads
    /// as free.
    #[inline]
    pub fn is_occupied(&self, ix: usize, iz: usize) -> bool {
        if ix >= self.nx || iz >= self.nz {
            return false;
        }
        self.occupied[iz * self.nx + ix]
    }

    /// Whether a cell is in the restricted (dilated) zone. Out of bounds
    /// reads as free.
    #[inline]
    pub fn is_dilated(&self, ix: usize, iz: usize) -> bool {
        if ix >= self.nx || iz >= self.nz {
            return false;
        }
        self.dilated[iz * self.nx + ix]
    }

    /// Restricted-zone top at a cell; 0 for free or out-of-bounds cells.
    #[inline]
    pub fn height_at(&self, ix: usize, iz: usize) -> f32 {
        if ix >= self.nx || iz >= self.nz {
            return 0.0;
        }
        self.height[iz * self.nx + ix]
    }

    /// Count of dilated cells (restricted-zone area in cells).
    pub fn dilated_count(&self) -> usize {
        self.dilated.iter().filter(|d| **d).count()
    }
}
