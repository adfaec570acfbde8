//! Deferred distance-field construction.
//!
//! The full-volume build is far too heavy for a tick, so it runs once
//! on a named background thread and hands the finished grid back over
//! a one-slot channel. The world polls `try_take` every tick; until it
//! yields, soft avoidance and early warning stay disabled.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{error, info};

use crate::config::GridConfig;
use crate::error::{RakshaError, Result};
use crate::field::{build_distance_field, VoxelGrid};
use crate::scene::ObstacleRegistry;

/// Handle to a one-shot field build running on its own thread.
///
/// Dropping the handle detaches the build; the worker notices the
/// closed channel and simply discards its result. No cancellation is
/// needed for a one-shot build.
pub struct FieldBuildTask {
    receiver: Receiver<Result<VoxelGrid>>,
    handle: Option<JoinHandle<()>>,
}

impl FieldBuildTask {
    /// Spawn the build on a background thread.
    pub fn spawn(registry: Arc<ObstacleRegistry>, cfg: GridConfig) -> Result<Self> {
        let (tx, rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("field-build".into())
            .spawn(move || {
                let started = Instant::now();
                let result = build_distance_field(&registry, &cfg);
                match &result {
                    Ok(grid) => info!(
                        "distance field ready: {} voxels in {:.1?}",
                        grid.voxel_count(),
                        started.elapsed()
                    ),
                    Err(e) => error!("distance field build failed: {}", e),
                }
                let _ = tx.send(result);
            })?;
        Ok(Self {
            receiver: rx,
            handle: Some(handle),
        })
    }

    /// Non-blocking poll. Returns `Some` exactly once, when the build
    /// has finished (or the worker died without reporting).
    pub fn try_take(&mut self) -> Option<Result<VoxelGrid>> {
        self.handle.as_ref()?;
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(RakshaError::FieldBuild(
                    "build thread exited without a result".into(),
                )))
            }
        }
    }

    /// Wait for the build to finish and return its result.
    pub fn take_blocking(&mut self) -> Result<VoxelGrid> {
        let result = self.receiver.recv().unwrap_or_else(|_| {
            Err(RakshaError::FieldBuild(
                "build thread exited without a result".into(),
            ))
        });
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    use crate::scene::Obstacle;

    fn small_cfg() -> GridConfig {
        GridConfig {
            world_half_extent: 20.0,
            cell_size: 2.0,
            min_y: 0.0,
            max_y: 40.0,
            influence_radius: 20.0,
            build_threads: 2,
        }
    }

    fn registry() -> Arc<ObstacleRegistry> {
        let o = Obstacle::new(
            Point3::new(0.0, 10.0, 0.0),
            Vector3::new(5.0, 10.0, 5.0),
            false,
            20.0,
        )
        .unwrap();
        Arc::new(ObstacleRegistry::new(vec![o]))
    }

    #[test]
    fn test_blocking_take_returns_grid() {
        let mut task = FieldBuildTask::spawn(registry(), small_cfg()).unwrap();
        let grid = task.take_blocking().unwrap();
        assert!(grid.voxel_count() > 0);
        assert_eq!(grid.get(10, 5, 10), 0.0); // inside the tower
    }

    #[test]
    fn test_poll_eventually_yields() {
        let mut task = FieldBuildTask::spawn(registry(), small_cfg()).unwrap();
        let deadline = Instant::now() + std::time::Duration::from_secs(10);
        loop {
            if let Some(result) = task.try_take() {
                assert!(result.is_ok());
                break;
            }
            assert!(Instant::now() < deadline, "build never reported");
            thread::yield_now();
        }
        // A second poll has nothing further to report.
        assert!(task.try_take().is_none());
    }

    #[test]
    fn test_build_error_propagates() {
        let mut cfg = small_cfg();
        cfg.cell_size = 0.001;
        let mut task = FieldBuildTask::spawn(registry(), cfg).unwrap();
        let err = task.take_blocking().unwrap_err();
        assert!(matches!(err, RakshaError::FieldBuild(_)));
    }
}
