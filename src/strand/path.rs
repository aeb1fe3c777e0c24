//! Rope builder that lays evenly spaced points along a polyline.

use alloc::vec::Vec as AllocVec;

use super::{PointKey, Strand};
use crate::config::StrandConfig;
use crate::error::RopeError;
use crate::float::Float;
use crate::vec::Vec2;

/// Most points a single path segment may be split into.
const MAX_SEGMENT_INTERVALS: usize = 1 << 16;

impl<F: Float> Strand<F> {
    /// Build a rope along `waypoints`, points spaced by the config's
    /// `path_spacing` and linked in order. With `fix_first` the first point
    /// is pinned. Everything joins the active set immediately.
    pub fn from_path(waypoints: &[Vec2<F>], config: StrandConfig<F>, fix_first: bool) -> Result<Self, RopeError> {
        let mut strand = Strand::new(config);
        strand.lay_path(waypoints, fix_first, false)?;
        log::debug!(
            "strand {}: built from {} waypoints, {} points",
            strand.id,
            waypoints.len(),
            strand.points.len()
        );
        Ok(strand)
    }

    /// Queue a rope along `waypoints` into this strand. The new points and
    /// sticks join at the end of the next step (or after `end_batch`).
    pub fn queue_path(&mut self, waypoints: &[Vec2<F>], fix_first: bool) -> Result<AllocVec<PointKey>, RopeError> {
        self.lay_path(waypoints, fix_first, true)
    }

    fn lay_path(&mut self, waypoints: &[Vec2<F>], fix_first: bool, queued: bool) -> Result<AllocVec<PointKey>, RopeError> {
        let spacing = self.config.path_spacing;
        if waypoints.len() < 2 || !(spacing > F::zero()) {
            return Err(RopeError::InsufficientPath);
        }

        let mut positions: AllocVec<Vec2<F>> = AllocVec::new();
        for pair in waypoints.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let length = start.distance(end);
            if length.is_near_zero(F::degenerate_epsilon()) {
                continue;
            }
            let ratio = (length / spacing).ceil();
            if !(ratio <= F::from_f32(MAX_SEGMENT_INTERVALS as f32)) {
                return Err(RopeError::InsufficientPath);
            }
            let intervals = (ratio.to_f32() as usize).max(1);
            let divisor = F::from_f32(intervals as f32);
            // Segments share their joint, which the previous segment already laid.
            let first = if positions.is_empty() { 0 } else { 1 };
            for j in first..=intervals {
                positions.push(start.lerp(end, F::from_f32(j as f32) / divisor));
            }
        }
        if positions.len() < 2 {
            return Err(RopeError::InsufficientPath);
        }

        let mut keys = AllocVec::with_capacity(positions.len());
        for (i, &pos) in positions.iter().enumerate() {
            let fixed = fix_first && i == 0;
            let key = if queued { self.queue_point(pos, fixed) } else { self.add_point(pos, fixed) };
            keys.push(key);
        }
        for pair in keys.windows(2) {
            self.link(pair[0], pair[1], queued)?;
        }
        Ok(keys)
    }
}
