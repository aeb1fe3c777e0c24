//! Cloth builder: a rectangular grid of points hanging from its top row.

use alloc::vec::Vec as AllocVec;

use super::{PointKey, Strand};
use crate::config::StrandConfig;
use crate::error::RopeError;
use crate::float::Float;
use crate::vec::Vec2;

/// Layout of a cloth grid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClothConfig<F: Float> {
    pub cols: usize,
    pub rows: usize,
    /// Distance between neighbouring points.
    pub spacing: F,
    /// Pin every n-th point of the top row, starting with the first.
    /// `None` leaves the cloth free.
    pub pin_every: Option<usize>,
    /// Add both diagonals of every cell to resist shearing.
    pub shear: bool,
}

impl<F: Float> ClothConfig<F> {
    pub fn new(cols: usize, rows: usize, spacing: F) -> Self {
        ClothConfig { cols, rows, spacing, pin_every: Some(4), shear: false }
    }

    pub fn with_pin_every(mut self, pin_every: Option<usize>) -> Self {
        self.pin_every = pin_every;
        self
    }

    pub fn with_shear(mut self, shear: bool) -> Self {
        self.shear = shear;
        self
    }

    fn validate(&self) -> Result<(), RopeError> {
        let too_small = self.cols.checked_mul(self.rows).map_or(true, |n| n < 2);
        if too_small || !(self.spacing > F::zero()) || self.pin_every == Some(0) {
            return Err(RopeError::InvalidClothDimensions);
        }
        Ok(())
    }
}

/// Handles of a built cloth, addressed by column and row.
#[derive(Clone, Debug)]
pub struct ClothGrid {
    cols: usize,
    rows: usize,
    points: AllocVec<PointKey>,
}

impl ClothGrid {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The point at `(col, row)`; row 0 is the top edge.
    pub fn at(&self, col: usize, row: usize) -> Option<PointKey> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.points.get(row * self.cols + col).copied()
    }

    /// Every point, row by row.
    pub fn points(&self) -> &[PointKey] {
        &self.points
    }
}

impl<F: Float> Strand<F> {
    /// Build a strand holding a single cloth whose top-left corner is `origin`.
    pub fn cloth(origin: Vec2<F>, cloth: &ClothConfig<F>, config: StrandConfig<F>) -> Result<(Self, ClothGrid), RopeError> {
        let mut strand = Strand::new(config);
        let grid = strand.add_cloth(origin, cloth)?;
        Ok((strand, grid))
    }

    /// Weave a cloth into this strand. Rows grow downward from `origin`.
    pub fn add_cloth(&mut self, origin: Vec2<F>, cloth: &ClothConfig<F>) -> Result<ClothGrid, RopeError> {
        cloth.validate()?;
        let (w, h) = (cloth.cols, cloth.rows);
        let s = cloth.spacing;

        let mut points = AllocVec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let offset = Vec2::new(F::from_f32(x as f32) * s, -F::from_f32(y as f32) * s);
                let pinned = y == 0 && cloth.pin_every.map_or(false, |n| x % n == 0);
                points.push(self.add_point(origin + offset, pinned));
            }
        }

        let idx = |x: usize, y: usize| points[y * w + x];
        for y in 0..h {
            for x in 0..w.saturating_sub(1) {
                self.link(idx(x, y), idx(x + 1, y), false)?;
            }
        }
        for y in 0..h.saturating_sub(1) {
            for x in 0..w {
                self.link(idx(x, y), idx(x, y + 1), false)?;
            }
        }
        if cloth.shear {
            for y in 0..h.saturating_sub(1) {
                for x in 0..w.saturating_sub(1) {
                    self.link(idx(x, y), idx(x + 1, y + 1), false)?;
                    self.link(idx(x + 1, y), idx(x, y + 1), false)?;
                }
            }
        }

        log::debug!("strand {}: wove {}x{} cloth", self.id, w, h);
        Ok(ClothGrid { cols: w, rows: h, points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_stick_count() {
        let (s, grid) = Strand::cloth(Vec2::new(0.0f32, 0.0), &ClothConfig::new(4, 3, 0.5), StrandConfig::new()).unwrap();
        assert_eq!(s.point_count(), 12);
        // (w-1)*h horizontal + w*(h-1) vertical.
        assert_eq!(s.stick_count(), 3 * 3 + 4 * 2);
        assert_eq!(grid.at(3, 2), grid.points().last().copied());
        assert!(grid.at(4, 0).is_none());
    }

    #[test]
    fn shear_adds_both_diagonals() {
        let cfg = ClothConfig::new(3, 3, 1.0f32).with_shear(true);
        let (s, _) = Strand::cloth(Vec2::zero(), &cfg, StrandConfig::new()).unwrap();
        assert_eq!(s.stick_count(), 2 * 3 + 3 * 2 + 2 * 2 * 2);
    }

    #[test]
    fn top_row_pins_follow_stride() {
        let cfg = ClothConfig::new(9, 2, 1.0f32);
        let (s, grid) = Strand::cloth(Vec2::zero(), &cfg, StrandConfig::new()).unwrap();
        let pinned: AllocVec<usize> = (0..9)
            .filter(|&x| s.point(grid.at(x, 0).unwrap()).unwrap().is_fixed())
            .collect();
        assert_eq!(pinned, [0, 4, 8]);
        assert!(!s.point(grid.at(0, 1).unwrap()).unwrap().is_fixed());
    }

    #[test]
    fn rows_hang_downward() {
        let cfg = ClothConfig::new(2, 2, 0.5f32);
        let (s, grid) = Strand::cloth(Vec2::new(1.0, 1.0), &cfg, StrandConfig::new()).unwrap();
        assert_eq!(s.point(grid.at(1, 1).unwrap()).unwrap().position(), Vec2::new(1.5, 0.5));
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let bad = [
            ClothConfig::new(0, 3, 1.0f32),
            ClothConfig::new(1, 1, 1.0),
            ClothConfig::new(3, 3, 0.0),
            ClothConfig::new(3, 3, 1.0).with_pin_every(Some(0)),
            ClothConfig::new(usize::MAX, 2, 1.0),
        ];
        for cfg in &bad {
            let err = Strand::cloth(Vec2::zero(), cfg, StrandConfig::new()).unwrap_err();
            assert_eq!(err, RopeError::InvalidClothDimensions);
        }
    }
}
