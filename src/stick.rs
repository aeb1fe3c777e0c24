//! Sticks: distance constraints between two points of the same strand.

use crate::float::Float;
use crate::point::Point;
use crate::strand::PointKey;
use crate::vec::Vec2;

/// A distance constraint with a rest length fixed at construction.
#[derive(Clone, Debug)]
pub struct Stick<F: Float> {
    pub(crate) a: PointKey,
    pub(crate) b: PointKey,
    rest_length: F,
    pub(crate) pending: bool,
    pub(crate) marked: bool,
    render_segment: [Vec2<F>; 2],
}

impl<F: Float> Stick<F> {
    /// `rest_length` is the endpoints' distance right now and never changes.
    pub fn new(a: PointKey, b: PointKey, point_a: &Point<F>, point_b: &Point<F>) -> Self {
        Stick {
            a,
            b,
            rest_length: point_a.current.distance(point_b.current),
            pending: false,
            marked: false,
            render_segment: [point_a.current, point_b.current],
        }
    }

    pub fn point_a(&self) -> PointKey {
        self.a
    }

    pub fn point_b(&self) -> PointKey {
        self.b
    }

    pub fn rest_length(&self) -> F {
        self.rest_length
    }

    pub fn connects(&self, p: PointKey, q: PointKey) -> bool {
        (self.a == p && self.b == q) || (self.a == q && self.b == p)
    }

    /// The endpoint that is not `p`, if `p` is an endpoint at all.
    pub fn other(&self, p: PointKey) -> Option<PointKey> {
        if self.a == p {
            Some(self.b)
        } else if self.b == p {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Endpoints as of the last render phase.
    pub fn render_segment(&self) -> [Vec2<F>; 2] {
        self.render_segment
    }

    /// Recompute the cosmetic segment from the endpoints' positions.
    pub fn update_visual(&mut self, point_a: &Point<F>, point_b: &Point<F>) {
        self.render_segment = [point_a.current, point_b.current];
    }

    /// One relaxation of this constraint.
    ///
    /// Each endpoint takes half of the length error along the stick
    /// direction; a fixed endpoint ignores its half. Coincident endpoints
    /// have no direction and are left alone this pass.
    pub fn relax(&self, point_a: &mut Point<F>, point_b: &mut Point<F>) {
        let delta = point_a.current - point_b.current;
        let Some(direction) = delta.try_normalize() else {
            return;
        };
        let difference = self.rest_length - delta.length();
        let correction = direction.scale(difference * F::half());
        point_a.nudge(correction);
        point_b.nudge(-correction);
    }

    /// How far the stick is stretched past its rest length (negative when
    /// compressed).
    pub fn extension(&self, point_a: &Point<F>, point_b: &Point<F>) -> F {
        point_a.current.distance(point_b.current) - self.rest_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strand::Strand;

    fn pair(a: Vec2<f32>, b: Vec2<f32>) -> (Strand<f32>, PointKey, PointKey) {
        let mut strand = Strand::new(Default::default());
        let pa = strand.add_point(a, false);
        let pb = strand.add_point(b, false);
        (strand, pa, pb)
    }

    #[test]
    fn rest_length_taken_at_construction() {
        let (strand, pa, pb) = pair(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        let stick = Stick::new(pa, pb, strand.point(pa).unwrap(), strand.point(pb).unwrap());
        assert_eq!(stick.rest_length(), 5.0);
    }

    #[test]
    fn relax_splits_correction_evenly() {
        let mut a = Point::new(Vec2::new(0.0f32, 0.0), false);
        let mut b = Point::new(Vec2::new(2.0f32, 0.0), false);
        let (_strand, pa, pb) = pair(a.current, b.current);
        let mut stick = Stick::new(pa, pb, &a, &b);
        stick.rest_length = 1.0;
        stick.relax(&mut a, &mut b);
        assert!((a.current.x - 0.5).abs() < 1e-6);
        assert!((b.current.x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn relax_skips_coincident_points() {
        let mut a = Point::new(Vec2::new(1.0f32, 1.0), false);
        let mut b = Point::new(Vec2::new(1.0f32, 1.0), false);
        let (_strand, pa, pb) = pair(a.current, b.current);
        let stick = Stick::new(pa, pb, &a, &b);
        stick.relax(&mut a, &mut b);
        assert!(a.current.is_finite() && b.current.is_finite());
        assert_eq!(a.current, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn fixed_endpoint_takes_no_correction() {
        let mut a = Point::new(Vec2::new(0.0f32, 0.0), true);
        let mut b = Point::new(Vec2::new(2.0f32, 0.0), false);
        let (_strand, pa, pb) = pair(a.current, b.current);
        let mut stick = Stick::new(pa, pb, &a, &b);
        stick.rest_length = 1.0;
        stick.relax(&mut a, &mut b);
        assert_eq!(a.current, Vec2::new(0.0, 0.0));
        assert!((b.current.x - 1.5).abs() < 1e-6);
    }
}
