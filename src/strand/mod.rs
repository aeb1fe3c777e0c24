//! Strands: one connected rope, cloth, or path-derived simulation unit.
//!
//! A strand owns its points and sticks. Handles into a strand carry the
//! strand's [`StrandId`], so a handle from another strand is rejected
//! instead of silently aliasing a slot here.
//!
//! Topology edits come in two flavours:
//! - eager (`add_point`, `add_stick`): the item joins the active set now;
//! - queued (`queue_point`, `queue_stick`): the item waits in the pending
//!   set and joins at the end of the next step, or at the end of the step
//!   after `end_batch` when an authoring batch is open.
//!
//! Removals only mark items; they leave the arenas during the commit phase
//! of the next step.

mod cloth;
mod collide;
mod path;
mod step;

use alloc::vec::Vec as AllocVec;
use core::fmt;
use portable_atomic::{AtomicU32, Ordering};
use thunderdome as td;

use crate::config::StrandConfig;
use crate::error::RopeError;
use crate::float::Float;
use crate::point::Point;
use crate::stick::Stick;
use crate::vec::Vec2;

pub use cloth::{ClothConfig, ClothGrid};
pub use step::StepReport;

static NEXT_STRAND_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a strand, embedded in every point and stick handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrandId(u32);

impl StrandId {
    fn next() -> Self {
        StrandId(NEXT_STRAND_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a point owned by a strand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointKey {
    strand: StrandId,
    index: td::Index,
}

impl PointKey {
    pub fn strand(&self) -> StrandId {
        self.strand
    }
}

/// Handle to a stick owned by a strand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StickKey {
    strand: StrandId,
    index: td::Index,
}

impl StickKey {
    pub fn strand(&self) -> StrandId {
        self.strand
    }
}

/// Axis-aligned bounds of a strand's active points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Bounds<F> {
    pub fn contains(&self, p: Vec2<F>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn size(&self) -> Vec2<F> {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2<F> {
        (self.min + self.max).scale(F::half())
    }
}

/// A rope, cloth, or any other connected set of points and sticks.
pub struct Strand<F: Float> {
    id: StrandId,
    config: StrandConfig<F>,
    points: td::Arena<Point<F>>,
    sticks: td::Arena<Stick<F>>,
    batch_open: bool,
    bounds: Option<Bounds<F>>,
    scratch: AllocVec<td::Index>,
}

impl<F: Float> Strand<F> {
    pub fn new(config: StrandConfig<F>) -> Self {
        Strand {
            id: StrandId::next(),
            config,
            points: td::Arena::new(),
            sticks: td::Arena::new(),
            batch_open: false,
            bounds: None,
            scratch: AllocVec::new(),
        }
    }

    pub fn id(&self) -> StrandId {
        self.id
    }

    pub fn config(&self) -> &StrandConfig<F> {
        &self.config
    }

    pub fn point_radius(&self) -> F {
        self.config.point_radius
    }

    fn point_key(&self, index: td::Index) -> PointKey {
        PointKey { strand: self.id, index }
    }

    fn stick_key(&self, index: td::Index) -> StickKey {
        StickKey { strand: self.id, index }
    }

    fn check_point(&self, key: PointKey) -> Result<td::Index, RopeError> {
        if key.strand != self.id {
            return Err(RopeError::ForeignPoint { expected: self.id, found: key.strand });
        }
        if !self.points.contains(key.index) {
            return Err(RopeError::UnknownPoint);
        }
        Ok(key.index)
    }

    fn check_stick(&self, key: StickKey) -> Result<td::Index, RopeError> {
        if key.strand != self.id {
            return Err(RopeError::ForeignStick { expected: self.id, found: key.strand });
        }
        if !self.sticks.contains(key.index) {
            return Err(RopeError::UnknownStick);
        }
        Ok(key.index)
    }

    // ---- creation ----

    /// Insert a point straight into the active set.
    pub fn add_point(&mut self, pos: Vec2<F>, fixed: bool) -> PointKey {
        let index = self.points.insert(Point::new(pos, fixed));
        self.point_key(index)
    }

    /// Insert a point into the pending set; it joins at the next commit.
    pub fn queue_point(&mut self, pos: Vec2<F>, fixed: bool) -> PointKey {
        let mut point = Point::new(pos, fixed);
        point.pending = true;
        let index = self.points.insert(point);
        self.point_key(index)
    }

    /// Link two points. Linking an already linked pair returns the existing
    /// stick. A stick touching a pending point is pending as well.
    pub fn add_stick(&mut self, a: PointKey, b: PointKey) -> Result<StickKey, RopeError> {
        self.link(a, b, false)
    }

    /// Link two points through the pending set.
    pub fn queue_stick(&mut self, a: PointKey, b: PointKey) -> Result<StickKey, RopeError> {
        self.link(a, b, true)
    }

    fn link(&mut self, a: PointKey, b: PointKey, queued: bool) -> Result<StickKey, RopeError> {
        let ia = self.check_point(a)?;
        let ib = self.check_point(b)?;
        if ia == ib {
            return Err(RopeError::SelfLink);
        }

        if let Some(existing) = self.existing_stick(a, b) {
            return Ok(existing);
        }

        let (pa, pb) = match self.points.get2_mut(ia, ib) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => return Err(RopeError::UnknownPoint),
        };
        let mut stick = Stick::new(a, b, pa, pb);
        stick.pending = queued || pa.pending || pb.pending;
        let pending = stick.pending;

        let key = StickKey { strand: self.id, index: self.sticks.insert(stick) };
        pa.connect(key);
        pb.connect(key);
        log::trace!("strand {}: linked stick (pending: {})", self.id, pending);
        Ok(key)
    }

    fn existing_stick(&self, a: PointKey, b: PointKey) -> Option<StickKey> {
        let point = self.points.get(a.index)?;
        point.sticks.iter().copied().find(|s| {
            self.sticks
                .get(s.index)
                .map_or(false, |stick| !stick.marked && stick.connects(a, b))
        })
    }

    /// Hold queued items in the pending set until [`Strand::end_batch`],
    /// so a half-drawn rope never simulates.
    pub fn begin_batch(&mut self) {
        self.batch_open = true;
    }

    /// Release the pending set; it joins at the end of the next step.
    pub fn end_batch(&mut self) {
        self.batch_open = false;
    }

    pub fn is_batch_open(&self) -> bool {
        self.batch_open
    }

    // ---- removal ----

    /// Schedule a stick for removal at the next commit.
    pub fn remove_stick(&mut self, key: StickKey) -> Result<(), RopeError> {
        let index = self.check_stick(key)?;
        if let Some(stick) = self.sticks.get_mut(index) {
            stick.marked = true;
        }
        Ok(())
    }

    /// Schedule a point and every stick touching it for removal.
    pub fn remove_point(&mut self, key: PointKey) -> Result<(), RopeError> {
        let index = self.check_point(key)?;
        if let Some(point) = self.points.get_mut(index) {
            point.marked = true;
            for s in &point.sticks {
                if let Some(stick) = self.sticks.get_mut(s.index) {
                    stick.marked = true;
                }
            }
        }
        Ok(())
    }

    /// Drop every point and stick immediately.
    pub fn clear(&mut self) {
        log::debug!(
            "strand {}: cleared {} points, {} sticks",
            self.id,
            self.points.len(),
            self.sticks.len()
        );
        self.points.clear();
        self.sticks.clear();
        self.bounds = None;
    }

    // ---- queries ----

    pub fn point(&self, key: PointKey) -> Option<&Point<F>> {
        let index = self.check_point(key).ok()?;
        self.points.get(index)
    }

    /// Mutable point access for dragging, pinning, or teleporting.
    pub fn point_mut(&mut self, key: PointKey) -> Option<&mut Point<F>> {
        let index = self.check_point(key).ok()?;
        self.points.get_mut(index)
    }

    pub fn stick(&self, key: StickKey) -> Option<&Stick<F>> {
        let index = self.check_stick(key).ok()?;
        self.sticks.get(index)
    }

    pub fn contains_point(&self, key: PointKey) -> bool {
        self.check_point(key).is_ok()
    }

    pub fn contains_stick(&self, key: StickKey) -> bool {
        self.check_stick(key).is_ok()
    }

    /// Whether the point still belongs to this strand and hangs on at least
    /// one stick. Used for interactive picking.
    pub fn is_connected(&self, key: PointKey) -> bool {
        self.point(key).map_or(false, Point::is_connected_to_any_stick)
    }

    /// Active points (committed, possibly marked for removal).
    pub fn points(&self) -> impl Iterator<Item = (PointKey, &Point<F>)> + '_ {
        self.points
            .iter()
            .filter(|(_, p)| !p.pending)
            .map(move |(i, p)| (self.point_key(i), p))
    }

    /// Active sticks.
    pub fn sticks(&self) -> impl Iterator<Item = (StickKey, &Stick<F>)> + '_ {
        self.sticks
            .iter()
            .filter(|(_, s)| !s.pending)
            .map(move |(i, s)| (self.stick_key(i), s))
    }

    pub fn point_count(&self) -> usize {
        self.points.iter().filter(|(_, p)| !p.pending).count()
    }

    pub fn stick_count(&self) -> usize {
        self.sticks.iter().filter(|(_, s)| !s.pending).count()
    }

    pub fn pending_point_count(&self) -> usize {
        self.points.len() - self.point_count()
    }

    pub fn pending_stick_count(&self) -> usize {
        self.sticks.len() - self.stick_count()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current positions of active points.
    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.points().map(|(_, p)| p.current).collect()
    }

    /// Current segments of active sticks.
    pub fn segments(&self) -> AllocVec<[Vec2<F>; 2]> {
        self.sticks()
            .filter_map(|(_, s)| {
                let a = self.points.get(s.a.index)?;
                let b = self.points.get(s.b.index)?;
                Some([a.current, b.current])
            })
            .collect()
    }

    /// Bounds of the active points as of the last step.
    pub fn bounds(&self) -> Option<Bounds<F>> {
        self.bounds
    }

    /// The active point closest to `pos` within the point radius.
    pub fn pick_point(&self, pos: Vec2<F>) -> Option<PointKey> {
        let radius_sq = self.config.point_radius * self.config.point_radius;
        self.points()
            .map(|(key, p)| (key, p.current.distance_sq(pos)))
            .filter(|&(_, d)| d < radius_sq)
            .fold(None, |best: Option<(PointKey, F)>, (key, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((key, d)),
            })
            .map(|(key, _)| key)
    }

    /// Active sticks passing within `radius` of `pos`.
    pub fn sticks_near(&self, pos: Vec2<F>, radius: F) -> AllocVec<StickKey> {
        self.sticks()
            .filter(|(_, s)| {
                match (self.points.get(s.a.index), self.points.get(s.b.index)) {
                    (Some(a), Some(b)) => pos.distance_to_segment(a.current, b.current) < radius,
                    _ => false,
                }
            })
            .map(|(key, _)| key)
            .collect()
    }

    /// Mark every stick within `radius` of `pos` for removal. Returns how
    /// many sticks were newly marked.
    pub fn tear_near(&mut self, pos: Vec2<F>, radius: F) -> usize {
        let doomed = self.sticks_near(pos, radius);
        let mut count = 0;
        for key in doomed {
            if let Some(stick) = self.sticks.get_mut(key.index) {
                if !stick.marked {
                    stick.marked = true;
                    count += 1;
                }
            }
        }
        count
    }
}

impl<F: Float> fmt::Debug for Strand<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strand")
            .field("id", &self.id)
            .field("points", &self.points.len())
            .field("sticks", &self.sticks.len())
            .field("batch_open", &self.batch_open)
            .field("bounds", &self.bounds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strand() -> Strand<f32> {
        Strand::new(StrandConfig::new())
    }

    #[test]
    fn strand_ids_are_unique_and_rising() {
        let (a, b) = (strand(), strand());
        assert!(b.id() > a.id());
    }

    #[test]
    fn duplicate_link_returns_same_stick() {
        let mut s = strand();
        let a = s.add_point(Vec2::new(0.0, 0.0), false);
        let b = s.add_point(Vec2::new(1.0, 0.0), false);
        let first = s.add_stick(a, b).unwrap();
        let second = s.add_stick(b, a).unwrap();
        assert_eq!(first, second);
        assert_eq!(s.stick_count(), 1);
        assert_eq!(s.point(a).unwrap().connected_sticks().len(), 1);
    }

    #[test]
    fn self_link_is_rejected() {
        let mut s = strand();
        let a = s.add_point(Vec2::new(0.0, 0.0), false);
        assert_eq!(s.add_stick(a, a), Err(RopeError::SelfLink));
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut s = strand();
        let mut other = strand();
        let a = s.add_point(Vec2::new(0.0, 0.0), false);
        let x = other.add_point(Vec2::new(1.0, 0.0), false);
        assert_eq!(
            s.add_stick(a, x),
            Err(RopeError::ForeignPoint { expected: s.id(), found: other.id() })
        );
        assert!(s.point(x).is_none());
        assert!(matches!(s.remove_point(x), Err(RopeError::ForeignPoint { .. })));
    }

    #[test]
    fn stick_touching_pending_point_is_pending() {
        let mut s = strand();
        let a = s.add_point(Vec2::new(0.0, 0.0), true);
        let b = s.queue_point(Vec2::new(1.0, 0.0), false);
        let stick = s.add_stick(a, b).unwrap();
        assert!(s.stick(stick).unwrap().is_pending());
        assert_eq!(s.point_count(), 1);
        assert_eq!(s.pending_point_count(), 1);
        assert_eq!(s.pending_stick_count(), 1);
    }

    #[test]
    fn pick_point_prefers_nearest_within_radius() {
        let mut s = strand();
        let _far = s.add_point(Vec2::new(0.0, 0.0), false);
        let near = s.add_point(Vec2::new(0.15, 0.0), false);
        assert_eq!(s.pick_point(Vec2::new(0.12, 0.0)), Some(near));
        assert_eq!(s.pick_point(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn tear_near_marks_crossing_sticks() {
        let mut s = strand();
        let a = s.add_point(Vec2::new(-1.0, 0.0), false);
        let b = s.add_point(Vec2::new(1.0, 0.0), false);
        let c = s.add_point(Vec2::new(1.0, 5.0), false);
        let ab = s.add_stick(a, b).unwrap();
        let bc = s.add_stick(b, c).unwrap();
        assert_eq!(s.tear_near(Vec2::new(0.0, 0.1), 0.25), 1);
        assert!(s.stick(ab).unwrap().is_marked());
        assert!(!s.stick(bc).unwrap().is_marked());
    }
}
