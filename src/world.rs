//! The simulation world: registered strands, colliders, and the fixed tick.

use alloc::vec::Vec as AllocVec;
use thunderdome as td;

use crate::collider::{Collider, ColliderKey, ColliderSet};
use crate::config::{SimulationConfig, StepParams};
use crate::error::RopeError;
use crate::float::Float;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::sat::SatEngine;
use crate::strand::{PointKey, StepReport, Strand, StrandId};
use crate::vec::Vec2;

/// Key type to look up a strand registered with the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StrandKey(td::Index);

/// Owns every strand and collider and drives them with a fixed timestep.
///
/// # Example
/// ```
/// use tautline::{Collider, SimulationConfig, Strand, StrandConfig, Vec2, World};
///
/// let mut world: World<f32> = World::new(SimulationConfig::new());
/// world.add_collider(Collider::cuboid(Vec2::new(0.0, -1.0), Vec2::new(10.0, 2.0)));
///
/// let rope = Strand::from_path(
///     &[Vec2::new(0.0, 3.0), Vec2::new(2.0, 3.0)],
///     StrandConfig::new(),
///     true,
/// ).unwrap();
/// let key = world.register_strand(rope);
///
/// world.update(1.0 / 60.0);
/// assert!(world.strand(key).unwrap().point_count() > 0);
/// ```
pub struct World<F: Float> {
    config: SimulationConfig<F>,
    strands: td::Arena<Strand<F>>,
    order: AllocVec<StrandKey>,
    colliders: ColliderSet<F>,
    sat: SatEngine,
    accumulator: F,
}

impl<F: Float> World<F> {
    pub fn new(config: SimulationConfig<F>) -> Self {
        World {
            config,
            strands: td::Arena::new(),
            order: AllocVec::new(),
            colliders: ColliderSet::new(),
            sat: SatEngine::new(),
            accumulator: F::zero(),
        }
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    pub fn set_gravity(&mut self, gravity: Vec2<F>) {
        self.config.gravity = gravity;
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.config.iterations = iterations;
    }

    pub fn set_tear_length(&mut self, tear_length: Option<F>) {
        self.config.tear_length = tear_length;
    }

    pub fn set_simulating(&mut self, simulating: bool) {
        self.config.simulating = simulating;
    }

    /// Flip the simulation flag and return the new state.
    pub fn toggle_simulation(&mut self) -> bool {
        self.config.simulating = !self.config.simulating;
        self.config.simulating
    }

    pub fn is_simulating(&self) -> bool {
        self.config.simulating
    }

    // ---- strands ----

    pub fn register_strand(&mut self, strand: Strand<F>) -> StrandKey {
        let id = strand.id();
        let key = StrandKey(self.strands.insert(strand));
        self.order.push(key);
        log::debug!("world: registered strand {} ({} total)", id, self.order.len());
        key
    }

    /// Take a strand out of the world. Its points and sticks go with it.
    pub fn unregister_strand(&mut self, key: StrandKey) -> Result<Strand<F>, RopeError> {
        let strand = self.strands.remove(key.0).ok_or(RopeError::UnknownStrand)?;
        self.order.retain(|k| *k != key);
        log::debug!("world: unregistered strand {}", strand.id());
        Ok(strand)
    }

    pub fn strand(&self, key: StrandKey) -> Option<&Strand<F>> {
        self.strands.get(key.0)
    }

    pub fn strand_mut(&mut self, key: StrandKey) -> Option<&mut Strand<F>> {
        self.strands.get_mut(key.0)
    }

    /// Registered strands in registration order.
    pub fn strands(&self) -> impl Iterator<Item = (StrandKey, &Strand<F>)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.strands.get(key.0).map(|s| (key, s)))
    }

    pub fn strand_count(&self) -> usize {
        self.order.len()
    }

    /// The registered strand that issued `point`.
    pub fn strand_of(&self, point: PointKey) -> Option<StrandKey> {
        self.find_strand(point.strand())
    }

    fn find_strand(&self, id: StrandId) -> Option<StrandKey> {
        self.strands().find(|(_, s)| s.id() == id).map(|(key, _)| key)
    }

    // ---- colliders ----

    pub fn add_collider(&mut self, collider: Collider<F>) -> ColliderKey {
        let key = self.colliders.insert(collider);
        log::debug!("world: added collider ({} total)", self.colliders.len());
        key
    }

    pub fn remove_collider(&mut self, key: ColliderKey) -> Result<Collider<F>, RopeError> {
        let collider = self.colliders.remove(key)?;
        log::debug!("world: removed collider ({} left)", self.colliders.len());
        Ok(collider)
    }

    pub fn collider(&self, key: ColliderKey) -> Option<&Collider<F>> {
        self.colliders.get(key)
    }

    /// Mutable access so the host can move a collider between steps.
    pub fn collider_mut(&mut self, key: ColliderKey) -> Option<&mut Collider<F>> {
        self.colliders.get_mut(key)
    }

    /// Copy of every registered collider in registration order.
    pub fn colliders(&self) -> AllocVec<(ColliderKey, Collider<F>)> {
        self.colliders.snapshot()
    }

    pub fn collider_set(&self) -> &ColliderSet<F> {
        &self.colliders
    }

    // ---- stepping ----

    /// Advance every strand by one fixed step.
    pub fn step(&mut self) -> StepReport {
        self.step_with(&mut NoOpStepObserver)
    }

    /// Advance every strand by one fixed step, reporting to `observer`.
    ///
    /// Strands run in registration order. Each sees a fresh copy of the
    /// colliders, and dynamic colliders it pushed are written back before
    /// the next strand runs. Does nothing while the simulation is paused.
    pub fn step_with<O: StepObserver>(&mut self, observer: &mut O) -> StepReport {
        let mut total = StepReport::default();
        if !self.config.simulating {
            return total;
        }

        let params = StepParams::from(&self.config);
        for &key in &self.order {
            let Some(strand) = self.strands.get_mut(key.0) else { continue };
            let mut snapshot = self.colliders.snapshot();
            total += strand.simulate(&params, &mut snapshot, observer);
            self.colliders.write_back(&snapshot);
        }
        total
    }

    /// One separating-axis pass over the registered colliders.
    pub fn resolve_colliders(&mut self) -> usize {
        self.resolve_colliders_with(&mut NoOpStepObserver)
    }

    pub fn resolve_colliders_with<O: StepObserver>(&mut self, observer: &mut O) -> usize {
        self.sat.resolve(&mut self.colliders, observer)
    }

    /// Feed one rendered frame of `frame_dt` seconds.
    ///
    /// Runs as many fixed steps as the accumulated time allows, at most
    /// `max_steps_per_frame`, then one collider pass. Time left over past
    /// the cap is discarded. Returns the number of fixed steps taken.
    pub fn update(&mut self, frame_dt: F) -> usize {
        self.update_with(frame_dt, &mut NoOpStepObserver)
    }

    pub fn update_with<O: StepObserver>(&mut self, frame_dt: F, observer: &mut O) -> usize {
        let fixed_dt = self.config.fixed_dt;
        let max_steps = self.config.max_steps_per_frame.max(1);
        let mut steps = 0;

        if !self.config.simulating || !(fixed_dt > F::zero()) {
            self.accumulator = F::zero();
        } else {
            let cap = fixed_dt * F::from_f32((max_steps + 1) as f32);
            let frame_dt = if frame_dt.is_finite() { frame_dt.clamp(F::zero(), cap) } else { F::zero() };
            self.accumulator = self.accumulator + frame_dt;

            while self.accumulator >= fixed_dt && steps < max_steps {
                self.step_with(observer);
                self.accumulator = self.accumulator - fixed_dt;
                steps += 1;
            }
            // Drop the backlog rather than spiral on slow frames.
            if self.accumulator >= fixed_dt {
                log::trace!("world: dropped {} of unsimulated time", self.accumulator);
                self.accumulator = F::zero();
            }
        }

        self.resolve_colliders_with(observer);
        steps
    }

    /// Leftover time not yet consumed by a fixed step.
    pub fn accumulated_time(&self) -> F {
        self.accumulator
    }

    // ---- queries ----

    /// The closest point under `pos` across all strands, first strand wins ties.
    pub fn pick_point(&self, pos: Vec2<F>) -> Option<(StrandKey, PointKey)> {
        self.strands()
            .filter_map(|(key, s)| {
                let point = s.pick_point(pos)?;
                let d = s.point(point)?.position().distance_sq(pos);
                Some((key, point, d))
            })
            .fold(None, |best: Option<(StrandKey, PointKey, F)>, candidate| match best {
                Some(b) if b.2 <= candidate.2 => Some(b),
                _ => Some(candidate),
            })
            .map(|(key, point, _)| (key, point))
    }

    /// Whether `point` lives in `strand` and still hangs on a stick.
    pub fn is_point_connected(&self, strand: StrandKey, point: PointKey) -> Result<bool, RopeError> {
        let s = self.strand(strand).ok_or(RopeError::UnknownStrand)?;
        if point.strand() != s.id() {
            return Err(RopeError::ForeignPoint { expected: s.id(), found: point.strand() });
        }
        Ok(s.is_connected(point))
    }

    /// Cut every stick within `radius` of `pos`. The cut sticks leave at
    /// the next step's commit. Returns how many were cut.
    pub fn tear_at(&mut self, pos: Vec2<F>, radius: F) -> usize {
        let mut cut = 0;
        for &key in &self.order {
            if let Some(strand) = self.strands.get_mut(key.0) {
                cut += strand.tear_near(pos, radius);
            }
        }
        if cut > 0 {
            log::debug!("world: tore {} sticks", cut);
        }
        cut
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrandConfig;

    fn rope(y: f32) -> Strand<f32> {
        Strand::from_path(&[Vec2::new(0.0, y), Vec2::new(1.0, y)], StrandConfig::new(), true).unwrap()
    }

    #[test]
    fn strands_iterate_in_registration_order() {
        let mut world: World<f32> = World::default();
        let a = world.register_strand(rope(0.0));
        let b = world.register_strand(rope(1.0));
        let c = world.register_strand(rope(2.0));
        world.unregister_strand(b).unwrap();
        let d = world.register_strand(rope(3.0));
        let keys: AllocVec<_> = world.strands().map(|(k, _)| k).collect();
        assert_eq!(keys, [a, c, d]);
        assert_eq!(world.unregister_strand(b).unwrap_err(), RopeError::UnknownStrand);
    }

    #[test]
    fn paused_world_does_not_move() {
        let mut world: World<f32> = World::default();
        let key = world.register_strand(rope(0.0));
        let before = world.strand(key).unwrap().positions();
        assert!(!world.toggle_simulation());
        assert_eq!(world.step(), StepReport::default());
        assert_eq!(world.update(0.5), 0);
        assert_eq!(world.strand(key).unwrap().positions(), before);
    }

    #[test]
    fn accumulator_runs_whole_steps_only() {
        let mut world: World<f32> = World::new(SimulationConfig::new().with_fixed_dt(0.02));
        world.register_strand(rope(0.0));
        assert_eq!(world.update(0.01), 0);
        assert_eq!(world.update(0.015), 1);
        assert!((world.accumulated_time() - 0.005).abs() < 1e-6);
    }

    #[test]
    fn accumulator_is_capped_per_frame() {
        let config = SimulationConfig::new().with_fixed_dt(0.02).with_max_steps_per_frame(3);
        let mut world: World<f32> = World::new(config);
        world.register_strand(rope(0.0));
        assert_eq!(world.update(10.0), 3);
        assert!(world.accumulated_time() < 0.02);
    }

    #[test]
    fn picking_and_connection_queries() {
        let mut world: World<f32> = World::default();
        let key = world.register_strand(rope(0.0));
        let (picked_strand, point) = world.pick_point(Vec2::new(0.26, 0.01)).unwrap();
        assert_eq!(picked_strand, key);
        assert_eq!(world.strand_of(point), Some(key));
        assert_eq!(world.is_point_connected(key, point), Ok(true));

        let other = world.register_strand(rope(5.0));
        assert!(matches!(
            world.is_point_connected(other, point),
            Err(RopeError::ForeignPoint { .. })
        ));
    }

    #[test]
    fn tear_at_cuts_on_next_step() {
        let mut world: World<f32> = World::default();
        let key = world.register_strand(rope(0.0));
        assert_eq!(world.tear_at(Vec2::new(0.6, 0.0), 0.05), 1);
        assert_eq!(world.strand(key).unwrap().stick_count(), 4);
        let report = world.step();
        assert_eq!(report.removed_sticks, 1);
        assert_eq!(world.strand(key).unwrap().stick_count(), 3);
    }
}
