//! Step observer trait for monitoring simulation progress.

use crate::collider::ColliderKey;
use crate::strand::{PointKey, StickKey};

/// Trait for observing strand steps and rigid collision passes.
///
/// Implement this trait to drive visuals, debugging overlays, or
/// profiling. All methods have default no-op implementations.
pub trait StepObserver {
    /// Called after all active points have been integrated (Verlet step).
    fn on_integrate(&mut self) {}

    /// Called after each constraint relaxation iteration.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called when a rope point is pushed out of a collider.
    fn on_contact(&mut self, _point: PointKey, _collider: ColliderKey) {}

    /// Called when a stick leaves the simulation (torn or removed).
    fn on_stick_removed(&mut self, _stick: StickKey) {}

    /// Called when a point leaves the simulation (removed or orphaned).
    fn on_point_removed(&mut self, _point: PointKey) {}

    /// Called after removals and queued additions have been committed.
    fn on_commit(&mut self) {}

    /// Called after render positions have been refreshed.
    fn on_render(&mut self) {}

    /// Called when a strand step is fully complete.
    fn on_step_complete(&mut self) {}

    /// Called for each overlapping rigid pair resolved by the SAT engine.
    fn on_rigid_contact(&mut self, _a: ColliderKey, _b: ColliderKey) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
