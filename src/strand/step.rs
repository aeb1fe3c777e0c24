//! The fixed-step pipeline of a strand.

use alloc::vec::Vec as AllocVec;
use core::ops::AddAssign;

use super::{Bounds, Strand};
use crate::collider::{Collider, ColliderKey};
use crate::config::StepParams;
use crate::float::Float;
use crate::observer::StepObserver;

/// What happened during one strand step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Point-vs-collider contacts resolved.
    pub contacts: usize,
    /// Sticks torn by over-stretching or a tearing collider.
    pub torn_sticks: usize,
    /// Sticks that left the simulation for any reason.
    pub removed_sticks: usize,
    /// Points that left the simulation, orphans included.
    pub removed_points: usize,
    /// Queued points that joined the active set.
    pub committed_points: usize,
    /// Queued sticks that joined the active set.
    pub committed_sticks: usize,
}

impl AddAssign for StepReport {
    fn add_assign(&mut self, rhs: Self) {
        self.contacts += rhs.contacts;
        self.torn_sticks += rhs.torn_sticks;
        self.removed_sticks += rhs.removed_sticks;
        self.removed_points += rhs.removed_points;
        self.committed_points += rhs.committed_points;
        self.committed_sticks += rhs.committed_sticks;
    }
}

impl<F: Float> Strand<F> {
    /// Advance the strand by one fixed step.
    ///
    /// Phases run in order: integrate, relax, stretch-tear, collide, commit,
    /// render, bounds. `colliders` is the caller's copy of the collider
    /// registry; dynamic colliders pushed by rope points are moved in place
    /// and the caller decides whether to write them back.
    pub fn simulate<O: StepObserver>(
        &mut self,
        params: &StepParams<F>,
        colliders: &mut [(ColliderKey, Collider<F>)],
        observer: &mut O,
    ) -> StepReport {
        let mut report = StepReport::default();

        self.integrate(params.gravity.scale(params.dt * params.dt));
        observer.on_integrate();

        for i in 0..params.iterations {
            self.relax();
            observer.on_constraint_iteration(i);
        }

        if let Some(tear_length) = params.tear_length {
            report.torn_sticks += self.tear_overstretched(tear_length);
        }

        self.collide(colliders, observer, &mut report);

        self.commit(observer, &mut report);
        observer.on_commit();

        self.update_visuals();
        observer.on_render();

        self.recompute_bounds();
        observer.on_step_complete();

        if report != StepReport::default() {
            log::trace!("strand {}: {:?}", self.id, report);
        }
        report
    }

    fn integrate(&mut self, gravity_step: crate::vec::Vec2<F>) {
        for (_, p) in self.points.iter_mut() {
            if p.pending || p.marked {
                continue;
            }
            p.integrate(gravity_step);
        }
    }

    /// One Gauss-Seidel pass over every active stick. Each stick sees the
    /// corrections of the sticks before it, so this converges toward the
    /// rest lengths rather than solving them exactly.
    fn relax(&mut self) {
        for (_, stick) in self.sticks.iter() {
            if stick.pending || stick.marked {
                continue;
            }
            if let (Some(a), Some(b)) = self.points.get2_mut(stick.a.index, stick.b.index) {
                stick.relax(a, b);
            }
        }
    }

    fn tear_overstretched(&mut self, tear_length: F) -> usize {
        let mut torn = 0;
        for (_, stick) in self.sticks.iter_mut() {
            if stick.pending || stick.marked {
                continue;
            }
            let (Some(a), Some(b)) = (self.points.get(stick.a.index), self.points.get(stick.b.index)) else {
                continue;
            };
            if stick.extension(a, b) > tear_length {
                stick.marked = true;
                torn += 1;
            }
        }
        torn
    }

    /// Purge marked sticks and points, prune orphans, then admit the
    /// pending set unless an authoring batch is still open.
    fn commit<O: StepObserver>(&mut self, observer: &mut O, report: &mut StepReport) {
        // A marked point takes all of its sticks with it.
        for (_, point) in self.points.iter() {
            if !point.marked {
                continue;
            }
            for s in &point.sticks {
                if let Some(stick) = self.sticks.get_mut(s.index) {
                    stick.marked = true;
                }
            }
        }

        let doomed_sticks: AllocVec<_> = self
            .sticks
            .iter()
            .filter(|(_, s)| s.marked)
            .map(|(i, _)| i)
            .collect();
        for index in doomed_sticks {
            let Some(stick) = self.sticks.remove(index) else { continue };
            let key = self.stick_key(index);
            if let Some(a) = self.points.get_mut(stick.a.index) {
                a.disconnect(key);
            }
            if let Some(b) = self.points.get_mut(stick.b.index) {
                b.disconnect(key);
            }
            observer.on_stick_removed(key);
            report.removed_sticks += 1;
        }

        for (_, point) in self.points.iter_mut() {
            if !point.pending && !point.is_connected_to_any_stick() {
                point.marked = true;
            }
        }

        let doomed_points: AllocVec<_> = self
            .points
            .iter()
            .filter(|(_, p)| p.marked)
            .map(|(i, _)| i)
            .collect();
        for index in doomed_points {
            if self.points.remove(index).is_some() {
                observer.on_point_removed(self.point_key(index));
                report.removed_points += 1;
            }
        }

        if self.batch_open {
            return;
        }
        for (_, point) in self.points.iter_mut() {
            if point.pending {
                point.pending = false;
                report.committed_points += 1;
            }
        }
        for (_, stick) in self.sticks.iter_mut() {
            if stick.pending {
                stick.pending = false;
                report.committed_sticks += 1;
            }
        }
    }

    fn update_visuals(&mut self) {
        for (_, p) in self.points.iter_mut() {
            p.render_pos = p.current;
        }
        for (_, stick) in self.sticks.iter_mut() {
            if let (Some(a), Some(b)) = (self.points.get(stick.a.index), self.points.get(stick.b.index)) {
                stick.update_visual(a, b);
            }
        }
    }

    fn recompute_bounds(&mut self) {
        self.bounds = self
            .points
            .iter()
            .filter(|(_, p)| !p.pending)
            .map(|(_, p)| p.current)
            .fold(None, |acc: Option<Bounds<F>>, pos| {
                Some(match acc {
                    Some(b) => Bounds { min: b.min.min(pos), max: b.max.max(pos) },
                    None => Bounds { min: pos, max: pos },
                })
            });
    }
}
