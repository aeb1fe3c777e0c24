//! Verlet points: the mass nodes of a strand.

use alloc::vec::Vec as AllocVec;

use crate::float::Float;
use crate::strand::StickKey;
use crate::vec::Vec2;

/// A Verlet point with implicit velocity.
///
/// Velocity is never stored: it is `current - prev`. Collision response
/// rewrites `prev` so the next integration reflects friction and bounce.
#[derive(Clone, Debug)]
pub struct Point<F: Float> {
    pub(crate) current: Vec2<F>,
    pub(crate) prev: Vec2<F>,
    pub(crate) fixed: bool,
    pub(crate) sticks: AllocVec<StickKey>,
    pub(crate) pending: bool,
    pub(crate) marked: bool,
    pub(crate) render_pos: Vec2<F>,
}

impl<F: Float> Point<F> {
    pub fn new(pos: Vec2<F>, fixed: bool) -> Self {
        Point {
            current: pos,
            prev: pos,
            fixed,
            sticks: AllocVec::new(),
            pending: false,
            marked: false,
            render_pos: pos,
        }
    }

    pub fn position(&self) -> Vec2<F> {
        self.current
    }

    pub fn prev_position(&self) -> Vec2<F> {
        self.prev
    }

    /// Per-step displacement, the Verlet stand-in for velocity.
    pub fn velocity_raw(&self) -> Vec2<F> {
        self.current - self.prev
    }

    /// Move the point. A fixed point drags its previous position along so
    /// it keeps zero implicit velocity; a free point keeps the jump as
    /// velocity, which is how interactive dragging flings a rope.
    pub fn set_position(&mut self, pos: Vec2<F>) {
        if self.fixed {
            self.prev = pos;
        }
        self.current = pos;
    }

    /// Move the point and zero its implicit velocity.
    pub fn teleport(&mut self, pos: Vec2<F>) {
        self.current = pos;
        self.prev = pos;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Idempotent. Does not touch either position.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    /// Still queued, invisible to the solver until the next commit.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Scheduled for removal at the next commit.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Position as of the last render phase.
    pub fn render_position(&self) -> Vec2<F> {
        self.render_pos
    }

    pub(crate) fn connect(&mut self, stick: StickKey) {
        if !self.sticks.contains(&stick) {
            self.sticks.push(stick);
        }
    }

    pub(crate) fn disconnect(&mut self, stick: StickKey) {
        self.sticks.retain(|s| *s != stick);
    }

    pub fn is_connected_to_any_stick(&self) -> bool {
        !self.sticks.is_empty()
    }

    pub fn connected_sticks(&self) -> &[StickKey] {
        &self.sticks
    }

    /// One Verlet step. `gravity_step` is `gravity * dt²`.
    pub(crate) fn integrate(&mut self, gravity_step: Vec2<F>) {
        if self.fixed {
            return;
        }
        let displacement = self.current - self.prev;
        self.prev = self.current;
        self.current = self.current + displacement + gravity_step;
    }

    /// Rewrite `prev` so the implicit velocity becomes `velocity`.
    pub(crate) fn set_velocity_raw(&mut self, velocity: Vec2<F>) {
        if !self.fixed {
            self.prev = self.current - velocity;
        }
    }

    /// Displace by collision or constraint correction. Fixed points ignore it.
    pub(crate) fn nudge(&mut self, delta: Vec2<F>) {
        if !self.fixed {
            self.current += delta;
        }
    }
}
