//! Rope-point-vs-collider pass of the strand step.

use core::mem;

use super::{StepReport, Strand};
use crate::collider::{Collider, ColliderKey};
use crate::collision::{point_vs_collider, Contact};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::point::Point;

impl<F: Float> Strand<F> {
    /// Push every active point out of every collider in `colliders`.
    ///
    /// Colliders are visited in the order given, points in arena order.
    /// A collider whose material tears the rope marks the touching point
    /// and its sticks; the overlap is still resolved so a dynamic collider
    /// is pushed as usual.
    pub(super) fn collide<O: StepObserver>(
        &mut self,
        colliders: &mut [(ColliderKey, Collider<F>)],
        observer: &mut O,
        report: &mut StepReport,
    ) {
        let radius = self.config.point_radius;
        let strand = self.id;
        let mut active = mem::take(&mut self.scratch);
        active.clear();
        active.extend(
            self.points
                .iter()
                .filter(|(_, p)| !p.pending && !p.marked)
                .map(|(i, _)| i),
        );

        for (collider_key, collider) in colliders.iter_mut() {
            let reach = collider.bounding_radius() + radius;
            for &index in &active {
                let Some(point) = self.points.get_mut(index) else { continue };
                if point.marked {
                    continue;
                }
                if point.current.distance(collider.position()) > reach {
                    continue;
                }
                let Some(contact) = point_vs_collider(point.current, radius, collider) else {
                    continue;
                };

                let key = super::PointKey { strand, index };
                report.contacts += 1;
                observer.on_contact(key, *collider_key);

                if collider.material.tears_rope {
                    point.marked = true;
                    for s in &point.sticks {
                        if let Some(stick) = self.sticks.get_mut(s.index) {
                            if !stick.marked {
                                stick.marked = true;
                                report.torn_sticks += 1;
                            }
                        }
                    }
                }

                resolve_contact(point, collider, &contact);
            }
        }

        self.scratch = active;
    }
}

/// Separate a point from a collider and apply the collider's material.
/// `contact.normal` points from the point toward the collider. A point
/// marked for removal gets the same friction and bounce as any other.
fn resolve_contact<F: Float>(point: &mut Point<F>, collider: &mut Collider<F>, contact: &Contact<F>) {
    let mtv = contact.mtv();
    match (point.fixed, collider.is_static) {
        (true, true) => return,
        (true, false) => {
            collider.displace(mtv);
            return;
        }
        (false, true) => point.nudge(-mtv),
        (false, false) => {
            let half = mtv.scale(F::half());
            point.nudge(-half);
            collider.displace(half);
        }
    }

    let material = collider.material;
    let velocity = point.velocity_raw();
    let normal_part = contact.normal.scale(velocity.dot(contact.normal));
    let mut tangent_part = velocity - normal_part;
    if material.friction > F::zero() {
        tangent_part = tangent_part.scale(F::one() - material.friction);
    }
    let bounced = normal_part.scale(-material.bounciness);
    point.set_velocity_raw(tangent_part + bounced);
}
