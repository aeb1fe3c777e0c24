//! Rigid-vs-rigid overlap resolution over the collider registry.

use alloc::vec::Vec as AllocVec;

use crate::collider::{Collider, ColliderKey, ColliderSet};
use crate::collision::{collide, Contact};
use crate::float::Float;
use crate::observer::StepObserver;

/// All-pairs separating-axis sweep.
///
/// Colliders are kinematic: overlaps are resolved by moving positions
/// only, never by integrating velocity.
#[derive(Clone, Debug, Default)]
pub struct SatEngine {
    keys: AllocVec<ColliderKey>,
    last_contacts: usize,
}

impl SatEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlapping pairs resolved by the most recent pass.
    pub fn last_contacts(&self) -> usize {
        self.last_contacts
    }

    /// One pass over every pair in registration order, skipping pairs where
    /// both colliders are static. Later pairs see earlier corrections.
    pub fn resolve<F: Float, O: StepObserver>(&mut self, colliders: &mut ColliderSet<F>, observer: &mut O) -> usize {
        self.keys.clear();
        self.keys.extend_from_slice(colliders.keys());

        let mut contacts = 0;
        for i in 0..self.keys.len() {
            for j in (i + 1)..self.keys.len() {
                let (ka, kb) = (self.keys[i], self.keys[j]);
                let Some((a, b)) = colliders.pair_mut(ka, kb) else { continue };
                if a.is_static && b.is_static {
                    continue;
                }
                let Some(contact) = collide(a, b) else { continue };
                resolve_pair(a, b, &contact);
                observer.on_rigid_contact(ka, kb);
                contacts += 1;
            }
        }

        if contacts > 0 {
            log::trace!("sat: resolved {} rigid contacts", contacts);
        }
        self.last_contacts = contacts;
        contacts
    }
}

/// Push `a` and `b` apart along a normal that points from `a` to `b`.
fn resolve_pair<F: Float>(a: &mut Collider<F>, b: &mut Collider<F>, contact: &Contact<F>) {
    let mtv = contact.mtv();
    match (a.is_static, b.is_static) {
        (true, true) => {}
        (true, false) => b.displace(mtv),
        (false, true) => a.displace(-mtv),
        (false, false) => {
            let half = mtv.scale(F::half());
            a.displace(-half);
            b.displace(half);
        }
    }
}
