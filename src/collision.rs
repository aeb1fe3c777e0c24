//! Separating-axis narrow phase shared by rope points and rigid colliders.
//!
//! Every test returns a [`Contact`] whose normal points from the first
//! shape toward the second, so callers resolve by moving the first shape
//! along `-normal` and the second along `+normal`.

use crate::collider::{Collider, Shape};
use crate::float::Float;
use crate::vec::Vec2;

/// Overlap between two shapes: the minimum translation is `normal * depth`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact<F: Float> {
    /// Unit axis of least penetration, oriented from the first shape to the second.
    pub normal: Vec2<F>,
    /// Penetration depth along `normal`, never negative.
    pub depth: F,
}

impl<F: Float> Contact<F> {
    /// Minimum translation vector.
    pub fn mtv(&self) -> Vec2<F> {
        self.normal.scale(self.depth)
    }

    fn flipped(self) -> Self {
        Contact { normal: -self.normal, depth: self.depth }
    }
}

/// Project vertices onto `axis`, returning `(min, max)`.
pub fn project_vertices<F: Float>(vertices: &[Vec2<F>], axis: Vec2<F>) -> (F, F) {
    let first = vertices[0].dot(axis);
    vertices[1..].iter().fold((first, first), |(min, max), v| {
        let p = v.dot(axis);
        (min.min(p), max.max(p))
    })
}

/// Project a circle onto `axis`, returning `(min, max)`.
pub fn project_circle<F: Float>(center: Vec2<F>, radius: F, axis: Vec2<F>) -> (F, F) {
    let c = center.dot(axis);
    (c - radius, c + radius)
}

/// Distance one interval must travel along the axis to clear the other,
/// or `None` when there is a gap.
///
/// When one interval contains the other this is the shorter exit, not the
/// width of the inner interval. For shapes whose projections are centred
/// on their position, the shorter exit always lies on the side facing
/// away from the other centre.
fn interval_overlap<F: Float>(a: (F, F), b: (F, F)) -> Option<F> {
    if a.1 < b.0 || b.1 < a.0 {
        return None;
    }
    Some((a.1 - b.0).min(b.1 - a.0))
}

/// Run the axis loop: `None` as soon as one axis separates the shapes,
/// otherwise the axis of least overlap and its depth.
fn min_overlap_axis<F: Float>(
    axes: &[Vec2<F>],
    mut project_pair: impl FnMut(Vec2<F>) -> ((F, F), (F, F)),
) -> Option<(Vec2<F>, F)> {
    let mut best: Option<(Vec2<F>, F)> = None;
    for &axis in axes {
        let (pa, pb) = project_pair(axis);
        let overlap = interval_overlap(pa, pb)?;
        if best.map_or(true, |(_, depth)| overlap < depth) {
            best = Some((axis, overlap));
        }
    }
    best
}

/// Flip `axis` if it points away from `toward`.
fn orient<F: Float>(axis: Vec2<F>, toward: Vec2<F>) -> Vec2<F> {
    if toward.dot(axis) < F::zero() { -axis } else { axis }
}

/// Circle (or a rope point of the given radius) against an oriented box.
///
/// Axes are the box's two face normals plus the axis from the circle
/// centre to the nearest box corner, which catches corner contacts. A
/// centre sitting exactly on a corner has no such axis and only the face
/// normals are tested. The normal points from the circle toward the box.
pub fn circle_vs_box<F: Float>(center: Vec2<F>, radius: F, box_collider: &Collider<F>) -> Option<Contact<F>> {
    let vertices = box_collider.world_vertices()?;
    let [right, up] = box_collider.axes()?;

    let nearest = vertices[1..].iter().fold(vertices[0], |best, &v| {
        if center.distance_sq(v) < center.distance_sq(best) { v } else { best }
    });

    let mut axes = [right, up, Vec2::zero()];
    let axis_count = match (nearest - center).try_normalize() {
        Some(corner_axis) => {
            axes[2] = corner_axis;
            3
        }
        None => 2,
    };

    let (axis, depth) = min_overlap_axis(&axes[..axis_count], |axis| {
        (project_vertices(&vertices, axis), project_circle(center, radius, axis))
    })?;

    let normal = orient(axis, box_collider.position() - center);
    Some(Contact { normal, depth })
}

/// Two oriented boxes. The normal points from `a` toward `b`.
pub fn box_vs_box<F: Float>(a: &Collider<F>, b: &Collider<F>) -> Option<Contact<F>> {
    let va = a.world_vertices()?;
    let vb = b.world_vertices()?;
    let [a_right, a_up] = a.axes()?;
    let [b_right, b_up] = b.axes()?;
    let axes = [a_right, a_up, b_right, b_up];

    let (axis, depth) = min_overlap_axis(&axes, |axis| {
        (project_vertices(&va, axis), project_vertices(&vb, axis))
    })?;

    let normal = orient(axis, b.position() - a.position());
    Some(Contact { normal, depth })
}

/// Two circles. Coincident centres have no separating direction and are
/// reported as no contact so the pair is skipped this pass.
pub fn circle_vs_circle<F: Float>(ca: Vec2<F>, ra: F, cb: Vec2<F>, rb: F) -> Option<Contact<F>> {
    let delta = cb - ca;
    let distance = delta.length();
    let total = ra + rb;
    if distance > total {
        return None;
    }
    let normal = delta.try_normalize()?;
    Some(Contact { normal, depth: total - distance })
}

/// Dispatch on the shape pair. The normal points from `a` toward `b`.
pub fn collide<F: Float>(a: &Collider<F>, b: &Collider<F>) -> Option<Contact<F>> {
    match (a.shape, b.shape) {
        (Shape::Box { .. }, Shape::Box { .. }) => box_vs_box(a, b),
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_vs_circle(a.position(), ra, b.position(), rb)
        }
        (Shape::Circle { radius }, Shape::Box { .. }) => circle_vs_box(a.position(), radius, b),
        (Shape::Box { .. }, Shape::Circle { radius }) => {
            circle_vs_box(b.position(), radius, a).map(Contact::flipped)
        }
    }
}

/// A rope point of `radius` against any collider. The normal points from
/// the point toward the collider.
pub fn point_vs_collider<F: Float>(pos: Vec2<F>, radius: F, collider: &Collider<F>) -> Option<Contact<F>> {
    match collider.shape {
        Shape::Box { .. } => circle_vs_box(pos, radius, collider),
        Shape::Circle { radius: r } => circle_vs_circle(pos, radius, collider.position(), r),
    }
}
