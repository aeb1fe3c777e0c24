//! Rigid obstacles: box and circle shapes with a transform and a material.

use alloc::vec::Vec as AllocVec;
use thunderdome as td;

use crate::error::RopeError;
use crate::float::Float;
use crate::vec::Vec2;

/// Collision geometry in local space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape<F: Float> {
    /// An oriented rectangle given by half its width and height.
    Box { half_extents: Vec2<F> },
    Circle { radius: F },
}

/// World placement of a collider. Rotation is in radians, counter-clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform<F: Float> {
    pub position: Vec2<F>,
    pub rotation: F,
}

impl<F: Float> Transform<F> {
    pub fn new(position: Vec2<F>, rotation: F) -> Self {
        Transform { position, rotation }
    }

    pub fn from_position(position: Vec2<F>) -> Self {
        Transform { position, rotation: F::zero() }
    }

    /// Local X axis in world space.
    pub fn right(&self) -> Vec2<F> {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Local Y axis in world space.
    pub fn up(&self) -> Vec2<F> {
        self.right().perp()
    }

    pub fn transform_point(&self, local: Vec2<F>) -> Vec2<F> {
        self.position + local.rotate(self.rotation)
    }
}

/// Surface response applied to rope points that touch a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material<F: Float> {
    /// Fraction of tangential velocity removed on contact, in [0, 1].
    pub friction: F,
    /// Fraction of normal velocity reflected on contact, in [0, 1].
    pub bounciness: F,
    /// Whether touching this collider cuts the rope at the contact point.
    pub tears_rope: bool,
}

impl<F: Float> Material<F> {
    pub fn new(friction: F, bounciness: F) -> Result<Self, RopeError> {
        let unit = |v: F| v >= F::zero() && v <= F::one();
        if !unit(friction) || !unit(bounciness) {
            return Err(RopeError::InvalidMaterial);
        }
        Ok(Material { friction, bounciness, tears_rope: false })
    }

    pub fn tearing(mut self) -> Self {
        self.tears_rope = true;
        self
    }
}

impl<F: Float> Default for Material<F> {
    fn default() -> Self {
        Material { friction: F::zero(), bounciness: F::zero(), tears_rope: false }
    }
}

/// A static or kinematic rigid obstacle.
///
/// Colliders never integrate velocity. Dynamic ones are only pushed
/// positionally by overlap resolution; their host moves them otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider<F: Float> {
    pub shape: Shape<F>,
    pub transform: Transform<F>,
    pub material: Material<F>,
    pub is_static: bool,
}

impl<F: Float> Collider<F> {
    /// A box of full `size` centred on `position`.
    pub fn cuboid(position: Vec2<F>, size: Vec2<F>) -> Self {
        Collider {
            shape: Shape::Box { half_extents: size.scale(F::half()) },
            transform: Transform::from_position(position),
            material: Material::default(),
            is_static: true,
        }
    }

    pub fn circle(position: Vec2<F>, radius: F) -> Self {
        Collider {
            shape: Shape::Circle { radius },
            transform: Transform::from_position(position),
            material: Material::default(),
            is_static: true,
        }
    }

    pub fn with_rotation(mut self, rotation: F) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_material(mut self, material: Material<F>) -> Self {
        self.material = material;
        self
    }

    /// Make the collider movable by overlap resolution.
    pub fn dynamic(mut self) -> Self {
        self.is_static = false;
        self
    }

    pub fn position(&self) -> Vec2<F> {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec2<F>) {
        self.transform.position = position;
    }

    /// Radius of the smallest circle around the centre that contains the shape.
    pub fn bounding_radius(&self) -> F {
        match self.shape {
            Shape::Box { half_extents } => half_extents.length(),
            Shape::Circle { radius } => radius,
        }
    }

    /// Corners of a box collider in world space, counter-clockwise from
    /// the local (+x, +y) corner. Circles have none.
    pub fn world_vertices(&self) -> Option<[Vec2<F>; 4]> {
        match self.shape {
            Shape::Box { half_extents: h } => Some([
                self.transform.transform_point(Vec2::new(h.x, h.y)),
                self.transform.transform_point(Vec2::new(-h.x, h.y)),
                self.transform.transform_point(Vec2::new(-h.x, -h.y)),
                self.transform.transform_point(Vec2::new(h.x, -h.y)),
            ]),
            Shape::Circle { .. } => None,
        }
    }

    /// Face normals of a box collider. Circles have none.
    pub fn axes(&self) -> Option<[Vec2<F>; 2]> {
        match self.shape {
            Shape::Box { .. } => Some([self.transform.right(), self.transform.up()]),
            Shape::Circle { .. } => None,
        }
    }

    /// Shift the collider unless it is static.
    pub(crate) fn displace(&mut self, delta: Vec2<F>) {
        if !self.is_static {
            self.transform.position += delta;
        }
    }
}

/// Key type to look up a collider registered with the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderKey(pub(crate) td::Index);

/// Registry of rigid colliders that keeps registration order.
#[derive(Clone, Debug)]
pub struct ColliderSet<F: Float> {
    colliders: td::Arena<Collider<F>>,
    order: AllocVec<ColliderKey>,
}

impl<F: Float> ColliderSet<F> {
    pub fn new() -> Self {
        ColliderSet { colliders: td::Arena::new(), order: AllocVec::new() }
    }

    pub fn insert(&mut self, collider: Collider<F>) -> ColliderKey {
        let key = ColliderKey(self.colliders.insert(collider));
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, key: ColliderKey) -> Result<Collider<F>, RopeError> {
        let collider = self.colliders.remove(key.0).ok_or(RopeError::UnknownCollider)?;
        self.order.retain(|k| *k != key);
        Ok(collider)
    }

    pub fn get(&self, key: ColliderKey) -> Option<&Collider<F>> {
        self.colliders.get(key.0)
    }

    pub fn get_mut(&mut self, key: ColliderKey) -> Option<&mut Collider<F>> {
        self.colliders.get_mut(key.0)
    }

    pub fn contains(&self, key: ColliderKey) -> bool {
        self.colliders.contains(key.0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in registration order.
    pub fn keys(&self) -> &[ColliderKey] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColliderKey, &Collider<F>)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.colliders.get(key.0).map(|c| (key, c)))
    }

    /// Copy of every collider in registration order. Strands iterate this
    /// copy so nothing they do can disturb the registry mid-pass.
    pub fn snapshot(&self) -> AllocVec<(ColliderKey, Collider<F>)> {
        self.iter().map(|(key, c)| (key, *c)).collect()
    }

    /// Copy transforms of dynamic colliders back from a snapshot.
    pub fn write_back(&mut self, snapshot: &[(ColliderKey, Collider<F>)]) {
        for (key, moved) in snapshot {
            if moved.is_static {
                continue;
            }
            if let Some(collider) = self.colliders.get_mut(key.0) {
                collider.transform = moved.transform;
            }
        }
    }

    /// Mutable access to two distinct colliders at once.
    pub(crate) fn pair_mut(
        &mut self,
        a: ColliderKey,
        b: ColliderKey,
    ) -> Option<(&mut Collider<F>, &mut Collider<F>)> {
        if a == b {
            return None;
        }
        match self.colliders.get2_mut(a.0, b.0) {
            (Some(ca), Some(cb)) => Some((ca, cb)),
            _ => None,
        }
    }
}

impl<F: Float> Default for ColliderSet<F> {
    fn default() -> Self {
        Self::new()
    }
}
