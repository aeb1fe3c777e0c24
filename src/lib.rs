//! Verlet rope and cloth simulation with separating-axis collision.
//!
//! `tautline` simulates 2D ropes and cloth as points joined by distance
//! constraints, and pushes them out of rigid box and circle colliders.
//! Designed for games: ropes you can draw, cut, and swing on.
//!
//! # Features
//!
//! - **Verlet integration**: Position-based dynamics with implicit velocity
//! - **Constraint relaxation**: Gauss-Seidel passes over distance sticks
//! - **Tearing**: by over-stretching, by tearing colliders, or on demand
//! - **Safe topology edits**: queued points and sticks join between steps
//! - **SAT collision**: rope-vs-collider and collider-vs-collider on one primitive
//! - **Builders**: ropes along polylines and pinned cloth grids
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments. Targets
//!   without atomic compare-and-swap need the `critical-section` feature
//!
//! # Example
//! ```
//! use tautline::{SimulationConfig, Strand, StrandConfig, Vec2, World};
//!
//! let mut world: World<f32> = World::new(SimulationConfig::new().with_tear_length(None));
//! let mut rope = Strand::new(StrandConfig::new());
//! let anchor = rope.add_point(Vec2::new(0.0, 0.0), true);
//! let bob = rope.add_point(Vec2::new(1.0, 0.0), false);
//! rope.add_stick(anchor, bob).unwrap();
//! let key = world.register_strand(rope);
//!
//! for _ in 0..100 {
//!     world.step();
//! }
//! let rope = world.strand(key).unwrap();
//! let length = rope.point(bob).unwrap().position().length();
//! assert!((length - 1.0).abs() < 0.05);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod point;
pub mod stick;
pub mod collider;
pub mod collision;
pub mod strand;
pub mod sat;
pub mod world;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use point::Point;
pub use stick::Stick;
pub use collider::{Collider, ColliderKey, ColliderSet, Material, Shape, Transform};
pub use collision::Contact;
pub use strand::{Bounds, ClothConfig, ClothGrid, PointKey, StepReport, StickKey, Strand, StrandId};
pub use sat::SatEngine;
pub use world::{StrandKey, World};
pub use config::{SimulationConfig, StrandConfig, StepParams};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::RopeError;
