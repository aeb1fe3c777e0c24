//! Error types for topology edits and registry operations.

use core::fmt;

use crate::strand::StrandId;

/// Errors surfaced to callers for structural misuse.
///
/// Recoverable conditions (duplicate stick, empty collider list, a point
/// without sticks) are handled locally and never produce an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RopeError {
    /// A point handle was issued by a different strand.
    ForeignPoint { expected: StrandId, found: StrandId },
    /// A stick handle was issued by a different strand.
    ForeignStick { expected: StrandId, found: StrandId },
    /// The point was removed or never existed in this strand.
    UnknownPoint,
    /// The stick was removed or never existed in this strand.
    UnknownStick,
    /// Both stick endpoints are the same point.
    SelfLink,
    /// The strand handle is not registered with the world.
    UnknownStrand,
    /// The collider handle is not registered with the world.
    UnknownCollider,
    /// Friction and bounciness must be in [0, 1].
    InvalidMaterial,
    /// Cloth layout is unusable: fewer than two points, a point count
    /// that overflows `usize`, non-positive spacing, or a pin stride of zero.
    InvalidClothDimensions,
    /// A path needs at least two distinct waypoints and a positive spacing
    /// that does not split a segment into more than 65536 pieces.
    InsufficientPath,
}

impl fmt::Display for RopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RopeError::ForeignPoint { expected, found } => {
                write!(f, "point belongs to strand {} but was used on strand {}", found, expected)
            }
            RopeError::ForeignStick { expected, found } => {
                write!(f, "stick belongs to strand {} but was used on strand {}", found, expected)
            }
            RopeError::UnknownPoint => write!(f, "point is not part of this strand"),
            RopeError::UnknownStick => write!(f, "stick is not part of this strand"),
            RopeError::SelfLink => write!(f, "a stick cannot connect a point to itself"),
            RopeError::UnknownStrand => write!(f, "strand is not registered"),
            RopeError::UnknownCollider => write!(f, "collider is not registered"),
            RopeError::InvalidMaterial => write!(f, "friction and bounciness must be in [0, 1]"),
            RopeError::InvalidClothDimensions => {
                write!(f, "invalid cloth layout (size, spacing or pin stride)")
            }
            RopeError::InsufficientPath => {
                write!(f, "path needs at least two waypoints and a usable spacing")
            }
        }
    }
}

impl core::error::Error for RopeError {}
