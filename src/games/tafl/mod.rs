//! Tafl domain types, board geometry and a reference rules engine.

pub mod geometry;
pub mod layouts;
mod rules;
mod snapshot;
mod types;

pub use geometry::{CellRole, classify, is_special};
pub use rules::BasicEngine;
pub use snapshot::{BoardSnapshot, CoverageError, SnapshotParseError};
pub use types::{
    Coordinate, Dimension, GameOutcome, InvalidDimension, MIN_DIMENSION, ORTHOGONAL, PieceKind,
    Player, Variant,
};
