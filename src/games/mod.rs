//! Game implementations.

pub mod tafl;
