//! Technologies built into this crate.
//!
//! Each module exposes its definition, so that definition-driven and
//! builtin technologies share a single construction path.

pub mod artwork;
pub mod generic;
pub mod mocmos;
pub mod schematic;
