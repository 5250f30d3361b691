//! Collection aliases used by the mesh and the hull builders.
//!
//! Arena storage, fast hash maps keyed by arena keys, small inline buffers and
//! sparse secondary maps for per-pass scratch state.

pub mod aliases;
pub mod secondary_maps;

pub use aliases::*;
pub use secondary_maps::*;
