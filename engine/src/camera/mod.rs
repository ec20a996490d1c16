//! Camera Module
//!
//! Free-look camera used by the demo and by the planet LOD heuristic.

pub mod controller;

pub use controller::{FreeCamera, MovementKeys};
