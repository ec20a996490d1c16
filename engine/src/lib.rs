//! Icoplanet Engine Library
//!
//! Rendering infrastructure for the adaptive icosphere planet demo.
//! The engine half owns the GPU plumbing: device/surface management, the
//! frame-resource ring with fence-based CPU/GPU synchronization, render
//! pipelines, and the free-look camera. The planet geometry system and the
//! debug UI live under `src/` and are pulled in here as library modules.
//!
//! # Modules
//!
//! - [`render`] - GPU context, frame-resource ring, fence protocol, pipelines
//! - [`camera`] - Free-look camera with view/projection matrices
//! - [`planet`] - Icosphere subdivision, LOD tree, noise displacement
//! - [`ui`] - Immediate-mode debug panel (sliders, toggles, pixel font)
//!
//! # Example
//!
//! ```ignore
//! use icoplanet_engine::planet::{Planet, PlanetParams};
//! use icoplanet_engine::render::{FrameSync, RenderFence};
//!
//! let mut planet = Planet::new(PlanetParams::default());
//! planet.update(glam::Vec3::new(0.0, 0.0, 3.0), 0.016);
//! let mesh = planet.mesh();
//!
//! // Frame ring bookkeeping (GPU-free part)
//! let fence = RenderFence::new();
//! let mut sync = FrameSync::new();
//! let slot = sync.begin_frame(&fence);
//! // ... record + submit commands for `slot` ...
//! let value = sync.end_frame();
//! fence.signal(value); // normally from the queue completion callback
//! ```

pub mod camera;
pub mod render;

// Planet and UI modules (located in src/ directory)
#[path = "../../src/planet/mod.rs"]
pub mod planet;

#[path = "../../src/ui/mod.rs"]
pub mod ui;

// Re-export the render module contents at crate level for convenience
pub use render::*;
// Re-export commonly used planet types
pub use planet::{Planet, PlanetParams};
// Re-export the camera
pub use camera::FreeCamera;
