//! Render Module
//!
//! GPU-facing half of the engine: device/surface context, render pipelines,
//! per-frame uniform layouts, and the frame-resource ring that keeps the CPU
//! from overwriting buffers the GPU is still reading.
//!
//! The synchronization protocol is split so the interesting parts stay
//! testable without a GPU: [`RenderFence`] is a plain monotonic counter with
//! blocking waits, and [`FrameSync`] is the pure ring-index/fence-value
//! bookkeeping. [`FrameRing`] binds both to actual wgpu buffers.

pub mod fence;
pub mod frame_ring;
pub mod gpu_context;
pub mod pipeline;
pub mod render_item;
pub mod uniforms;

pub use fence::RenderFence;
pub use frame_ring::{FrameRing, FrameSlot, FrameSync, FRAME_COUNT};
pub use gpu_context::{GpuContext, GpuContextConfig};
pub use pipeline::PlanetPipelines;
pub use render_item::{RenderItem, OBJECT_UNIFORM_STRIDE};
pub use uniforms::{FrameUniforms, ObjectUniforms};
