//! Immediate-Mode Debug UI
//!
//! Quad-based 2D overlay rebuilt every frame: a pixel-font text renderer,
//! a slider widget, and the planet parameter panel. Everything is plain
//! colored geometry in NDC, drawn by a dedicated alpha-blended pipeline.

pub mod panel;
pub mod slider;
pub mod text;

use bytemuck::{Pod, Zeroable};

pub use panel::{PanelAction, PlanetPanel};
pub use slider::UiSlider;

/// Vertex for UI overlay geometry, already in NDC.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct UiVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(UiVertex, [u8; 28]);

/// CPU-built overlay mesh, regenerated each frame the panel is visible.
#[derive(Default)]
pub struct UiMesh {
    pub vertices: Vec<UiVertex>,
    pub indices: Vec<u32>,
}

impl UiMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
