//! Uniform Buffer Layouts
//!
//! CPU-side mirrors of the WGSL uniform blocks. All structs are `#[repr(C)]`
//! and `Pod` so they can be written into GPU buffers with bytemuck; sizes are
//! pinned with compile-time asserts because a silent layout drift between
//! Rust and WGSL corrupts every frame.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame constants, written once per ring slot per frame.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub time: f32,
    pub sun_dir: [f32; 3],
    pub fog_density: f32,
    pub fog_color: [f32; 3],
    pub ambient: f32,
}

static_assertions::assert_eq_size!(FrameUniforms, [u8; 112]);

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 3.0],
            time: 0.0,
            sun_dir: Vec3::new(0.4, 0.8, 0.3).normalize().into(),
            fog_density: 0.0001,
            fog_color: [0.01, 0.01, 0.02],
            ambient: 0.3,
        }
    }
}

impl FrameUniforms {
    pub fn set_camera(&mut self, view_proj: Mat4, camera_pos: Vec3) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.camera_pos = camera_pos.into();
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }
}

/// Per-object constants: one world matrix per render item, laid out at
/// `OBJECT_UNIFORM_STRIDE` offsets in each ring slot's object buffer.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub world: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(ObjectUniforms, [u8; 64]);

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

impl ObjectUniforms {
    pub fn from_world(world: Mat4) -> Self {
        Self {
            world: world.to_cols_array_2d(),
        }
    }
}
