//! Adaptive Icosphere Planet Demo
//!
//! Run with: `cargo run --bin planet_demo [preset.json]`
//!
//! A procedurally generated planet with distance-driven level of detail.
//! The renderer keeps three frames in flight through a fence-synchronized
//! resource ring; the planet refines and coarsens its triangle tree as the
//! camera moves.
//!
//! Controls:
//! - WASD: Move camera
//! - Mouse right-drag: Look around (FPS style)
//! - Space: Move up
//! - Shift: Move down (or sprint when moving)
//! - Scroll: Zoom in/out
//! - Tab: Toggle parameter panel
//! - R: Reset camera
//! - ESC: Exit

use std::sync::Arc;
use std::time::Instant;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use icoplanet_engine::camera::{FreeCamera, MovementKeys};
use icoplanet_engine::planet::params::PlanetParams;
use icoplanet_engine::planet::Planet;
use icoplanet_engine::render::{
    FrameRing, FrameUniforms, GpuContext, GpuContextConfig, PlanetPipelines, RenderItem,
    FRAME_COUNT,
};
use icoplanet_engine::ui::{PanelAction, PlanetPanel};

// Ring-slot geometry buffer capacity. Covers deep refinement at the default
// chunk depth; uploads beyond this are truncated with a warning.
const MAX_PLANET_VERTICES: u64 = 400_000;
const MAX_PLANET_INDICES: u64 = 2_000_000;

const VERTEX_SIZE: u64 = std::mem::size_of::<icoplanet_engine::planet::types::PlanetVertex>() as u64;

struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    pipelines: PlanetPipelines,
    ring: FrameRing,

    // One bind group per ring slot, pointing at that slot's uniform buffers
    frame_bind_groups: Vec<wgpu::BindGroup>,
    object_bind_groups: Vec<wgpu::BindGroup>,

    planet: Planet,
    planet_item: RenderItem,

    camera: FreeCamera,
    movement_keys: MovementKeys,
    panel: PlanetPanel,

    // Input state
    right_mouse_down: bool,
    last_mouse_pos: Option<(f64, f64)>,
    cursor_pos: (f32, f32),

    // Timing
    start_time: Instant,
    last_frame_time: Instant,

    // FPS tracking
    frame_count: u32,
    fps_update_time: Instant,
}

impl AppState {
    fn new(window: Arc<Window>, params: PlanetParams) -> Self {
        let gpu = GpuContext::new(
            Arc::clone(&window),
            GpuContextConfig {
                vsync: params.vsync,
                high_performance: true,
            },
        );
        let pipelines = PlanetPipelines::new(&gpu);

        let ring = FrameRing::new(
            &gpu.device,
            MAX_PLANET_VERTICES * VERTEX_SIZE,
            MAX_PLANET_INDICES * std::mem::size_of::<u32>() as u64,
        );

        let frame_bind_groups = ring
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| pipelines.frame_bind_group(&gpu.device, &slot.frame_uniforms, i))
            .collect();
        let object_bind_groups = ring
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| pipelines.object_bind_group(&gpu.device, &slot.object_uniforms, i))
            .collect();

        let panel = PlanetPanel::new(&params);
        let planet = Planet::new(params);

        Self {
            window,
            gpu,
            pipelines,
            ring,
            frame_bind_groups,
            object_bind_groups,
            planet,
            planet_item: RenderItem::new(0),
            camera: FreeCamera::default(),
            movement_keys: MovementKeys::default(),
            panel,
            right_mouse_down: false,
            last_mouse_pos: None,
            cursor_pos: (0.0, 0.0),
            start_time: Instant::now(),
            last_frame_time: Instant::now(),
            frame_count: 0,
            fps_update_time: Instant::now(),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size.width, size.height);
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.movement_keys.forward = pressed,
            KeyCode::KeyS => self.movement_keys.backward = pressed,
            KeyCode::KeyA => self.movement_keys.left = pressed,
            KeyCode::KeyD => self.movement_keys.right = pressed,
            KeyCode::Space => self.movement_keys.up = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.movement_keys.down = pressed;
                self.movement_keys.sprint = pressed;
            }
            KeyCode::Tab if pressed => {
                self.panel.toggle(self.planet.params());
            }
            KeyCode::KeyR if pressed => {
                self.camera.reset();
            }
            _ => {}
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Right => {
                self.right_mouse_down = pressed;
                if pressed {
                    // Confined grab keeps look deltas coming at the window
                    // edge; not all platforms support it, so failure is fine
                    let _ = self
                        .window
                        .set_cursor_grab(CursorGrabMode::Confined)
                        .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked));
                    self.window.set_cursor_visible(false);
                } else {
                    let _ = self.window.set_cursor_grab(CursorGrabMode::None);
                    self.window.set_cursor_visible(true);
                    self.last_mouse_pos = None;
                }
            }
            MouseButton::Left => {
                let (x, y) = self.cursor_pos;
                if pressed {
                    self.panel.on_mouse_press(x, y);
                } else if let Some(action) =
                    self.panel.on_mouse_release(x, y, self.planet.params())
                {
                    self.apply_panel_action(action);
                }
            }
            _ => {}
        }
    }

    fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Apply(params) => {
                log::info!(
                    "[demo] applying params: freq={:.2} octaves={} amp={:.3} lod={} depth={}",
                    params.frequency,
                    params.octaves,
                    params.amplitude,
                    params.max_lod,
                    params.chunk_depth
                );
                self.planet.apply_params(params);
            }
            PanelAction::ToggleWireframe => {
                let mut params = self.planet.params().clone();
                params.wireframe = !params.wireframe;
                if params.wireframe && self.pipelines.planet_wire.is_none() {
                    log::warn!("[demo] wireframe unsupported on this device");
                    params.wireframe = false;
                }
                self.planet.apply_params(params);
            }
            PanelAction::ToggleVsync => {
                let mut params = self.planet.params().clone();
                params.vsync = !params.vsync;
                self.gpu.set_vsync(params.vsync);
                self.planet.apply_params(params);
            }
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor_pos = (x as f32, y as f32);
        self.panel.on_mouse_move(x as f32, y as f32);

        if self.right_mouse_down {
            if let Some((last_x, last_y)) = self.last_mouse_pos {
                let dx = (x - last_x) as f32;
                let dy = (y - last_y) as f32;
                self.camera.handle_mouse_look(dx, dy);
            }
            self.last_mouse_pos = Some((x, y));
        }
    }

    fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * 0.2,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.005,
        };
        self.camera.zoom(amount);
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32().min(0.1);
        self.last_frame_time = now;

        self.camera.update_movement(&self.movement_keys, dt);
        self.planet.update(self.camera.position, dt);
        self.planet_item.set_world(self.planet.model_matrix());

        self.update_fps_title(now);
    }

    fn update_fps_title(&mut self, now: Instant) {
        self.frame_count += 1;
        let elapsed = (now - self.fps_update_time).as_secs_f32();
        if elapsed >= 0.5 {
            let fps = self.frame_count as f32 / elapsed;
            self.window.set_title(&format!(
                "Icosphere Planet - {:.0} FPS | {} tris | {} leaves",
                fps,
                self.planet.mesh().triangle_count(),
                self.planet.leaf_count()
            ));
            self.frame_count = 0;
            self.fps_update_time = now;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Advance the ring; blocks if the GPU is still reading this slot
        let slot_index = self.ring.begin_frame(&self.gpu.device);

        // Per-frame uniforms
        let (width, height) = self.gpu.dimensions();
        let aspect = width as f32 / height.max(1) as f32;
        let view_proj = self.camera.projection_matrix(aspect) * self.camera.view_matrix();

        let mut uniforms = FrameUniforms::default();
        uniforms.set_camera(view_proj, self.camera.position);
        uniforms.set_time(self.start_time.elapsed().as_secs_f32());

        {
            let slot = self.ring.current_slot();
            self.gpu.queue.write_buffer(
                &slot.frame_uniforms,
                0,
                bytemuck::bytes_of(&uniforms),
            );
        }

        // Per-object uniforms: flush the world matrix if this slot is stale
        self.planet_item
            .flush(&self.gpu.queue, &self.ring.current_slot().object_uniforms);

        self.upload_geometry_if_stale();

        // UI overlay mesh, rebuilt per frame while visible
        let ui_mesh = self
            .panel
            .build_mesh(self.planet.params(), width as f32, height as f32);
        let ui_buffers = (!ui_mesh.is_empty()).then(|| {
            let vertex = self
                .gpu
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("UI Vertex Buffer"),
                    contents: bytemuck::cast_slice(&ui_mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let index = self
                .gpu
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("UI Index Buffer"),
                    contents: bytemuck::cast_slice(&ui_mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
            (vertex, index, ui_mesh.indices.len() as u32)
        });

        let frame = self.gpu.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let slot = &self.ring.slots[slot_index];
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Planet Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // Sky behind everything
            pass.set_pipeline(&self.pipelines.sky);
            pass.set_bind_group(0, &self.frame_bind_groups[slot_index], &[]);
            pass.draw(0..3, 0..1);

            // Planet
            let pipeline = if self.planet.params().wireframe {
                self.pipelines
                    .planet_wire
                    .as_ref()
                    .unwrap_or(&self.pipelines.planet_fill)
            } else {
                &self.pipelines.planet_fill
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.frame_bind_groups[slot_index], &[]);
            pass.set_bind_group(
                1,
                &self.object_bind_groups[slot_index],
                &[self.planet_item.uniform_offset() as u32],
            );
            pass.set_vertex_buffer(0, slot.vertex_buffer.slice(..));
            pass.set_index_buffer(slot.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            let first = self.planet_item.first_index;
            pass.draw_indexed(
                first..first + self.planet_item.index_count,
                self.planet_item.base_vertex,
                0..1,
            );
        }

        // UI in its own pass: no depth, load the scene color
        if let Some((vertex, index, count)) = &ui_buffers {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("UI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipelines.ui);
            pass.set_vertex_buffer(0, vertex.slice(..));
            pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..*count, 0, 0..1);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.ring.end_frame(&self.gpu.queue);
        frame.present();
        Ok(())
    }

    /// Upload the planet mesh into the current slot if the slot still holds
    /// an older geometry generation.
    fn upload_geometry_if_stale(&mut self) {
        let generation = self.planet.generation();
        let slot = self.ring.current_slot_mut();
        if slot.geometry_version == generation {
            return;
        }

        // Truncation keeps whole triangles and drops any triangle whose
        // vertices fell past the vertex cut
        let mesh = self.planet.mesh();
        let (vertex_count, index_count) =
            mesh.clamped_counts(MAX_PLANET_VERTICES as usize, MAX_PLANET_INDICES as usize);
        if vertex_count < mesh.vertices.len() || index_count < mesh.indices.len() {
            log::warn!(
                "[demo] mesh exceeds slot capacity ({} verts, {} indices), drawing {} indices",
                mesh.vertices.len(),
                mesh.indices.len(),
                index_count
            );
        }

        self.gpu.queue.write_buffer(
            &slot.vertex_buffer,
            0,
            bytemuck::cast_slice(&mesh.vertices[..vertex_count]),
        );
        self.gpu.queue.write_buffer(
            &slot.index_buffer,
            0,
            bytemuck::cast_slice(&mesh.indices[..index_count]),
        );
        slot.geometry_version = generation;
        self.planet_item.index_count = index_count as u32;
    }

    fn print_status(&self) {
        let params = self.planet.params();
        println!(
            "[Planet] {} leaves, {} triangles (octaves={}, freq={:.2}, lod<={}, depth={})",
            self.planet.leaf_count(),
            self.planet.mesh().triangle_count(),
            params.octaves,
            params.frequency,
            params.max_lod,
            params.chunk_depth
        );
        println!("[Render] {} frames in flight", FRAME_COUNT);
    }
}

struct App {
    state: Option<AppState>,
    params: PlanetParams,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        println!("[Planet Demo] Creating window...");
        let window_attrs = WindowAttributes::default()
            .with_title("Icosphere Planet - WASD to move, Right-drag to look")
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
        self.state = Some(AppState::new(window, self.params.clone()));

        let s = self.state.as_ref().unwrap();
        s.print_status();
        println!("[Planet Demo] Ready! Controls:");
        println!("  WASD - Move camera");
        println!("  Right-drag - Look around");
        println!("  Space/Shift - Up/Down (Shift also = Sprint)");
        println!("  Scroll - Zoom");
        println!("  Tab - Parameter panel");
        println!("  R - Reset camera");
        println!("  ESC - Exit");
        println!();
        println!("FPS and triangle count shown in window title.");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                // Let in-flight frames drain before tearing down
                state.ring.flush(&state.gpu.device);
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                state.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;

                if key == KeyCode::Escape && pressed {
                    state.ring.flush(&state.gpu.device);
                    event_loop.exit();
                    return;
                }

                state.handle_key(key, pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                state.handle_mouse_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.handle_mouse_move(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.handle_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                state.update();

                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => eprintln!("Render error: {:?}", e),
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();
    println!("=== Icosphere Planet Demo ===");

    // Preset: explicit path argument, or planet_params.json if present
    let preset_path = std::env::args()
        .nth(1)
        .or_else(|| {
            std::path::Path::new("planet_params.json")
                .exists()
                .then(|| "planet_params.json".to_string())
        });
    let params = match preset_path {
        Some(path) => match PlanetParams::load_preset(&path) {
            Ok(params) => {
                println!("[Planet Demo] Loaded preset: {}", path);
                params
            }
            Err(e) => {
                eprintln!("{}; using defaults", e);
                PlanetParams::default()
            }
        },
        None => PlanetParams::default(),
    };

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        state: None,
        params,
    };
    event_loop.run_app(&mut app).unwrap();
}
