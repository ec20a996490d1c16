//! Free-Look Camera
//!
//! FPS-style camera with Windows-style (non-reversed) mouse look. The eye
//! position also drives the planet's refine/combine decisions, so the camera
//! is the single source of truth for "how close are we".

use glam::{Mat4, Vec3};

/// Simple free-view camera.
pub struct FreeCamera {
    pub position: Vec3,
    /// Horizontal angle (radians)
    pub yaw: f32,
    /// Vertical angle (radians)
    pub pitch: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FreeCamera {
    fn default() -> Self {
        Self {
            // Start outside the unit-sphere planet, looking at the origin
            position: Vec3::new(0.0, 0.8, 3.0),
            yaw: 0.0,
            pitch: -0.25,
            move_speed: 1.2,
            look_sensitivity: 0.003,
            fov: 55.0_f32.to_radians(),
            near: 0.001,
            far: 100.0,
        }
    }
}

impl FreeCamera {
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        let target = self.position + self.forward();
        Mat4::look_at_rh(self.position, target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Handle mouse look - Windows style (non-reversed).
    pub fn handle_mouse_look(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.look_sensitivity;
        self.pitch -= delta_y * self.look_sensitivity;

        // Clamp pitch to prevent camera flip
        let pitch_limit = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-pitch_limit, pitch_limit);
    }

    /// Apply WASD-style movement for one frame.
    pub fn update_movement(&mut self, keys: &MovementKeys, delta_time: f32) {
        let speed = if keys.sprint {
            self.move_speed * 2.5
        } else {
            self.move_speed
        };

        let forward = (keys.forward as i32 - keys.backward as i32) as f32;
        let right = (keys.right as i32 - keys.left as i32) as f32;
        let up = (keys.up as i32 - keys.down as i32) as f32;

        let forward_dir = self.forward();
        let right_dir = self.right();

        self.position += forward_dir * forward * speed * delta_time;
        self.position += right_dir * right * speed * delta_time;
        self.position.y += up * speed * delta_time;
    }

    /// Zoom along the view direction (mouse wheel).
    pub fn zoom(&mut self, amount: f32) {
        self.position += self.forward() * amount;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Movement key state.
#[derive(Default)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub sprint: bool,
}
