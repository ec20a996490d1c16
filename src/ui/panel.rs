//! Planet Parameter Panel
//!
//! Debug panel for tuning planet generation at runtime. Slider edits stay
//! local to the panel until APPLY is pressed; the panel reports what
//! happened through `PanelAction` and never mutates the planet directly.

use crate::planet::params::{
    AMPLITUDE_RANGE, CHUNK_DEPTH_RANGE, FREQUENCY_RANGE, MAX_LOD_RANGE, OCTAVE_RANGE,
    PlanetParams, SCALE_RANGE,
};

use super::UiMesh;
use super::slider::UiSlider;
use super::text::{add_quad, draw_text};

/// Result of a mouse-release the panel consumed.
pub enum PanelAction {
    /// APPLY pressed: the new parameter set to hand to the planet.
    Apply(PlanetParams),
    ToggleWireframe,
    ToggleVsync,
}

const SLIDER_COUNT: usize = 7;
const ROTATION_MAX: f32 = 30.0;

/// The planet parameter panel
pub struct PlanetPanel {
    pub visible: bool,
    pub panel_x: f32,
    pub panel_y: f32,
    pub sliders: [UiSlider; SLIDER_COUNT],
    /// Which slider is being dragged (-1 = none)
    pub dragging_slider: i32,
    /// Button bounds: x, y, w, h
    pub apply_button: (f32, f32, f32, f32),
    pub wireframe_button: (f32, f32, f32, f32),
    pub vsync_button: (f32, f32, f32, f32),
}

impl PlanetPanel {
    pub fn new(params: &PlanetParams) -> Self {
        let panel_x = 20.0;
        let panel_y = 80.0;
        let spacing = 50.0;

        Self {
            visible: false,
            panel_x,
            panel_y,
            sliders: [
                UiSlider::new(
                    "FREQUENCY",
                    panel_x,
                    panel_y,
                    unlerp(params.frequency, FREQUENCY_RANGE),
                    [0.4, 0.7, 1.0, 1.0],
                ),
                UiSlider::new(
                    "OCTAVES",
                    panel_x,
                    panel_y + spacing,
                    unlerp(params.octaves as f32, as_f32(OCTAVE_RANGE)),
                    [0.7, 0.5, 0.3, 1.0],
                ),
                UiSlider::new(
                    "AMPLITUDE",
                    panel_x,
                    panel_y + spacing * 2.0,
                    unlerp(params.amplitude, AMPLITUDE_RANGE),
                    [0.6, 0.6, 0.6, 1.0],
                ),
                UiSlider::new(
                    "MAX LOD",
                    panel_x,
                    panel_y + spacing * 3.0,
                    unlerp(params.max_lod as f32, as_f32(MAX_LOD_RANGE)),
                    [0.5, 0.8, 0.4, 1.0],
                ),
                UiSlider::new(
                    "CHUNK DEPTH",
                    panel_x,
                    panel_y + spacing * 4.0,
                    unlerp(params.chunk_depth as f32, as_f32(CHUNK_DEPTH_RANGE)),
                    [0.8, 0.7, 0.3, 1.0],
                ),
                UiSlider::new(
                    "ROTATION",
                    panel_x,
                    panel_y + spacing * 5.0,
                    (params.rotation_speed / ROTATION_MAX).clamp(0.0, 1.0),
                    [0.3, 0.6, 0.9, 1.0],
                ),
                UiSlider::new(
                    "SCALE",
                    panel_x,
                    panel_y + spacing * 6.0,
                    unlerp(params.scale, SCALE_RANGE),
                    [0.7, 0.4, 0.7, 1.0],
                ),
            ],
            dragging_slider: -1,
            wireframe_button: (panel_x, panel_y + spacing * 7.0 + 10.0, 95.0, 26.0),
            vsync_button: (panel_x + 105.0, panel_y + spacing * 7.0 + 10.0, 95.0, 26.0),
            apply_button: (panel_x, panel_y + spacing * 7.0 + 50.0, 200.0, 30.0),
        }
    }

    /// Toggle visibility, syncing sliders from the live params on open
    pub fn toggle(&mut self, params: &PlanetParams) {
        self.visible = !self.visible;
        if self.visible {
            self.sliders[0].value = unlerp(params.frequency, FREQUENCY_RANGE);
            self.sliders[1].value = unlerp(params.octaves as f32, as_f32(OCTAVE_RANGE));
            self.sliders[2].value = unlerp(params.amplitude, AMPLITUDE_RANGE);
            self.sliders[3].value = unlerp(params.max_lod as f32, as_f32(MAX_LOD_RANGE));
            self.sliders[4].value = unlerp(params.chunk_depth as f32, as_f32(CHUNK_DEPTH_RANGE));
            self.sliders[5].value = (params.rotation_speed / ROTATION_MAX).clamp(0.0, 1.0);
            self.sliders[6].value = unlerp(params.scale, SCALE_RANGE);
        }
    }

    /// Handle mouse press, returns true if the panel consumed the event
    pub fn on_mouse_press(&mut self, x: f32, y: f32) -> bool {
        if !self.visible {
            return false;
        }

        for (i, slider) in self.sliders.iter_mut().enumerate() {
            if slider.contains(x, y) {
                self.dragging_slider = i as i32;
                slider.value = slider.value_from_x(x);
                return true;
            }
        }

        in_button(self.apply_button, x, y)
            || in_button(self.wireframe_button, x, y)
            || in_button(self.vsync_button, x, y)
    }

    /// Handle mouse release, returning the action if a button was hit
    pub fn on_mouse_release(
        &mut self,
        x: f32,
        y: f32,
        params: &PlanetParams,
    ) -> Option<PanelAction> {
        if !self.visible {
            return None;
        }
        self.dragging_slider = -1;

        if in_button(self.apply_button, x, y) {
            return Some(PanelAction::Apply(self.build_params(params)));
        }
        if in_button(self.wireframe_button, x, y) {
            return Some(PanelAction::ToggleWireframe);
        }
        if in_button(self.vsync_button, x, y) {
            return Some(PanelAction::ToggleVsync);
        }
        None
    }

    /// Handle mouse drag
    pub fn on_mouse_move(&mut self, x: f32, _y: f32) {
        if self.dragging_slider >= 0 && (self.dragging_slider as usize) < SLIDER_COUNT {
            let idx = self.dragging_slider as usize;
            self.sliders[idx].value = self.sliders[idx].value_from_x(x);
        }
    }

    /// Slider values mapped back into a parameter set. Display settings not
    /// on a slider carry over from the live params.
    pub fn build_params(&self, current: &PlanetParams) -> PlanetParams {
        let mut params = current.clone();
        params.frequency = lerp(self.sliders[0].value, FREQUENCY_RANGE);
        params.octaves = lerp(self.sliders[1].value, as_f32(OCTAVE_RANGE)).round() as u32;
        params.amplitude = lerp(self.sliders[2].value, AMPLITUDE_RANGE);
        params.max_lod = lerp(self.sliders[3].value, as_f32(MAX_LOD_RANGE)).round() as u32;
        params.chunk_depth = lerp(self.sliders[4].value, as_f32(CHUNK_DEPTH_RANGE)).round() as u32;
        params.rotation_speed = self.sliders[5].value * ROTATION_MAX;
        params.scale = lerp(self.sliders[6].value, SCALE_RANGE);
        params.clamp();
        params
    }

    /// Generate the overlay mesh (2D quads in NDC)
    pub fn build_mesh(
        &self,
        params: &PlanetParams,
        screen_width: f32,
        screen_height: f32,
    ) -> UiMesh {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        if !self.visible {
            return UiMesh { vertices, indices };
        }

        let to_ndc = |x: f32, y: f32| -> [f32; 3] {
            [
                (x / screen_width) * 2.0 - 1.0,
                1.0 - (y / screen_height) * 2.0,
                0.0,
            ]
        };

        let text_color = [0.9, 0.9, 0.9, 1.0];
        let title_color = [1.0, 0.9, 0.5, 1.0];

        // Panel background
        let panel_w = 280.0;
        let panel_h = 470.0;
        let bg_color = [0.12, 0.12, 0.18, 0.92];
        add_quad(
            &mut vertices,
            &mut indices,
            to_ndc(self.panel_x - 10.0, self.panel_y - 50.0),
            to_ndc(self.panel_x + panel_w, self.panel_y - 50.0),
            to_ndc(self.panel_x + panel_w, self.panel_y + panel_h),
            to_ndc(self.panel_x - 10.0, self.panel_y + panel_h),
            bg_color,
        );

        draw_text(
            &mut vertices,
            &mut indices,
            "PLANET",
            self.panel_x + 80.0,
            self.panel_y - 35.0,
            2.5,
            title_color,
            screen_width,
            screen_height,
        );

        for slider in &self.sliders {
            draw_text(
                &mut vertices,
                &mut indices,
                slider.label,
                slider.x,
                slider.y - 18.0,
                2.0,
                text_color,
                screen_width,
                screen_height,
            );

            // Background track
            let track_color = [0.25, 0.25, 0.3, 1.0];
            add_quad(
                &mut vertices,
                &mut indices,
                to_ndc(slider.x, slider.y),
                to_ndc(slider.x + slider.width, slider.y),
                to_ndc(slider.x + slider.width, slider.y + slider.height),
                to_ndc(slider.x, slider.y + slider.height),
                track_color,
            );

            // Value fill
            let fill_width = slider.width * slider.value;
            add_quad(
                &mut vertices,
                &mut indices,
                to_ndc(slider.x, slider.y),
                to_ndc(slider.x + fill_width, slider.y),
                to_ndc(slider.x + fill_width, slider.y + slider.height),
                to_ndc(slider.x, slider.y + slider.height),
                slider.color,
            );

            // Handle indicator
            let handle_x = slider.x + fill_width - 4.0;
            let handle_color = [1.0, 1.0, 1.0, 1.0];
            add_quad(
                &mut vertices,
                &mut indices,
                to_ndc(handle_x, slider.y - 2.0),
                to_ndc(handle_x + 8.0, slider.y - 2.0),
                to_ndc(handle_x + 8.0, slider.y + slider.height + 2.0),
                to_ndc(handle_x, slider.y + slider.height + 2.0),
                handle_color,
            );
        }

        self.draw_toggle(
            &mut vertices,
            &mut indices,
            self.wireframe_button,
            "WIRE",
            params.wireframe,
            screen_width,
            screen_height,
        );
        self.draw_toggle(
            &mut vertices,
            &mut indices,
            self.vsync_button,
            "VSYNC",
            params.vsync,
            screen_width,
            screen_height,
        );

        // Apply button
        let (bx, by, bw, bh) = self.apply_button;
        let button_color = [0.3, 0.7, 0.4, 1.0];
        add_quad(
            &mut vertices,
            &mut indices,
            to_ndc(bx, by),
            to_ndc(bx + bw, by),
            to_ndc(bx + bw, by + bh),
            to_ndc(bx, by + bh),
            button_color,
        );
        draw_text(
            &mut vertices,
            &mut indices,
            "APPLY",
            bx + 70.0,
            by + 8.0,
            2.0,
            [1.0, 1.0, 1.0, 1.0],
            screen_width,
            screen_height,
        );

        UiMesh { vertices, indices }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_toggle(
        &self,
        vertices: &mut Vec<super::UiVertex>,
        indices: &mut Vec<u32>,
        bounds: (f32, f32, f32, f32),
        label: &str,
        on: bool,
        screen_width: f32,
        screen_height: f32,
    ) {
        let to_ndc = |x: f32, y: f32| -> [f32; 3] {
            [
                (x / screen_width) * 2.0 - 1.0,
                1.0 - (y / screen_height) * 2.0,
                0.0,
            ]
        };

        let (bx, by, bw, bh) = bounds;
        let color = if on {
            [0.35, 0.55, 0.8, 1.0]
        } else {
            [0.25, 0.25, 0.3, 1.0]
        };
        add_quad(
            vertices,
            indices,
            to_ndc(bx, by),
            to_ndc(bx + bw, by),
            to_ndc(bx + bw, by + bh),
            to_ndc(bx, by + bh),
            color,
        );
        draw_text(
            vertices,
            indices,
            label,
            bx + 12.0,
            by + 6.0,
            2.0,
            [1.0, 1.0, 1.0, 1.0],
            screen_width,
            screen_height,
        );
    }
}

fn in_button(bounds: (f32, f32, f32, f32), x: f32, y: f32) -> bool {
    let (bx, by, bw, bh) = bounds;
    x >= bx && x <= bx + bw && y >= by && y <= by + bh
}

fn lerp(t: f32, range: (f32, f32)) -> f32 {
    range.0 + t * (range.1 - range.0)
}

fn unlerp(value: f32, range: (f32, f32)) -> f32 {
    ((value - range.0) / (range.1 - range.0)).clamp(0.0, 1.0)
}

fn as_f32(range: (u32, u32)) -> (f32, f32) {
    (range.0 as f32, range.1 as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_panel_ignores_input() {
        let params = PlanetParams::default();
        let mut panel = PlanetPanel::new(&params);
        assert!(!panel.on_mouse_press(25.0, 85.0));
        assert!(panel.on_mouse_release(25.0, 85.0, &params).is_none());
    }

    #[test]
    fn test_slider_roundtrip_preserves_params() {
        let params = PlanetParams::default();
        let mut panel = PlanetPanel::new(&params);
        panel.toggle(&params);

        let rebuilt = panel.build_params(&params);
        assert!((rebuilt.frequency - params.frequency).abs() < 0.05);
        assert_eq!(rebuilt.octaves, params.octaves);
        assert_eq!(rebuilt.max_lod, params.max_lod);
        assert_eq!(rebuilt.chunk_depth, params.chunk_depth);
        assert!((rebuilt.scale - params.scale).abs() < 0.01);
    }

    #[test]
    fn test_apply_button_returns_params() {
        let params = PlanetParams::default();
        let mut panel = PlanetPanel::new(&params);
        panel.toggle(&params);

        let (bx, by, ..) = panel.apply_button;
        assert!(panel.on_mouse_press(bx + 5.0, by + 5.0));
        match panel.on_mouse_release(bx + 5.0, by + 5.0, &params) {
            Some(PanelAction::Apply(_)) => {}
            _ => panic!("expected apply action"),
        }
    }

    #[test]
    fn test_drag_moves_only_grabbed_slider() {
        let params = PlanetParams::default();
        let mut panel = PlanetPanel::new(&params);
        panel.toggle(&params);

        let other_before = panel.sliders[1].value;
        let slider = panel.sliders[0];
        assert!(panel.on_mouse_press(slider.x + slider.width, slider.y + 5.0));
        panel.on_mouse_move(slider.x + slider.width, 0.0);
        assert_eq!(panel.sliders[0].value, 1.0);
        assert_eq!(panel.sliders[1].value, other_before);
    }
}
