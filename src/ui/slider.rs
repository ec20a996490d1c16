//! UI Slider
//!
//! A horizontal slider widget with a normalized 0..1 value.

/// A single parameter slider.
#[derive(Clone, Copy)]
pub struct UiSlider {
    /// Label drawn above the track
    pub label: &'static str,
    /// Screen position (pixels from top-left)
    pub x: f32,
    pub y: f32,
    /// Track dimensions
    pub width: f32,
    pub height: f32,
    /// Current value (0.0 to 1.0)
    pub value: f32,
    /// Fill color
    pub color: [f32; 4],
}

impl UiSlider {
    pub fn new(label: &'static str, x: f32, y: f32, value: f32, color: [f32; 4]) -> Self {
        Self {
            label,
            x,
            y,
            width: 200.0,
            height: 22.0,
            value,
            color,
        }
    }

    /// Check if a point is within the track
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Value from a mouse X position over the track
    pub fn value_from_x(&self, px: f32) -> f32 {
        ((px - self.x) / self.width).clamp(0.0, 1.0)
    }
}
