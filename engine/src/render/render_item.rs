//! Render Items
//!
//! A render item is one drawable instance: a world matrix, a slot in the
//! per-object uniform buffer, and an index range into the frame's geometry
//! buffers. World-matrix updates are propagated through the frame ring with
//! a dirty counter: a change marks all `FRAME_COUNT` ring slots stale, and
//! each frame flushes the matrix into exactly one slot's buffer, so every
//! slot observes every update exactly once before the item goes clean.

use glam::Mat4;

use super::frame_ring::FRAME_COUNT;
use super::uniforms::ObjectUniforms;

/// Byte stride between per-object uniform slots. wgpu requires dynamic
/// uniform offsets to be 256-aligned on all current backends.
pub const OBJECT_UNIFORM_STRIDE: u64 = 256;

/// Maximum number of render items per frame slot.
pub const OBJECT_CAPACITY: usize = 16;

/// A drawable instance.
pub struct RenderItem {
    world: Mat4,
    dirty_frames: u32,
    /// Slot in the per-object uniform buffer (byte offset = slot * stride).
    pub object_slot: u32,
    /// Index range into the frame's index buffer. The renderer draws exactly
    /// this range; whoever uploads the item's geometry keeps it current.
    pub first_index: u32,
    pub index_count: u32,
    pub base_vertex: i32,
}

impl RenderItem {
    /// Create an item with an identity world matrix. Starts fully dirty so
    /// every ring slot receives the initial transform.
    pub fn new(object_slot: u32) -> Self {
        assert!((object_slot as usize) < OBJECT_CAPACITY);
        Self {
            world: Mat4::IDENTITY,
            dirty_frames: FRAME_COUNT as u32,
            object_slot,
            first_index: 0,
            index_count: 0,
            base_vertex: 0,
        }
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Replace the world matrix and mark all ring slots stale.
    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
        self.dirty_frames = FRAME_COUNT as u32;
    }

    /// Ring slots that still hold a stale copy of the world matrix.
    pub fn dirty_frames(&self) -> u32 {
        self.dirty_frames
    }

    /// Consume one dirty frame. Returns the uniforms to write into the
    /// active slot's object buffer, or `None` when this slot is already
    /// up to date. At most one decrement per frame.
    pub fn take_dirty(&mut self) -> Option<ObjectUniforms> {
        if self.dirty_frames == 0 {
            return None;
        }
        self.dirty_frames -= 1;
        Some(ObjectUniforms::from_world(self.world))
    }

    /// Byte offset of this item's slot in the per-object uniform buffer.
    pub fn uniform_offset(&self) -> u64 {
        self.object_slot as u64 * OBJECT_UNIFORM_STRIDE
    }

    /// Write this item's world matrix into the active frame slot's object
    /// buffer if that slot is stale.
    pub fn flush(&mut self, queue: &wgpu::Queue, object_uniforms: &wgpu::Buffer) {
        if let Some(uniforms) = self.take_dirty() {
            queue.write_buffer(
                object_uniforms,
                self.uniform_offset(),
                bytemuck::bytes_of(&uniforms),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_starts_dirty() {
        let item = RenderItem::new(0);
        assert_eq!(item.dirty_frames(), FRAME_COUNT as u32);
    }

    #[test]
    fn test_take_dirty_decrements_to_zero() {
        let mut item = RenderItem::new(0);
        for _ in 0..FRAME_COUNT {
            assert!(item.take_dirty().is_some());
        }
        assert!(item.take_dirty().is_none());
        assert_eq!(item.dirty_frames(), 0);
    }

    #[test]
    fn test_uniform_offset_follows_slot() {
        let item = RenderItem::new(2);
        assert_eq!(item.uniform_offset(), 2 * OBJECT_UNIFORM_STRIDE);
    }

    #[test]
    fn test_new_item_draws_nothing() {
        // Until geometry is uploaded the draw range must be empty
        let item = RenderItem::new(0);
        assert_eq!(item.first_index, 0);
        assert_eq!(item.index_count, 0);
        assert_eq!(item.base_vertex, 0);
    }
}
