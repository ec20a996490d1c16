//! Frame Resource Ring
//!
//! Three independently owned sets of per-frame GPU resources, cycled every
//! frame so the CPU can build frame F+1 while the GPU still consumes frame F.
//! A slot is only rewritten once the fence reports its last submission
//! complete; that wait is the sole backpressure in the steady-state loop and
//! caps the CPU at `FRAME_COUNT` frames ahead of the GPU.
//!
//! [`FrameSync`] holds the pure bookkeeping (ring index, recorded fence
//! values, the strictly increasing next value) and has no GPU dependency, so
//! the reuse-wait protocol is exercised directly by integration tests.
//! [`FrameRing`] pairs that bookkeeping with the actual wgpu buffers and
//! waits by polling the device, since that is what delivers the queue's
//! completion callbacks on native backends.

use super::fence::RenderFence;
use super::render_item::{OBJECT_CAPACITY, OBJECT_UNIFORM_STRIDE};
use super::uniforms::FrameUniforms;

/// Number of frames that may be in flight at once.
pub const FRAME_COUNT: usize = 3;

/// Ring-index and fence-value bookkeeping for the frame resource ring.
///
/// Invariants:
/// - `next_value` is strictly increasing; fence values are never reused.
/// - A slot's recorded value is only updated by [`FrameSync::end_frame`],
///   i.e. after the frame's commands were submitted, never before. Waiting
///   on the previous recorded value is therefore always a conservative bound.
pub struct FrameSync {
    fence_values: [u64; FRAME_COUNT],
    current: usize,
    next_value: u64,
}

impl FrameSync {
    pub fn new() -> Self {
        Self {
            fence_values: [0; FRAME_COUNT],
            current: 0,
            next_value: 1,
        }
    }

    /// Advance to the next ring slot without waiting. Returns the slot index
    /// and the fence value that must complete before the slot is rewritten.
    pub fn advance(&mut self) -> (usize, u64) {
        self.current = (self.current + 1) % FRAME_COUNT;
        (self.current, self.fence_values[self.current])
    }

    /// Advance to the next ring slot, blocking until the GPU has finished the
    /// slot's previous submission. Returns the slot index now safe to write.
    ///
    /// Only valid when something else delivers fence signals (another thread
    /// in tests). The real render loop goes through [`FrameRing::begin_frame`],
    /// which drives callback delivery itself.
    pub fn begin_frame(&mut self, fence: &RenderFence) -> usize {
        let (slot, recorded) = self.advance();
        if recorded > fence.completed_value() {
            log::trace!("[FrameSync] waiting for fence {} on slot {}", recorded, slot);
            fence.wait_until(recorded);
        }
        slot
    }

    /// Record a fresh fence value against the current slot. Call after the
    /// frame's command buffer has been submitted; the returned value must be
    /// signaled on the fence when that submission completes.
    pub fn end_frame(&mut self) -> u64 {
        let value = self.next_value;
        self.next_value += 1;
        self.fence_values[self.current] = value;
        value
    }

    /// Slot index currently owned by the CPU.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Fence value recorded against a slot (0 = never submitted).
    pub fn recorded_value(&self, slot: usize) -> u64 {
        self.fence_values[slot]
    }
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

/// One ring slot's GPU resources.
///
/// The dynamic vertex/index buffers are sized for the worst-case planet
/// tessellation up front; regenerated geometry is uploaded with
/// `queue.write_buffer`, never by mutating a buffer a previous frame's
/// submission may still read.
pub struct FrameSlot {
    /// Per-frame constants (view-projection, camera, light, fog).
    pub frame_uniforms: wgpu::Buffer,
    /// Per-object constants, `OBJECT_UNIFORM_STRIDE`-aligned slots.
    pub object_uniforms: wgpu::Buffer,
    /// Dynamic planet vertex buffer for this frame.
    pub vertex_buffer: wgpu::Buffer,
    /// Dynamic planet index buffer for this frame.
    pub index_buffer: wgpu::Buffer,
    /// Planet geometry version last uploaded into this slot. The draw range
    /// itself lives on the render item.
    pub geometry_version: u64,
}

impl FrameSlot {
    fn new(device: &wgpu::Device, slot: usize, vertex_bytes: u64, index_bytes: u64) -> Self {
        let frame_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Frame Uniforms {}", slot)),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Object Uniforms {}", slot)),
            size: OBJECT_CAPACITY as u64 * OBJECT_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Planet Vertex Buffer {}", slot)),
            size: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Planet Index Buffer {}", slot)),
            size: index_bytes,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            frame_uniforms,
            object_uniforms,
            vertex_buffer,
            index_buffer,
            geometry_version: 0,
        }
    }
}

/// The full frame-resource ring: bookkeeping plus GPU buffers.
pub struct FrameRing {
    pub slots: Vec<FrameSlot>,
    sync: FrameSync,
    fence: RenderFence,
}

impl FrameRing {
    /// Allocate all `FRAME_COUNT` slots up front. `vertex_bytes` and
    /// `index_bytes` size the dynamic geometry buffers for the maximum
    /// expected planet tessellation.
    pub fn new(device: &wgpu::Device, vertex_bytes: u64, index_bytes: u64) -> Self {
        let slots = (0..FRAME_COUNT)
            .map(|i| FrameSlot::new(device, i, vertex_bytes, index_bytes))
            .collect();
        log::info!(
            "[FrameRing] {} slots, {} KB vertices + {} KB indices each",
            FRAME_COUNT,
            vertex_bytes / 1024,
            index_bytes / 1024
        );
        Self {
            slots,
            sync: FrameSync::new(),
            fence: RenderFence::new(),
        }
    }

    /// Advance the ring, waiting out any in-flight use of the next slot, and
    /// hand back its index. The returned slot's buffers are safe to write.
    ///
    /// The wait polls the device rather than parking on the fence: on native
    /// wgpu the `on_submitted_work_done` callbacks that signal the fence are
    /// delivered only from `queue.submit` or `device.poll`, so with a single
    /// render thread a bare condvar wait would leave the pending signal
    /// undelivered forever.
    pub fn begin_frame(&mut self, device: &wgpu::Device) -> usize {
        let (slot, recorded) = self.sync.advance();
        if recorded > self.fence.completed_value() {
            log::trace!("[FrameRing] waiting for fence {} on slot {}", recorded, slot);
        }
        drive_fence(&self.fence, recorded, || poll_device(device));
        slot
    }

    /// Record the just-submitted frame against the current slot and schedule
    /// the fence signal on GPU completion.
    pub fn end_frame(&mut self, queue: &wgpu::Queue) {
        let value = self.sync.end_frame();
        let fence = self.fence.clone();
        queue.on_submitted_work_done(move || fence.signal(value));
    }

    /// Block until every in-flight frame has completed. Used at shutdown and
    /// before destroying resources the GPU may still reference. Polls the
    /// device for the same reason as [`FrameRing::begin_frame`].
    pub fn flush(&self, device: &wgpu::Device) {
        let last = self
            .sync
            .fence_values
            .iter()
            .copied()
            .max()
            .unwrap_or(0);
        drive_fence(&self.fence, last, || poll_device(device));
    }

    pub fn current_slot(&self) -> &FrameSlot {
        &self.slots[self.sync.current()]
    }

    pub fn current_slot_mut(&mut self) -> &mut FrameSlot {
        &mut self.slots[self.sync.current()]
    }

    pub fn fence(&self) -> &RenderFence {
        &self.fence
    }

    pub fn sync(&self) -> &FrameSync {
        &self.sync
    }
}

/// Wait for `value` by repeatedly driving `poll` until the fence catches up.
/// `poll` returns false to abandon the wait (device error).
fn drive_fence(fence: &RenderFence, value: u64, mut poll: impl FnMut() -> bool) {
    while fence.completed_value() < value {
        if !poll() {
            break;
        }
    }
}

/// One blocking device poll. `PollType::Wait` blocks until the queue drains
/// and processes pending `on_submitted_work_done` callbacks, which is what
/// delivers the fence signals [`drive_fence`] is waiting on.
fn poll_device(device: &wgpu::Device) -> bool {
    match device.poll(wgpu::PollType::wait_indefinitely()) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("[FrameRing] device poll failed: {:?}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_fence_returns_without_polling_when_complete() {
        let fence = RenderFence::new();
        fence.signal(3);
        drive_fence(&fence, 3, || panic!("no poll needed"));
    }

    #[test]
    fn test_drive_fence_delivers_signals_through_poll() {
        // Completion callbacks only run while the device is polled, so the
        // wait must keep polling instead of parking on the condvar.
        let fence = RenderFence::new();
        let callback_fence = fence.clone();
        let mut pending = vec![2u64, 1];
        drive_fence(&fence, 2, || {
            callback_fence.signal(pending.pop().unwrap());
            true
        });
        assert_eq!(fence.completed_value(), 2);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_drive_fence_stops_on_poll_failure() {
        let fence = RenderFence::new();
        let mut polls = 0;
        drive_fence(&fence, 5, || {
            polls += 1;
            false
        });
        assert_eq!(polls, 1);
    }

    #[test]
    fn test_slot_reuse_wait_drains_pending_completions() {
        // Three submitted frames, none completed; wrapping to the oldest
        // slot must block until a poll delivers that slot's signal.
        let fence = RenderFence::new();
        let mut sync = FrameSync::new();
        let mut values = Vec::new();
        for _ in 0..FRAME_COUNT {
            sync.advance();
            values.push(sync.end_frame());
        }

        let (slot, recorded) = sync.advance();
        assert_eq!(slot, 0);
        assert_eq!(recorded, values[0]);

        let callback_fence = fence.clone();
        let mut completions = values.clone();
        completions.reverse();
        drive_fence(&fence, recorded, || {
            callback_fence.signal(completions.pop().unwrap());
            true
        });
        assert!(fence.completed_value() >= recorded);
    }
}
