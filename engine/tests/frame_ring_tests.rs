//! Frame Ring Tests - Fence Protocol and Dirty Propagation
//!
//! Tests for the CPU/GPU synchronization bookkeeping: the render fence, the
//! three-slot ring advance/wait protocol, and the render-item dirty counter
//! that pushes transform updates through every ring slot exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use icoplanet_engine::render::{FrameSync, RenderFence, RenderItem, FRAME_COUNT};

// ============================================================================
// RenderFence
// ============================================================================

#[test]
fn test_fence_starts_at_zero() {
    let fence = RenderFence::new();
    assert_eq!(fence.completed_value(), 0);
}

#[test]
fn test_fence_signal_is_monotonic() {
    let fence = RenderFence::new();
    fence.signal(5);
    fence.signal(3); // out-of-order completion must not move backwards
    assert_eq!(fence.completed_value(), 5);
    fence.signal(8);
    assert_eq!(fence.completed_value(), 8);
}

#[test]
fn test_fence_wait_returns_when_already_signaled() {
    let fence = RenderFence::new();
    fence.signal(4);
    fence.wait_until(4); // must not block
    fence.wait_until(2);
}

#[test]
fn test_fence_wait_blocks_until_cross_thread_signal() {
    let fence = RenderFence::new();
    let signaled = Arc::new(AtomicBool::new(false));

    let fence_clone = fence.clone();
    let signaled_clone = Arc::clone(&signaled);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        signaled_clone.store(true, Ordering::SeqCst);
        fence_clone.signal(1);
    });

    fence.wait_until(1);
    assert!(signaled.load(Ordering::SeqCst));
    handle.join().unwrap();
}

// ============================================================================
// FrameSync Ring Protocol
// ============================================================================

#[test]
fn test_ring_cycles_through_all_slots() {
    let fence = RenderFence::new();
    let mut sync = FrameSync::new();

    let mut seen = Vec::new();
    for _ in 0..FRAME_COUNT {
        seen.push(sync.begin_frame(&fence));
        let value = sync.end_frame();
        fence.signal(value);
    }
    seen.sort();
    assert_eq!(seen, (0..FRAME_COUNT).collect::<Vec<_>>());
}

#[test]
fn test_fence_values_strictly_increase() {
    let fence = RenderFence::new();
    let mut sync = FrameSync::new();

    let mut last = 0;
    for _ in 0..10 {
        sync.begin_frame(&fence);
        let value = sync.end_frame();
        assert!(value > last);
        last = value;
        fence.signal(value);
    }
}

#[test]
fn test_slot_records_its_submission_value() {
    let fence = RenderFence::new();
    let mut sync = FrameSync::new();

    let slot = sync.begin_frame(&fence);
    let value = sync.end_frame();
    assert_eq!(sync.recorded_value(slot), value);
    fence.signal(value);
}

#[test]
fn test_begin_frame_waits_for_slot_reuse() {
    // Submit FRAME_COUNT frames without completing any, then complete them
    // from another thread. Wrapping back to the first slot must block until
    // that slot's submission is signaled.
    let fence = RenderFence::new();
    let mut sync = FrameSync::new();

    let mut values = Vec::new();
    for _ in 0..FRAME_COUNT {
        sync.begin_frame(&fence);
        values.push(sync.end_frame());
    }

    let first_value = values[0];
    let completed = Arc::new(AtomicBool::new(false));
    let fence_clone = fence.clone();
    let completed_clone = Arc::clone(&completed);
    let gpu = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        completed_clone.store(true, Ordering::SeqCst);
        fence_clone.signal(first_value);
    });

    // Wraps to the oldest slot; must block until the "GPU" signals it
    sync.begin_frame(&fence);
    assert!(completed.load(Ordering::SeqCst));
    gpu.join().unwrap();
}

#[test]
fn test_unused_ring_never_waits() {
    // Recorded values start at 0, which the fence always satisfies, so the
    // first lap through the ring must not block even with no signals at all.
    let fence = RenderFence::new();
    let mut sync = FrameSync::new();
    for _ in 0..FRAME_COUNT {
        sync.begin_frame(&fence);
        sync.end_frame();
    }
}

// ============================================================================
// RenderItem Dirty Propagation
// ============================================================================

#[test]
fn test_world_update_reaches_each_slot_once() {
    let mut item = RenderItem::new(0);

    // Drain the initial dirtiness
    for _ in 0..FRAME_COUNT {
        assert!(item.take_dirty().is_some());
    }
    assert!(item.take_dirty().is_none());

    // One update marks exactly FRAME_COUNT flushes
    item.set_world(glam::Mat4::from_translation(glam::Vec3::X));
    let mut flushes = 0;
    while item.take_dirty().is_some() {
        flushes += 1;
    }
    assert_eq!(flushes, FRAME_COUNT);
}

#[test]
fn test_update_during_propagation_restarts_counter() {
    let mut item = RenderItem::new(1);
    assert!(item.take_dirty().is_some());

    // A second update before propagation finishes re-marks all slots
    item.set_world(glam::Mat4::from_translation(glam::Vec3::Y));
    assert_eq!(item.dirty_frames(), FRAME_COUNT as u32);
}
