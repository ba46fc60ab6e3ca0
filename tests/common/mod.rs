//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::cell::RefCell;
use std::rc::Rc;

/// Tracks notifications for testing.
///
/// Each field records the values passed to the corresponding notification.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// (zoom_percent,)
    pub zoom_changed: Rc<RefCell<Vec<i32>>>,
    /// (snap_to_grid,)
    pub snap_changed: Rc<RefCell<Vec<bool>>>,
    /// (pan_x, pan_y)
    pub pan_changed: Rc<RefCell<Vec<(f32, f32)>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded notifications.
    pub fn clear(&self) {
        self.zoom_changed.borrow_mut().clear();
        self.snap_changed.borrow_mut().clear();
        self.pan_changed.borrow_mut().clear();
    }

    pub fn last_zoom(&self) -> Option<i32> {
        self.zoom_changed.borrow().last().copied()
    }

    pub fn last_pan(&self) -> Option<(f32, f32)> {
        self.pan_changed.borrow().last().copied()
    }
}
