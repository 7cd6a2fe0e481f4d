//! Hotkey shape selection.
//!
//! Keys `1`, `2` and `3` (top row or numpad) pick the sphere, cube and
//! pyramid. Hosts with a winit window forward their events here and apply the
//! pending selection once per frame:
//!
//! ```ignore
//! // in window_event
//! hotkeys.handle_event(&event);
//!
//! // before ticking
//! if let Some(shape) = hotkeys.take_selection() {
//!     sim.select_shape(shape);
//! }
//! ```

use crate::shapes::ShapeId;
use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Shape bound to a key, if any.
pub fn shape_for_key(key: KeyCode) -> Option<ShapeId> {
    match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(ShapeId::Sphere),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(ShapeId::Cube),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(ShapeId::Pyramid),
        _ => None,
    }
}

/// Collects hotkey presses between ticks.
///
/// Holding a key selects once; auto-repeat is ignored. If several hotkeys
/// are pressed within one frame the last one wins.
#[derive(Debug, Default)]
pub struct ShapeHotkeys {
    held: HashSet<KeyCode>,
    pending: Option<ShapeId>,
}

impl ShapeHotkeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(code) = event.physical_key {
                self.handle_key(code, event.state);
            }
        }
    }

    /// Process a key transition.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Only fire if not already held (no repeat)
                if self.held.insert(key) {
                    if let Some(shape) = shape_for_key(key) {
                        self.pending = Some(shape);
                    }
                }
            }
            ElementState::Released => {
                self.held.remove(&key);
            }
        }
    }

    /// Take the selection made since the last call.
    pub fn take_selection(&mut self) -> Option<ShapeId> {
        self.pending.take()
    }
}
