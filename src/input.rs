//! Raw input events to simulation commands
//!
//! Platform layers translate their own key and pointer events into
//! [`InputEvent`]s. Pointer positions arrive in screen space (origin top-left,
//! y down) and are flipped into world space here.
//!
//! Bindings:
//! - Enter: toggle play/pause
//! - Space: single step when paused, pause when running
//! - Ctrl: toggle per-body tracing
//! - Escape or window close: stop
//! - Pointer down/up: grab or release the body under the pointer
//! - Pointer held: drag the grabbed body toward the pointer

use crate::Vector2;
use crate::sim::{Command, ControlMode, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Control,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Primary button pressed at a screen position
    PointerDown(Vector2),
    PointerUp,
    /// Pointer moved to a screen position
    PointerMove(Vector2),
    Quit,
}

/// Tracks the pointer and turns events into commands
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    world_height: f64,
    /// Last pointer position, world space
    pointer: Option<Vector2>,
    /// Per-body tracing requested by the user
    pub trace: bool,
}

impl InputDispatcher {
    pub fn new(world_height: f64) -> Self {
        Self {
            world_height,
            pointer: None,
            trace: false,
        }
    }

    /// Screen position to world position
    #[inline]
    pub fn to_world(&self, screen: Vector2) -> Vector2 {
        Vector2::new(screen.x, self.world_height - screen.y)
    }

    pub fn pointer(&self) -> Option<Vector2> {
        self.pointer
    }

    /// Command for a single event, if any
    pub fn translate(&mut self, event: InputEvent, sim: &Simulation) -> Option<Command> {
        match event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => Some(Command::Stop),
            InputEvent::KeyDown(Key::Enter) => Some(Command::TogglePlay),
            InputEvent::KeyDown(Key::Space) => Some(Command::Step),
            InputEvent::KeyDown(Key::Control) => {
                self.trace = !self.trace;
                log::info!("Tracing {}", if self.trace { "on" } else { "off" });
                None
            }
            InputEvent::KeyDown(Key::Other) => None,
            InputEvent::PointerDown(screen) => {
                let point = self.to_world(screen);
                self.pointer = Some(point);
                sim.body_at(point).map(Command::Select)
            }
            InputEvent::PointerUp => sim.selected().map(|_| Command::Deselect),
            InputEvent::PointerMove(screen) => {
                self.pointer = Some(self.to_world(screen));
                None
            }
        }
    }

    /// Translate an event and apply the result
    pub fn dispatch(&mut self, event: InputEvent, sim: &mut Simulation) {
        if let Some(command) = self.translate(event, sim) {
            sim.set_control(command);
        }
    }

    /// Per-frame bookkeeping before the step: pull the grabbed body toward
    /// the pointer, only while the simulation is allowed to advance
    pub fn frame(&self, sim: &mut Simulation) {
        if sim.mode() == ControlMode::Paused {
            return;
        }
        if let Some(pointer) = self.pointer {
            sim.drag_toward(pointer);
        }
    }
}
