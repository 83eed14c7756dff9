//! Play / pause / single-step state machine and body selection

use serde::{Deserialize, Serialize};

use super::body::BodyId;
use crate::Vector2;

/// Whether the loop should advance the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    Paused,
    Running,
    /// Run exactly one step, then fall back to `Paused`
    SingleStep,
}

/// External control commands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    TogglePlay,
    /// Single step when paused; pauses when running
    Step,
    Select(BodyId),
    Deselect,
    /// Velocity imposed on the selected body each step
    SetSelectedVelocity(Vector2),
    /// Leave the loop after the current step
    Stop,
}

/// Mode, selection and stop flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationControl {
    pub mode: ControlMode,
    pub selected: Option<BodyId>,
    /// Velocity override for the selected body
    pub drag_velocity: Option<Vector2>,
    pub stop_requested: bool,
}

impl SimulationControl {
    pub fn new(autoplay: bool) -> Self {
        Self {
            mode: if autoplay {
                ControlMode::Running
            } else {
                ControlMode::Paused
            },
            selected: None,
            drag_velocity: None,
            stop_requested: false,
        }
    }

    /// Apply a mode command. Selection commands are handled by the owner,
    /// which knows which bodies exist.
    pub fn apply_mode(&mut self, command: Command) {
        self.mode = match (command, self.mode) {
            (Command::Play, _) => ControlMode::Running,
            (Command::Pause, _) => ControlMode::Paused,
            (Command::TogglePlay, ControlMode::Running) => ControlMode::Paused,
            (Command::TogglePlay, _) => ControlMode::Running,
            (Command::Step, ControlMode::Running) => ControlMode::Paused,
            (Command::Step, _) => ControlMode::SingleStep,
            (Command::Stop, mode) => {
                self.stop_requested = true;
                mode
            }
            (_, mode) => mode,
        };
    }

    /// Mark a body as selected, dropping any previous drag
    pub fn select(&mut self, id: BodyId) {
        self.selected = Some(id);
        self.drag_velocity = None;
    }

    /// Clear the selection; returns the body that was selected
    pub fn deselect(&mut self) -> Option<BodyId> {
        self.drag_velocity = None;
        self.selected.take()
    }

    /// Set the drag velocity; ignored with nothing selected
    pub fn set_drag(&mut self, velocity: Vector2) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.drag_velocity = Some(velocity);
        true
    }

    /// Drag override for a body, if it is the selected one
    pub fn drag_for(&self, id: BodyId) -> Option<Vector2> {
        match self.selected {
            Some(selected) if selected == id => self.drag_velocity,
            _ => None,
        }
    }

    pub fn should_step(&self) -> bool {
        matches!(self.mode, ControlMode::Running | ControlMode::SingleStep)
    }

    /// Bookkeeping after a step ran
    pub fn finish_step(&mut self) {
        if self.mode == ControlMode::SingleStep {
            self.mode = ControlMode::Paused;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_follows_autoplay() {
        assert_eq!(SimulationControl::new(true).mode, ControlMode::Running);
        assert_eq!(SimulationControl::new(false).mode, ControlMode::Paused);
    }

    #[test]
    fn test_toggle_play() {
        let mut control = SimulationControl::new(false);
        control.apply_mode(Command::TogglePlay);
        assert_eq!(control.mode, ControlMode::Running);
        control.apply_mode(Command::TogglePlay);
        assert_eq!(control.mode, ControlMode::Paused);
    }

    #[test]
    fn test_single_step_returns_to_paused() {
        let mut control = SimulationControl::new(false);
        assert!(!control.should_step());

        control.apply_mode(Command::Step);
        assert_eq!(control.mode, ControlMode::SingleStep);
        assert!(control.should_step());

        control.finish_step();
        assert_eq!(control.mode, ControlMode::Paused);
        assert!(!control.should_step());
    }

    #[test]
    fn test_step_while_running_pauses() {
        let mut control = SimulationControl::new(true);
        control.apply_mode(Command::Step);
        assert_eq!(control.mode, ControlMode::Paused);
    }

    #[test]
    fn test_finish_step_keeps_running() {
        let mut control = SimulationControl::new(true);
        control.finish_step();
        assert_eq!(control.mode, ControlMode::Running);
    }

    #[test]
    fn test_drag_requires_selection() {
        let mut control = SimulationControl::new(true);
        assert!(!control.set_drag(Vector2::new(1.0, 0.0)));
        assert_eq!(control.drag_velocity, None);

        control.select(3);
        assert!(control.set_drag(Vector2::new(1.0, 0.0)));
        assert_eq!(control.drag_for(3), Some(Vector2::new(1.0, 0.0)));
        assert_eq!(control.drag_for(4), None);

        assert_eq!(control.deselect(), Some(3));
        assert_eq!(control.drag_for(3), None);
    }

    #[test]
    fn test_stop_keeps_mode() {
        let mut control = SimulationControl::new(true);
        control.apply_mode(Command::Stop);
        assert!(control.stop_requested);
        assert_eq!(control.mode, ControlMode::Running);
    }
}
