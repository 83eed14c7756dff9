//! Rendering seam
//!
//! The simulation never draws. After each completed step the loop hands a
//! [`Frame`] to whatever implements [`Renderer`]: a window, a recorder in
//! tests, or the logging renderer used by the headless binary.

pub mod trace;

pub use trace::LogRenderer;

use crate::sim::{BodyId, BodySnapshot, Simulation, StepReport};

/// Everything a renderer may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Steps completed so far
    pub tick: u64,
    /// Bodies in ascending id order
    pub bodies: &'a [BodySnapshot],
    /// Body currently held by the pointer, drawn highlighted
    pub selected: Option<BodyId>,
    /// Report of the step that produced this frame; `None` for the initial
    /// frame and while paused
    pub report: Option<&'a StepReport>,
    /// Per-body diagnostics requested (toggled from input)
    pub trace: bool,
}

/// Consumer of read-only frames
pub trait Renderer {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Snapshot the simulation and hand one frame to a renderer
pub fn present<R: Renderer + ?Sized>(
    renderer: &mut R,
    sim: &Simulation,
    report: Option<&StepReport>,
    trace: bool,
) {
    let bodies = sim.snapshot();
    renderer.render(&Frame {
        tick: sim.time_ticks,
        bodies: &bodies,
        selected: sim.selected(),
        report,
        trace,
    });
}
