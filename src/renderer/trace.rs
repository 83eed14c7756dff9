//! Renderer that writes frames to the log instead of a screen

use super::{Frame, Renderer};

/// Logs a telemetry summary at a fixed interval and, on traced frames, one
/// diagnostic line per body
#[derive(Debug, Clone)]
pub struct LogRenderer {
    /// Ticks between summaries; 0 disables them
    pub summary_every: u64,
    frames: u64,
}

impl LogRenderer {
    pub fn new(summary_every: u64) -> Self {
        Self {
            summary_every,
            frames: 0,
        }
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Per-body diagnostic lines; empty unless the frame asks for tracing
    pub fn trace_lines(&self, frame: &Frame<'_>) -> Vec<String> {
        if !frame.trace {
            return Vec::new();
        }
        frame
            .bodies
            .iter()
            .map(|body| {
                let comment = if frame.selected == Some(body.id) {
                    format!("#{} selected", body.id)
                } else {
                    format!("#{}", body.id)
                };
                body.trace_line(&comment)
            })
            .collect()
    }

    /// Telemetry line for a frame, if one is due
    pub fn summary_line(&self, frame: &Frame<'_>) -> Option<String> {
        let report = frame.report?;
        if self.summary_every == 0 || frame.tick % self.summary_every != 0 {
            return None;
        }
        let c = &report.conservation;
        Some(format!(
            "tick {}: {} bodies, momentum [{:.3},{:.3}], energy {:.3}, {} collisions, {} wall bounces",
            frame.tick,
            frame.bodies.len(),
            c.momentum.x,
            c.momentum.y,
            c.energy,
            report.collisions,
            report.wall_bounces
        ))
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frames += 1;

        for line in self.trace_lines(frame) {
            log::debug!("{}", line);
        }

        if let Some(line) = self.summary_line(frame) {
            log::info!("{}", line);
        }
    }
}
