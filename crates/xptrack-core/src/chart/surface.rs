//! Drawing surface abstraction.
//!
//! The renderer only requires fill-rect, stroked (optionally dashed)
//! lines, text drawing and text measurement from its host; that
//! capability set is this trait. The command sequence the renderer
//! issues is the contract; which graphics API replays it is the host's
//! business.

use serde::{Deserialize, Serialize};

/// Stroke style for lines and polylines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    /// On/off run lengths in surface units. `None` is a solid stroke.
    pub dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: None,
        }
    }

    pub fn dashed(color: &str, width: f64, dash: &[f64]) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Some(dash.to_vec()),
        }
    }
}

/// A 2D target the chart renders onto.
///
/// Every `render` call begins with `begin_frame`, which must discard any
/// previously drawn contents: rendering is idempotent and re-entrant,
/// never an accumulation of stale draw calls.
pub trait DrawSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    /// Reset the surface for a fresh frame.
    fn begin_frame(&mut self) {}

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &Stroke);
    fn stroke_polyline(&mut self, points: &[(f64, f64)], stroke: &Stroke);
    /// Draw `text` with its left edge at `x` and baseline at `y`.
    fn draw_text(&mut self, x: f64, y: f64, text: &str, size: f64, color: &str);
    /// Advance width of `text` at `size`.
    fn measure_text(&self, text: &str, size: f64) -> f64;
}

/// One recorded drawing operation, ready to replay on a host canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    StrokeLine {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Stroke,
    },
    StrokePolyline {
        points: Vec<(f64, f64)>,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        color: String,
    },
}

/// Surface that records commands instead of rasterizing.
///
/// The core generates these; the host frontend just replays them. Tests
/// assert against the recorded sequence.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokeLine {
            x1,
            y1,
            x2,
            y2,
            stroke: stroke.clone(),
        });
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], stroke: &Stroke) {
        self.commands.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, size: f64, color: &str) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            size,
            color: color.to_string(),
        });
    }

    // Good-enough advance estimate for layout; hosts with real font
    // metrics re-measure when replaying.
    fn measure_text(&self, text: &str, size: f64) -> f64 {
        text.chars().count() as f64 * size * 0.6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_discards_previous_commands() {
        let mut surface = RecordingSurface::new(100.0, 50.0);
        surface.fill_rect(0.0, 0.0, 100.0, 50.0, "#000000");
        assert_eq!(surface.commands().len(), 1);
        surface.begin_frame();
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn commands_serialize_with_op_tags() {
        let mut surface = RecordingSurface::new(100.0, 50.0);
        surface.stroke_line(0.0, 0.0, 10.0, 10.0, &Stroke::dashed("#fff", 1.0, &[4.0, 4.0]));
        let json = serde_json::to_string(surface.commands()).unwrap();
        assert!(json.contains("\"op\":\"stroke_line\""));
        assert!(json.contains("[4.0,4.0]"));

        let parsed: Vec<DrawCommand> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, surface.commands());
    }

    #[test]
    fn measured_width_scales_with_text_and_size() {
        let surface = RecordingSurface::new(100.0, 50.0);
        let short = surface.measure_text("7", 12.0);
        let long = surface.measure_text("7000", 12.0);
        assert!(long > short);
        assert!(surface.measure_text("7", 24.0) > short);
    }
}
