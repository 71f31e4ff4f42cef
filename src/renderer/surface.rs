//! Drawing surface abstraction
//!
//! The ticket is described as a list of `DrawOp`s; a `Surface` replays them.
//! The browser backs this with a 2D canvas, tests with `RecordingSurface`.

use crate::error::RenderError;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// Vertical text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

impl TextBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Middle => "middle",
        }
    }
}

/// One drawing primitive, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: &'static str,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: &'static str,
        line_width: f64,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: &'static str,
        line_width: f64,
        /// (dash, gap) for dashed lines
        dash: Option<(f64, f64)>,
    },
    /// Filled circle with an outline ring
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: &'static str,
        ring: &'static str,
        ring_width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        font: &'static str,
        color: &'static str,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

/// Finished ticket image
#[derive(Debug, Clone, PartialEq)]
pub struct TicketImage {
    pub width: u32,
    pub height: u32,
    /// Downloadable reference (a `data:image/png` URL in the browser)
    pub href: String,
}

/// Raster target for the ticket
pub trait Surface {
    /// Acquire a fresh drawing area of the given size
    fn begin(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn draw(&mut self, op: &DrawOp) -> Result<(), RenderError>;

    /// Encode what was drawn as a PNG
    fn finish(&mut self) -> Result<TicketImage, RenderError>;
}

/// Surface that keeps the op list instead of pixels
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<DrawOp>,
    /// Simulates a browser refusing a 2D context
    pub unavailable: bool,
    pub begun: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose `begin` always fails
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Text drawn with the given font, in draw order
    pub fn texts_in_font(&self, font: &str) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, font: f, .. } if *f == font => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Circles in draw order
    pub fn circles(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if self.unavailable {
            return Err(RenderError::SurfaceUnavailable("no 2d context".into()));
        }
        self.width = width;
        self.height = height;
        self.ops.clear();
        self.begun = true;
        Ok(())
    }

    fn draw(&mut self, op: &DrawOp) -> Result<(), RenderError> {
        self.ops.push(op.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<TicketImage, RenderError> {
        Ok(TicketImage {
            width: self.width,
            height: self.height,
            href: format!("recording:{}-ops", self.ops.len()),
        })
    }
}
