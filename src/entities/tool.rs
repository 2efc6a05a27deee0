//! Brush tools and the pure tool-application function.
//!
//! Tools are a closed set, so they are a plain enum matched in `apply()`:
//! - Pen: paint brush color
//! - Eraser: paint background white
//! - Bucket: fill the WHOLE frame with brush color (uniform fill, not flood fill)
//! - Eyedropper: read the color under the cursor, never mutates
//!
//! Pen and Eraser expand over a square neighborhood of side `2k + 1` for
//! `brush_size = k`; pixels falling outside the frame are skipped.

use super::frame::{BLACK, Color, Frame, Point, WHITE};

/// Tool type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Bucket,
    Eyedropper,
}

impl ToolKind {
    /// All tools in toolbar order.
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Pen,
        ToolKind::Eraser,
        ToolKind::Bucket,
        ToolKind::Eyedropper,
    ];

    /// Convert to string for settings storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Eraser => "eraser",
            ToolKind::Bucket => "bucket",
            ToolKind::Eyedropper => "eyedropper",
        }
    }

    /// Parse from settings string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pen" => Some(ToolKind::Pen),
            "eraser" => Some(ToolKind::Eraser),
            "bucket" => Some(ToolKind::Bucket),
            "eyedropper" | "eyedrop" => Some(ToolKind::Eyedropper),
            _ => None,
        }
    }

    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::Eraser => "Eraser",
            ToolKind::Bucket => "Bucket",
            ToolKind::Eyedropper => "Eyedropper",
        }
    }

    /// Hotkey for this tool.
    pub fn hotkey(&self) -> &'static str {
        match self {
            ToolKind::Pen => "P",
            ToolKind::Eraser => "E",
            ToolKind::Bucket => "B",
            ToolKind::Eyedropper => "I",
        }
    }

    /// Slot in `ToolKind::ALL`
    pub fn index(&self) -> usize {
        match self {
            ToolKind::Pen => 0,
            ToolKind::Eraser => 1,
            ToolKind::Bucket => 2,
            ToolKind::Eyedropper => 3,
        }
    }
}

/// One tool instance with its own brush settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tool {
    pub kind: ToolKind,
    pub brush_size: u32,
    pub brush_color: Color,
}

impl Tool {
    /// Brush size 0 (single pixel), black
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            brush_size: 0,
            brush_color: BLACK,
        }
    }

    pub fn set_brush_settings(&mut self, size: u32, color: Color) {
        self.brush_size = size;
        self.brush_color = color;
    }
}

/// Result of applying a tool at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Buffer changed in place
    Mutate,
    /// Nothing changed, a color was read
    ColorSample(Color),
    /// Nothing to do (sample point outside the frame)
    None,
}

/// Apply `tool` to `buffer` at `point`.
pub fn apply(tool: &Tool, buffer: &mut Frame, point: Point) -> Effect {
    match tool.kind {
        ToolKind::Pen => {
            stamp(buffer, point, tool.brush_size, tool.brush_color);
            Effect::Mutate
        }
        ToolKind::Eraser => {
            stamp(buffer, point, tool.brush_size, WHITE);
            Effect::Mutate
        }
        ToolKind::Bucket => {
            buffer.fill(tool.brush_color);
            Effect::Mutate
        }
        ToolKind::Eyedropper => match buffer.pixel(point) {
            Some(color) => Effect::ColorSample(color),
            None => Effect::None,
        },
    }
}

/// Paint the clipped square neighborhood of `center`. Returns pixels written.
pub fn stamp(buffer: &mut Frame, center: Point, brush_size: u32, color: Color) -> usize {
    let (w, h) = buffer.dimensions();
    let k = i64::from(brush_size);
    // Clip the square to the frame first; the loop never visits outside pixels
    let x0 = (i64::from(center.x) - k).max(0);
    let x1 = (i64::from(center.x) + k).min(i64::from(w) - 1);
    let y0 = (i64::from(center.y) - k).max(0);
    let y1 = (i64::from(center.y) + k).min(i64::from(h) - 1);
    if x0 > x1 || y0 > y1 {
        return 0;
    }

    let image = buffer.image_mut();
    for y in y0..=y1 {
        for x in x0..=x1 {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
    ((x1 - x0 + 1) * (y1 - y0 + 1)) as usize
}
