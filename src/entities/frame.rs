//! Frame: one editable bitmap of the animation.
//!
//! **Why**: Every component (store, history, tools, player) works on whole
//! frames. A frame is a plain `RgbaImage`, so cloning it is a deep copy and
//! snapshots never alias the frame being edited.
//!
//! **Used by**: FrameStore (ownership), EditHistory (snapshots),
//! Toolbox (in-place brush edits), Player (preview events), project_io (PNG).
//!
//! # Coordinates
//!
//! `Point` is signed so pointer positions outside the canvas can be passed
//! through unchanged and clipped by whoever writes pixels.

use image::{Rgba, RgbaImage};

/// Pixel color (RGBA, 8 bits per channel)
pub type Color = Rgba<u8>;

/// Background color used for new frames and by the eraser
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Default brush color
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// Integer position in frame-pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Single animation frame (fixed size RGBA grid)
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: RgbaImage,
}

impl Frame {
    /// Create frame filled with the background color
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, WHITE)
    }

    /// Create frame filled with a uniform color
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Wrap an already decoded image
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Get resolution as tuple
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Convert a signed point to pixel coordinates, None if outside the frame
    pub fn to_pixel(&self, point: Point) -> Option<(u32, u32)> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        (x < self.width() && y < self.height()).then_some((x, y))
    }

    pub fn contains(&self, point: Point) -> bool {
        self.to_pixel(point).is_some()
    }

    /// Color at point, None if outside the frame
    pub fn pixel(&self, point: Point) -> Option<Color> {
        self.to_pixel(point).map(|(x, y)| *self.pixels.get_pixel(x, y))
    }

    /// Set pixel at point. Returns false (and does nothing) outside the frame.
    pub fn set_pixel(&mut self, point: Point, color: Color) -> bool {
        match self.to_pixel(point) {
            Some((x, y)) => {
                self.pixels.put_pixel(x, y, color);
                true
            }
            None => false,
        }
    }

    /// Fill every pixel with color
    pub fn fill(&mut self, color: Color) {
        for px in self.pixels.pixels_mut() {
            *px = color;
        }
    }

    /// True if every pixel equals color
    pub fn is_uniform(&self, color: Color) -> bool {
        self.pixels.pixels().all(|px| *px == color)
    }

    /// Copy of this frame at a new size, anchored top-left.
    /// New area is filled with the background color.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let mut out = RgbaImage::from_pixel(width, height, WHITE);
        let w = width.min(self.width());
        let h = height.min(self.height());
        for y in 0..h {
            for x in 0..w {
                out.put_pixel(x, y, *self.pixels.get_pixel(x, y));
            }
        }
        Self { pixels: out }
    }

    /// Underlying image (for encoders)
    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: New frame is background colored
    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(16, 8);
        assert_eq!(frame.dimensions(), (16, 8));
        assert!(frame.is_uniform(WHITE));
        assert_eq!(frame.as_raw().len(), 16 * 8 * 4);
    }

    /// Test: Pixel access outside bounds
    /// Validates: negative and overflowing points are rejected without panic
    #[test]
    fn test_out_of_bounds_access() {
        let mut frame = Frame::new(4, 4);
        assert_eq!(frame.pixel(Point::new(-1, 0)), None);
        assert_eq!(frame.pixel(Point::new(0, 4)), None);
        assert!(!frame.set_pixel(Point::new(4, 0), BLACK));
        assert!(frame.is_uniform(WHITE));

        assert!(frame.set_pixel(Point::new(3, 3), BLACK));
        assert_eq!(frame.pixel(Point::new(3, 3)), Some(BLACK));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Frame::new(2, 2);
        let mut copy = original.clone();
        copy.set_pixel(Point::new(0, 0), BLACK);
        assert_eq!(original.pixel(Point::new(0, 0)), Some(WHITE));
        assert_ne!(original, copy);
    }

    /// Test: Resize keeps top-left content
    /// Validates: crop on shrink, white fill on grow
    #[test]
    fn test_resized() {
        let mut frame = Frame::new(3, 3);
        frame.set_pixel(Point::new(0, 0), BLACK);
        frame.set_pixel(Point::new(2, 2), BLACK);

        let grown = frame.resized(5, 4);
        assert_eq!(grown.dimensions(), (5, 4));
        assert_eq!(grown.pixel(Point::new(0, 0)), Some(BLACK));
        assert_eq!(grown.pixel(Point::new(2, 2)), Some(BLACK));
        assert_eq!(grown.pixel(Point::new(4, 3)), Some(WHITE));

        let shrunk = frame.resized(2, 2);
        assert_eq!(shrunk.dimensions(), (2, 2));
        assert_eq!(shrunk.pixel(Point::new(0, 0)), Some(BLACK));
        assert_eq!(shrunk.pixel(Point::new(1, 1)), Some(WHITE));
    }
}
