//! Toolbox: the four persistent tool instances and the active-tool pointer.
//!
//! Each tool keeps its own brush size and color for the whole session;
//! selecting a tool only moves the pointer. Eyedropper samples are fed back
//! as the new Pen and Bucket color (the Eraser always paints white).

use log::{debug, trace};

use super::frame::{Color, Frame, Point};
use super::tool::{Effect, Tool, ToolKind, apply};
use crate::core::editor_events::{ColorChangedEvent, ToolChangedEvent};
use crate::core::event_bus::EditorEmitter;

/// Tool dispatcher
#[derive(Debug)]
pub struct Toolbox {
    tools: [Tool; 4],
    active: ToolKind,
    emitter: EditorEmitter,
}

impl Toolbox {
    /// All tools at size 0 / black, Pen active
    pub fn new(emitter: EditorEmitter) -> Self {
        Self {
            tools: ToolKind::ALL.map(Tool::new),
            active: ToolKind::Pen,
            emitter,
        }
    }

    /// Toolbox with a starting brush size for every tool and a pen color
    pub fn with_brush(emitter: EditorEmitter, size: u32, color: Color, active: ToolKind) -> Self {
        let mut toolbox = Self::new(emitter);
        for tool in toolbox.tools.iter_mut() {
            tool.brush_size = size;
        }
        toolbox.tools[ToolKind::Pen.index()].brush_color = color;
        toolbox.tools[ToolKind::Bucket.index()].brush_color = color;
        toolbox.active = active;
        toolbox
    }

    pub fn active_kind(&self) -> ToolKind {
        self.active
    }

    pub fn active(&self) -> &Tool {
        &self.tools[self.active.index()]
    }

    pub fn tool(&self, kind: ToolKind) -> &Tool {
        &self.tools[kind.index()]
    }

    /// Switch the active tool. Brush settings are not touched.
    pub fn select_tool(&mut self, kind: ToolKind) {
        self.active = kind;
        debug!("Tool selected: {}", kind.display_name());
        self.emitter.emit(ColorChangedEvent(self.active().brush_color));
        self.emitter.emit(ToolChangedEvent(kind));
    }

    /// Set size and color of the active tool
    pub fn set_brush_settings(&mut self, size: u32, color: Color) {
        let kind = self.active;
        self.tools[kind.index()].set_brush_settings(size, color);
        trace!("{} brush: size {} color {:?}", kind.display_name(), size, color.0);
    }

    /// Set the painting color shared by Pen and Bucket
    pub fn set_pen_color(&mut self, color: Color) {
        self.tools[ToolKind::Pen.index()].brush_color = color;
        self.tools[ToolKind::Bucket.index()].brush_color = color;
        self.emitter.emit(ColorChangedEvent(color));
    }

    /// Apply the active tool to `buffer` at `point`
    pub fn draw(&mut self, buffer: &mut Frame, point: Point) -> Effect {
        let effect = apply(self.active(), buffer, point);
        if let Effect::ColorSample(color) = effect {
            trace!("Eyedropper sampled {:?} at ({}, {})", color.0, point.x, point.y);
            self.set_pen_color(color);
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;
    use crate::entities::frame::{BLACK, WHITE};
    use image::Rgba;
    use std::sync::{Arc, Mutex};

    const RED: Color = Rgba([255, 0, 0, 255]);
    const BLUE: Color = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_defaults() {
        let toolbox = Toolbox::new(EditorEmitter::dummy());
        assert_eq!(toolbox.active_kind(), ToolKind::Pen);
        for kind in ToolKind::ALL {
            assert_eq!(toolbox.tool(kind).brush_size, 0);
            assert_eq!(toolbox.tool(kind).brush_color, BLACK);
        }
    }

    /// Test: Tool selection keeps per-tool settings
    #[test]
    fn test_select_tool_keeps_settings() {
        let mut toolbox = Toolbox::new(EditorEmitter::dummy());
        toolbox.set_brush_settings(3, RED);
        toolbox.select_tool(ToolKind::Eraser);
        toolbox.set_brush_settings(1, BLUE);
        toolbox.select_tool(ToolKind::Pen);

        assert_eq!(toolbox.active().brush_size, 3);
        assert_eq!(toolbox.active().brush_color, RED);
        assert_eq!(toolbox.tool(ToolKind::Eraser).brush_size, 1);
    }

    /// Test: Eyedropper feeds Pen and Bucket
    /// Validates: Eraser color untouched, frame untouched, event emitted
    #[test]
    fn test_eyedropper_updates_pen_and_bucket() {
        let bus = EventBus::new();
        let colors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&colors);
        bus.subscribe::<ColorChangedEvent, _>(move |e| sink.lock().unwrap().push(e.0));

        let mut toolbox = Toolbox::new(EditorEmitter::from_emitter(bus.emitter()));
        let mut frame = Frame::new(3, 3);
        frame.set_pixel(Point::new(2, 2), RED);
        let before = frame.clone();

        toolbox.select_tool(ToolKind::Eyedropper);
        let effect = toolbox.draw(&mut frame, Point::new(2, 2));

        assert_eq!(effect, Effect::ColorSample(RED));
        assert_eq!(frame, before);
        assert_eq!(toolbox.tool(ToolKind::Pen).brush_color, RED);
        assert_eq!(toolbox.tool(ToolKind::Bucket).brush_color, RED);
        assert_eq!(toolbox.tool(ToolKind::Eraser).brush_color, BLACK);
        assert_eq!(colors.lock().unwrap().last(), Some(&RED));
    }

    #[test]
    fn test_draw_with_active_tool() {
        let mut toolbox = Toolbox::new(EditorEmitter::dummy());
        let mut frame = Frame::new(4, 4);

        toolbox.set_pen_color(BLUE);
        toolbox.select_tool(ToolKind::Bucket);
        assert_eq!(toolbox.draw(&mut frame, Point::new(0, 0)), Effect::Mutate);
        assert!(frame.is_uniform(BLUE));

        toolbox.select_tool(ToolKind::Eraser);
        toolbox.draw(&mut frame, Point::new(1, 1));
        assert_eq!(frame.pixel(Point::new(1, 1)), Some(WHITE));
    }

    #[test]
    fn test_select_emits_tool_and_color() {
        let bus = EventBus::new();
        let mut toolbox = Toolbox::new(EditorEmitter::from_emitter(bus.emitter()));
        toolbox.select_tool(ToolKind::Bucket);

        let events = bus.poll();
        assert_eq!(events.len(), 2);
        let tool = crate::core::event_bus::downcast_event::<ToolChangedEvent>(&events[1]);
        assert_eq!(tool.map(|e| e.0), Some(ToolKind::Bucket));
    }
}
