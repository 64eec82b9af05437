//! 2D canvas primitives

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Packed 0xRRGGBB color with a separate alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub rgb: u32,
    pub alpha: f32,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            rgb: self.rgb,
            alpha,
        }
    }

    /// `#rrggbb` form for canvas backends that take CSS colors
    pub fn css(&self) -> String {
        format!("#{:06x}", self.rgb & 0x00ff_ffff)
    }
}

/// Shared neon palette
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::hex(0x0b1220);
    pub const GRID: Color = Color::hex(0x22314d);
    pub const ACCENT: Color = Color::hex(0x6aa7ff);
    pub const TEXT: Color = Color::hex(0xe7eefc);
    pub const MUTED: Color = Color::hex(0x9ab0d0);
    pub const DANGER: Color = Color::hex(0xff6a6a);
    pub const GOOD: Color = Color::hex(0x78ffb4);
    pub const SHADE: Color = Color::hex(0x000000);
}

/// A render target
pub trait Canvas {
    /// Drawable size in pixels
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, color: Color);

    /// Faint background grid
    fn grid(&mut self, spacing: f32, color: Color) {
        let size = self.size();
        let mut x = 0.0;
        while x <= size.x {
            self.line(Vec2::new(x, 0.0), Vec2::new(x, size.y), color);
            x += spacing;
        }
        let mut y = 0.0;
        while y <= size.y {
            self.line(Vec2::new(0.0, y), Vec2::new(size.x, y), color);
            y += spacing;
        }
    }
}

/// A recorded canvas call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear(Color),
    Rect { pos: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
    Text { pos: Vec2, text: String, color: Color },
}

/// Canvas that records draw calls
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        // Everything before a clear is invisible
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect { pos, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_discards_previous_commands() {
        let mut list = DrawList::new(100.0, 100.0);
        list.fill_rect(Vec2::ZERO, Vec2::ONE, palette::ACCENT);
        list.clear(palette::BACKGROUND);
        assert_eq!(list.len(), 1);
        list.text(Vec2::ZERO, "hi", palette::TEXT);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hi"]);
    }

    #[test]
    fn test_grid_covers_both_axes() {
        let mut list = DrawList::new(120.0, 60.0);
        list.grid(60.0, palette::GRID);
        // x: 0, 60, 120; y: 0, 60
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(palette::ACCENT.css(), "#6aa7ff");
        assert_eq!(Color::hex(0xff).css(), "#0000ff");
    }
}
