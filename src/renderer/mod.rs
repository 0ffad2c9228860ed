//! Rendering module
//!
//! Drawing code never touches a concrete graphics API. It writes to a
//! [`Surface`]: the browser canvas in production, a recorded [`DrawList`]
//! in tests and headless runs.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod layout;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use layout::{Layout, Viewport};
pub use shapes::{render_adiabatic, render_scenario};

use glam::Vec2;

/// Linear RGBA, each channel in [0, 1]
pub type Color = [f32; 4];

/// CSS `rgba()` string for a color
pub fn css_color(color: Color) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Same color with a different alpha
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// Colors for page elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.96, 0.97, 0.99, 1.0];
    pub const SKY: Color = [0.85, 0.92, 1.0, 1.0];
    pub const GROUND: Color = [0.35, 0.6, 0.3, 1.0];
    pub const WATER: Color = [0.2, 0.45, 0.85, 1.0];
    pub const BALL: Color = [0.9, 0.3, 0.2, 1.0];
    pub const BALL_ALT: Color = [0.2, 0.4, 0.9, 1.0];
    pub const TRAIL: Color = [0.9, 0.5, 0.2, 1.0];
    pub const VELOCITY_ARROW: Color = [0.1, 0.6, 0.2, 1.0];
    pub const GUIDE: Color = [0.5, 0.5, 0.55, 0.6];
    pub const PLANET: Color = [0.2, 0.45, 0.8, 1.0];
    pub const STAR: Color = [1.0, 0.8, 0.2, 1.0];
    pub const SATELLITE: Color = [0.85, 0.85, 0.9, 1.0];
    pub const TEXT: Color = [0.15, 0.15, 0.2, 1.0];
    pub const CURVE: Color = [0.2, 0.6, 0.86, 1.0];
    pub const GUESS_CURVE: Color = [0.18, 0.8, 0.44, 1.0];
    pub const PISTON: Color = [0.33, 0.33, 0.33, 1.0];
}

/// Output target for a rendered frame
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn text(&mut self, position: Vec2, text: &str, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    Text {
        position: Vec2,
        text: String,
        color: Color,
    },
}

/// Surface that records commands instead of drawing
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Centres of every filled circle, in draw order
    pub fn circle_centers(&self) -> Vec<Vec2> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    /// Clearing discards everything recorded so far
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            size,
            color,
        });
    }

    fn text(&mut self, position: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            position,
            text: text.to_owned(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color([1.0, 0.0, 0.5, 1.0]), "rgba(255, 0, 128, 1.000)");
        assert_eq!(css_color([2.0, -1.0, 0.0, 0.25]), "rgba(255, 0, 0, 0.250)");
    }

    #[test]
    fn test_draw_list_clear_resets() {
        let mut list = DrawList::new(100.0, 100.0);
        list.fill_circle(Vec2::ZERO, 1.0, colors::BALL);
        list.clear(colors::BACKGROUND);
        assert_eq!(list.commands(), &[DrawCommand::Clear(colors::BACKGROUND)]);
    }
}
