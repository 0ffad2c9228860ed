//! World-to-pixel mapping
//!
//! Recomputed from the canvas size whenever the page is drawn, so a resize
//! only needs a redraw.

use glam::{DVec2, Vec2};

/// Canvas dimensions and padding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: (width.min(height) * 0.08).max(8.0),
        }
    }

    fn usable(&self) -> Vec2 {
        Vec2::new(
            (self.width - 2.0 * self.margin).max(1.0),
            (self.height - 2.0 * self.margin).max(1.0),
        )
    }

    /// Ground along the bottom edge. The world origin sits on the ground,
    /// horizontally centred when `centered`, otherwise at the left margin.
    /// `extent` is the world box (m) that must stay visible.
    pub fn ground_frame(&self, extent: DVec2, centered: bool) -> Viewport {
        let usable = self.usable();
        let sx = if extent.x > 0.0 {
            usable.x / extent.x as f32
        } else {
            f32::INFINITY
        };
        let sy = if extent.y > 0.0 {
            usable.y / extent.y as f32
        } else {
            f32::INFINITY
        };
        let mut scale = sx.min(sy);
        if !scale.is_finite() {
            scale = 1.0;
        }

        let origin_x = if centered {
            self.width / 2.0
        } else {
            self.margin
        };
        Viewport {
            origin: Vec2::new(origin_x, self.height - self.margin),
            scale,
        }
    }

    /// World origin at the canvas centre; `radius` (m) fits inside the margin
    pub fn centered_frame(&self, radius: f64) -> Viewport {
        let half = self.usable().min_element() / 2.0;
        let scale = if radius > 0.0 {
            half / radius as f32
        } else {
            1.0
        };
        Viewport {
            origin: Vec2::new(self.width / 2.0, self.height / 2.0),
            scale,
        }
    }

    pub fn ground_y(&self) -> f32 {
        self.height - self.margin
    }
}

/// Maps world metres (y up) to canvas pixels (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixel position of the world origin
    pub origin: Vec2,
    /// Pixels per metre
    pub scale: f32,
}

impl Viewport {
    pub fn to_screen(&self, world: DVec2) -> Vec2 {
        Vec2::new(
            self.origin.x + world.x as f32 * self.scale,
            self.origin.y - world.y as f32 * self.scale,
        )
    }

    pub fn length(&self, metres: f64) -> f32 {
        metres as f32 * self.scale
    }
}
