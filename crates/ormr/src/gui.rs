//! GUI data components.
//!
//! The layout/draw side of the GUI lives outside this core; what's stored
//! here is the data an external GUI system reads (anchor, offset, size,
//! text) and the one piece of logic gameplay needs back from it: the
//! screen-bounds hit test for click handling. The external system is
//! responsible for filling `bounds` after layout.

use serde::{Deserialize, Serialize};

use crate::ecs::EntityId;
use crate::math::{Vec2, Vec3};

/// Which part of the screen a GUI element is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuiAnchor {
    TopLeft,
    Top,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    Bottom,
    BottomRight,
}

/// Screen-space bounding box in pixels, filled in by the GUI layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenBounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl ScreenBounds {
    /// Strictly-inside test, matching the click handling this feeds:
    /// points on the border don't count.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }
}

/// A textured GUI quad.
#[derive(Debug, Clone)]
pub struct GuiElement {
    pub owner: EntityId,
    /// Texture resource index, owned by the external asset pipeline.
    pub texture: usize,
    pub width: i32,
    pub height: i32,
    pub anchor: GuiAnchor,
    /// Pixel offset from the anchor point.
    pub offset: Vec2,
    pub bounds: ScreenBounds,
}

impl Default for GuiElement {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            texture: 0,
            width: 0,
            height: 0,
            anchor: GuiAnchor::default(),
            offset: Vec2::ZERO,
            bounds: ScreenBounds::default(),
        }
    }
}

/// A GUI text label.
#[derive(Debug, Clone)]
pub struct GuiText {
    pub owner: EntityId,
    pub text: String,
    pub font_face: String,
    pub font_size: i32,
    pub color: Vec3,
    pub anchor: GuiAnchor,
    pub offset: Vec2,
}

impl Default for GuiText {
    fn default() -> Self {
        Self {
            owner: EntityId::DETACHED,
            text: String::new(),
            font_face: String::new(),
            font_size: 32,
            color: Vec3::ONE,
            anchor: GuiAnchor::default(),
            offset: Vec2::ZERO,
        }
    }
}
