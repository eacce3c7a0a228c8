//! Primitive geometry and colour types shared by layout and scene building.

/// A point in canvas space. The canvas origin is the top-left corner and
/// the y axis grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate in canvas units.
    pub x: f64,
    /// Vertical coordinate in canvas units.
    pub y: f64,
}

impl Point {
    /// Creates a point at the given coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, always non-negative in a validated layout.
    pub width: f64,
    /// Height, always non-negative in a validated layout.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extent.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Midpoint of the top edge. Pipes entering a tank attach here.
    pub fn center_top(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    /// Midpoint of the bottom edge. Pipes leaving a tank attach here.
    pub fn center_bottom(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }

    /// Whether the point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Shrinks the rectangle by `margin` on every side.
    pub fn inset(&self, margin: f64) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }
}

/// An 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Creates an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a colour with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

// ── Palette ──────────────────────────────────────────────────────────────

/// Idle pipe walls.
pub const PIPE_IDLE: Color = Color::rgb(128, 128, 128);
/// Water moving through a gravity pipe.
pub const PIPE_WATER: Color = Color::rgb(0, 180, 255);
/// Idle pump pipe walls.
pub const PUMP_IDLE: Color = Color::rgb(139, 0, 0);
/// Water moving through the pump pipe.
pub const PUMP_WATER: Color = Color::rgb(255, 80, 80);
/// Liquid column inside a tank.
pub const TANK_LIQUID: Color = Color::rgba(0, 120, 255, 200);
/// Tank outlines and labels.
pub const OUTLINE: Color = Color::rgb(255, 255, 255);
/// Canvas background.
pub const BACKGROUND: Color = Color::rgb(34, 34, 34);
