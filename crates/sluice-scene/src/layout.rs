//! Canvas placement for the reference network.
//!
//! A [`Layout`] fixes where each tank sits on the canvas and derives the
//! elbow polyline every pipe follows between its two tanks. The layout is
//! purely geometric; it knows nothing about volumes or flow.

use std::fmt;

use smallvec::SmallVec;

use sluice_core::{PipeId, TankId};

use crate::geometry::{self, Color, Point, Rect};

/// Polyline a pipe follows on the canvas. Elbow routes use four points.
pub type PipePath = SmallVec<[Point; 4]>;

/// Stroke colours and widths for one pipe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipeStyle {
    /// Stroke width of the pipe walls.
    pub base_width: f64,
    /// Stroke width of the liquid overlay drawn while the pipe flows.
    pub liquid_width: f64,
    /// Wall colour.
    pub base_color: Color,
    /// Overlay colour while flowing.
    pub liquid_color: Color,
}

/// Errors produced when validating tank placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A tank rectangle has a non-positive or non-finite extent.
    DegenerateRect {
        /// The tank whose rectangle failed validation.
        tank: TankId,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::DegenerateRect { tank } => {
                write!(f, "tank {} has a degenerate rectangle", tank.label())
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Side length of the pump marker's bounding square.
const PUMP_MARKER_SIZE: f64 = 30.0;

/// Canvas placement for all tanks and the pipe routes between them.
#[derive(Clone, Debug)]
pub struct Layout {
    tanks: [Rect; 5],
    paths: [PipePath; 5],
    styles: [PipeStyle; 5],
    pump_marker_center: Point,
    canvas: Rect,
}

impl Layout {
    /// Builds a layout from explicit tank rectangles.
    ///
    /// Pipe routes, the pump marker position, and the canvas extent are all
    /// derived from the rectangles.
    pub fn new(tanks: [Rect; 5]) -> Result<Self, LayoutError> {
        for id in TankId::ALL {
            let r = tanks[id.index()];
            let finite =
                r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite();
            if !finite || r.width <= 0.0 || r.height <= 0.0 {
                return Err(LayoutError::DegenerateRect { tank: id });
            }
        }

        let rect = |id: TankId| tanks[id.index()];
        let gravity = |from: TankId, to: TankId| {
            elbow(rect(from).center_bottom(), rect(to).center_top())
        };

        // Pipe order mirrors the per-tick flow order. The pump pipe uses
        // the same bottom-to-top elbow as the gravity pipes.
        let paths = [
            gravity(TankId::Source, TankId::A),
            gravity(TankId::A, TankId::B),
            gravity(TankId::B, TankId::C),
            gravity(TankId::B, TankId::D),
            gravity(TankId::D, TankId::B),
        ];

        let gravity_style = PipeStyle {
            base_width: 12.0,
            liquid_width: 8.0,
            base_color: geometry::PIPE_IDLE,
            liquid_color: geometry::PIPE_WATER,
        };
        let pump_style = PipeStyle {
            base_color: geometry::PUMP_IDLE,
            liquid_color: geometry::PUMP_WATER,
            ..gravity_style
        };
        let styles = [
            gravity_style,
            gravity_style,
            gravity_style,
            gravity_style,
            pump_style,
        ];

        // Marker sits just above the pump intake, nudged off the pipe axis.
        let intake_top = rect(TankId::D).center_top();
        let pump_marker_center = Point::new(
            intake_top.x + PUMP_MARKER_SIZE / 2.0,
            intake_top.y - PUMP_MARKER_SIZE / 2.0 - 40.0,
        );

        let canvas = bounding_canvas(&tanks);

        Ok(Self {
            tanks,
            paths,
            styles,
            pump_marker_center,
            canvas,
        })
    }

    /// The standard five-tank placement.
    pub fn reference() -> Self {
        let tank = |x: f64, y: f64| Rect::new(x, y, 100.0, 140.0);
        let tanks = [
            tank(50.0, 50.0),
            tank(250.0, 150.0),
            tank(450.0, 275.0),
            tank(850.0, 400.0),
            tank(650.0, 400.0),
        ];
        // Reference rectangles are valid by construction.
        match Self::new(tanks) {
            Ok(layout) => layout,
            Err(LayoutError::DegenerateRect { .. }) => unreachable!(),
        }
    }

    /// Rectangle a tank occupies.
    pub fn tank_rect(&self, id: TankId) -> Rect {
        self.tanks[id.index()]
    }

    /// Polyline a pipe follows.
    pub fn pipe_path(&self, id: PipeId) -> &PipePath {
        &self.paths[id.index()]
    }

    /// Stroke style for a pipe.
    pub fn pipe_style(&self, id: PipeId) -> PipeStyle {
        self.styles[id.index()]
    }

    /// Centre of the circular pump marker.
    pub fn pump_marker_center(&self) -> Point {
        self.pump_marker_center
    }

    /// Radius of the circular pump marker.
    pub fn pump_marker_radius(&self) -> f64 {
        PUMP_MARKER_SIZE / 2.0
    }

    /// Canvas extent covering all tanks with a margin.
    pub fn canvas(&self) -> Rect {
        self.canvas
    }
}

/// Routes a pipe between two attachment points with a single horizontal
/// jog at the vertical midpoint.
fn elbow(from: Point, to: Point) -> PipePath {
    let mid_y = (from.y + to.y) / 2.0;
    let mut path = PipePath::new();
    path.push(from);
    path.push(Point::new(from.x, mid_y));
    path.push(Point::new(to.x, mid_y));
    path.push(to);
    path
}

/// Smallest origin-anchored canvas that covers every tank with a margin.
fn bounding_canvas(tanks: &[Rect; 5]) -> Rect {
    let mut max_x = 0.0_f64;
    let mut max_y = 0.0_f64;
    for r in tanks {
        max_x = max_x.max(r.x + r.width);
        max_y = max_y.max(r.y + r.height);
    }
    Rect::new(0.0, 0.0, max_x + 50.0, max_y + 110.0)
}
