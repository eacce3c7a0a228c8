//! Snapshot-to-primitive translation.
//!
//! [`build_scene`] turns one [`SimSnapshot`] plus a [`Layout`] into an
//! ordered list of draw primitives. Any renderer that can fill rectangles,
//! stroke polylines, and draw text can present the network; the crate
//! itself never touches a windowing system.

use sluice_core::{PipeId, SimSnapshot, TankId};

use crate::geometry::{self, Color, Point, Rect};
use crate::layout::{Layout, PipePath};

/// Inset between a tank's wall and its liquid column.
const LIQUID_MARGIN: f64 = 3.0;
/// Stroke width of a tank's outline.
const OUTLINE_WIDTH: f64 = 4.0;
/// Vertical gap between a tank's top edge and its label baseline.
const LABEL_GAP: f64 = 10.0;
/// Stroke width of the pump marker circle.
const MARKER_WIDTH: f64 = 3.0;

/// One renderer-agnostic drawing instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawPrim {
    /// A filled axis-aligned rectangle.
    FillRect {
        /// Rectangle to fill.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// A stroked axis-aligned rectangle.
    StrokeRect {
        /// Rectangle to outline.
        rect: Rect,
        /// Stroke width.
        width: f64,
        /// Stroke colour.
        color: Color,
    },
    /// An open polyline stroked with round joins.
    Polyline {
        /// Vertices in draw order.
        points: PipePath,
        /// Stroke width.
        width: f64,
        /// Stroke colour.
        color: Color,
    },
    /// A stroked circle.
    Circle {
        /// Centre of the circle.
        center: Point,
        /// Radius of the circle.
        radius: f64,
        /// Stroke width.
        width: f64,
        /// Stroke colour.
        color: Color,
    },
    /// A text label drawn from its anchor point (left edge, baseline).
    Label {
        /// Anchor point of the label.
        position: Point,
        /// Text to render.
        text: String,
        /// Text colour.
        color: Color,
    },
}

/// An ordered frame of primitives. Earlier entries are painted first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Primitives in paint order.
    pub prims: Vec<DrawPrim>,
}

/// Builds the frame for one snapshot.
///
/// Paint order: background, pipe walls, liquid overlays for flowing pipes,
/// tank liquid columns, tank outlines and labels, then the pump marker
/// circle and its "P" label on top.
pub fn build_scene(snap: &SimSnapshot, layout: &Layout) -> Scene {
    let mut prims = Vec::with_capacity(2 + 5 * 4);

    prims.push(DrawPrim::FillRect {
        rect: layout.canvas(),
        color: geometry::BACKGROUND,
    });

    for pipe in PipeId::ALL {
        let style = layout.pipe_style(pipe);
        prims.push(DrawPrim::Polyline {
            points: layout.pipe_path(pipe).clone(),
            width: style.base_width,
            color: style.base_color,
        });
    }
    for pipe in PipeId::ALL {
        if !snap.is_flowing(pipe) {
            continue;
        }
        let style = layout.pipe_style(pipe);
        prims.push(DrawPrim::Polyline {
            points: layout.pipe_path(pipe).clone(),
            width: style.liquid_width,
            color: style.liquid_color,
        });
    }

    for tank in TankId::ALL {
        let rect = layout.tank_rect(tank);
        let ratio = snap.fill_ratio(tank).clamp(0.0, 1.0);
        if ratio > 0.0 {
            prims.push(DrawPrim::FillRect {
                rect: liquid_rect(rect, ratio),
                color: geometry::TANK_LIQUID,
            });
        }
    }

    for tank in TankId::ALL {
        let rect = layout.tank_rect(tank);
        prims.push(DrawPrim::StrokeRect {
            rect,
            width: OUTLINE_WIDTH,
            color: geometry::OUTLINE,
        });
        // Name at the tank's left edge, just above the outline.
        prims.push(DrawPrim::Label {
            position: Point::new(rect.x, rect.y - LABEL_GAP),
            text: tank.label().to_owned(),
            color: geometry::OUTLINE,
        });
    }

    let marker_color = if snap.pump_enabled {
        geometry::PUMP_WATER
    } else {
        geometry::PUMP_IDLE
    };
    let center = layout.pump_marker_center();
    prims.push(DrawPrim::Circle {
        center,
        radius: layout.pump_marker_radius(),
        width: MARKER_WIDTH,
        color: marker_color,
    });
    prims.push(DrawPrim::Label {
        position: Point::new(center.x - 7.0, center.y + 5.0),
        text: "P".to_owned(),
        color: marker_color,
    });

    Scene { prims }
}

/// Bottom-anchored liquid column inside a tank.
fn liquid_rect(tank: Rect, ratio: f64) -> Rect {
    let inner = tank.inset(LIQUID_MARGIN);
    let height = inner.height * ratio;
    Rect::new(inner.x, inner.y + inner.height - height, inner.width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::TickId;

    fn snapshot() -> SimSnapshot {
        SimSnapshot {
            tick: TickId(0),
            volumes: [100.0, 0.0, 0.0, 0.0, 0.0],
            fill_ratios: [1.0, 0.0, 0.0, 0.0, 0.0],
            flowing: [false; 5],
            pump_enabled: false,
            running: false,
        }
    }

    #[test]
    fn background_is_painted_first() {
        let scene = build_scene(&snapshot(), &Layout::reference());
        assert_eq!(
            scene.prims[0],
            DrawPrim::FillRect {
                rect: Layout::reference().canvas(),
                color: geometry::BACKGROUND,
            }
        );
    }

    #[test]
    fn idle_pipes_get_no_liquid_overlay() {
        let scene = build_scene(&snapshot(), &Layout::reference());
        let polylines = scene
            .prims
            .iter()
            .filter(|p| matches!(p, DrawPrim::Polyline { .. }))
            .count();
        assert_eq!(polylines, 5);
    }

    #[test]
    fn flowing_pipes_get_a_liquid_overlay() {
        let mut snap = snapshot();
        snap.flowing[PipeId::SourceToA.index()] = true;
        snap.flowing[PipeId::Pump.index()] = true;
        let layout = Layout::reference();
        let scene = build_scene(&snap, &layout);

        let overlays: Vec<_> = scene
            .prims
            .iter()
            .filter(|p| {
                matches!(
                    p,
                    DrawPrim::Polyline { width, .. }
                        if *width == layout.pipe_style(PipeId::SourceToA).liquid_width
                )
            })
            .collect();
        assert_eq!(overlays.len(), 2);
        assert!(overlays.iter().any(|p| matches!(
            p,
            DrawPrim::Polyline { color, .. } if *color == geometry::PUMP_WATER
        )));
    }

    #[test]
    fn liquid_column_tracks_the_fill_ratio() {
        let mut snap = snapshot();
        snap.fill_ratios[TankId::B.index()] = 0.5;
        let layout = Layout::reference();
        let scene = build_scene(&snap, &layout);

        let inner = layout.tank_rect(TankId::B).inset(3.0);
        let expected = Rect::new(inner.x, inner.y + inner.height / 2.0, inner.width, inner.height / 2.0);
        assert!(scene.prims.contains(&DrawPrim::FillRect {
            rect: expected,
            color: geometry::TANK_LIQUID,
        }));
    }

    #[test]
    fn empty_tanks_paint_no_liquid() {
        let mut snap = snapshot();
        snap.fill_ratios = [0.0; 5];
        let scene = build_scene(&snap, &Layout::reference());
        let liquid = scene
            .prims
            .iter()
            .filter(|p| matches!(p, DrawPrim::FillRect { color, .. } if *color == geometry::TANK_LIQUID))
            .count();
        assert_eq!(liquid, 0);
    }

    #[test]
    fn pump_marker_tracks_the_pump_switch() {
        let layout = Layout::reference();
        let mut snap = snapshot();

        let scene = build_scene(&snap, &layout);
        let n = scene.prims.len();
        assert_eq!(
            scene.prims[n - 2],
            DrawPrim::Circle {
                center: layout.pump_marker_center(),
                radius: layout.pump_marker_radius(),
                width: 3.0,
                color: geometry::PUMP_IDLE,
            }
        );
        assert_eq!(
            scene.prims[n - 1],
            DrawPrim::Label {
                position: Point::new(708.0, 350.0),
                text: "P".to_owned(),
                color: geometry::PUMP_IDLE,
            }
        );

        snap.pump_enabled = true;
        let scene = build_scene(&snap, &layout);
        assert!(matches!(
            &scene.prims[scene.prims.len() - 2],
            DrawPrim::Circle { color, .. } if *color == geometry::PUMP_WATER
        ));
    }

    #[test]
    fn every_tank_is_outlined_and_labelled() {
        let layout = Layout::reference();
        let scene = build_scene(&snapshot(), &layout);
        let outlines = scene
            .prims
            .iter()
            .filter(|p| matches!(p, DrawPrim::StrokeRect { width, .. } if *width == 4.0))
            .count();
        let labels: Vec<_> = scene
            .prims
            .iter()
            .filter_map(|p| match p {
                DrawPrim::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(outlines, 5);
        assert_eq!(labels, ["Z1", "Z2", "Z3", "Z5", "Z4", "P"]);

        // Names anchor at the tank's left edge, just above the outline.
        let b = layout.tank_rect(TankId::B);
        assert!(scene.prims.contains(&DrawPrim::Label {
            position: Point::new(b.x, b.y - 10.0),
            text: "Z3".to_owned(),
            color: geometry::OUTLINE,
        }));
    }
}
