//! Snap guide computation.
//!
//! Turns a [`SnapResult`] into visual guide primitives (edge lines,
//! crosshairs, corner markers, zone highlights) with fade-in/out animation.
//! The renderer produces plain data; painting belongs to the host toolkit,
//! which consumes the primitive list each frame.

use crate::types::{SnapResult, SnapType};
use modelshop_core::{Point, Rect, Shared};
use modelshop_settings::{GuideStyle, Rgba, SnapConfig};

/// A drawable guide primitive, in unified coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GuidePrimitive {
    /// A guide line along a zone edge
    Line {
        from: Point,
        to: Point,
        width: f64,
        style: GuideStyle,
        color: Rgba,
        opacity: f64,
    },
    /// A crosshair at the snapped position
    Crosshair {
        center: Point,
        arm: f64,
        color: Rgba,
        opacity: f64,
    },
    /// A marker at a snapped corner
    CornerMarker {
        corner: Point,
        size: f64,
        color: Rgba,
        opacity: f64,
    },
    /// A translucent fill over the active zone
    ZoneHighlight { area: Rect, color: Rgba, opacity: f64 },
}

/// Crosshair arm length in pixels.
const CROSSHAIR_ARM: f64 = 8.0;

/// Corner marker size in pixels.
const CORNER_MARKER: f64 = 10.0;

/// Geometry of one active guide, animation state kept separately.
#[derive(Debug, Clone, PartialEq)]
enum GuideShape {
    Edge { from: Point, to: Point },
    Crosshair { center: Point },
    Corner { corner: Point },
    Highlight { area: Rect },
}

#[derive(Debug, Clone)]
struct ActiveGuide {
    shape: GuideShape,
    /// Milliseconds since the guide appeared (drives fade-in)
    age_ms: f64,
    /// Milliseconds since the guide started fading out, if it is
    fading_ms: Option<f64>,
}

/// Computes and animates guide primitives from snap results.
pub struct SnapGuideRenderer {
    config: Shared<SnapConfig>,
    active: Vec<ActiveGuide>,
}

impl SnapGuideRenderer {
    /// Creates a renderer over the shared configuration.
    pub fn new(config: Shared<SnapConfig>) -> Self {
        Self {
            config,
            active: Vec::new(),
        }
    }

    /// Feeds a snap result in. A snapped result replaces the active guides;
    /// an unsnapped one starts fading them out.
    pub fn update(&mut self, result: &SnapResult) {
        let Some(candidate) = result.candidate.as_ref().filter(|_| result.snap_applied) else {
            self.begin_fade_out();
            return;
        };

        let mut shapes = vec![GuideShape::Highlight {
            area: candidate.zone_area,
        }];
        match candidate.snap_type {
            SnapType::Edge => {
                let (from, to) = edge_line(&candidate.zone_area, &candidate.position);
                shapes.push(GuideShape::Edge { from, to });
                shapes.push(GuideShape::Crosshair {
                    center: result.position,
                });
            }
            SnapType::Corner => {
                shapes.push(GuideShape::Corner {
                    corner: candidate.position,
                });
            }
            SnapType::Center | SnapType::Grid | SnapType::Custom => {
                shapes.push(GuideShape::Crosshair {
                    center: result.position,
                });
            }
        }

        // Keep guides whose geometry is unchanged (their fade-in continues);
        // fade out the rest and add what is new.
        let mut next: Vec<ActiveGuide> = Vec::with_capacity(shapes.len());
        for shape in shapes {
            match self
                .active
                .iter()
                .find(|g| g.fading_ms.is_none() && g.shape == shape)
            {
                Some(existing) => next.push(existing.clone()),
                None => next.push(ActiveGuide {
                    shape,
                    age_ms: 0.0,
                    fading_ms: None,
                }),
            }
        }
        for guide in &mut self.active {
            if guide.fading_ms.is_none() && !next.iter().any(|g| g.shape == guide.shape) {
                guide.fading_ms = Some(0.0);
                next.push(guide.clone());
            } else if guide.fading_ms.is_some() {
                next.push(guide.clone());
            }
        }
        self.active = next;
    }

    /// Starts fading out every active guide.
    pub fn begin_fade_out(&mut self) {
        for guide in &mut self.active {
            if guide.fading_ms.is_none() {
                guide.fading_ms = Some(0.0);
            }
        }
    }

    /// Drops all guides immediately (e.g. on drag cancel).
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Advances the animation clock and retires fully faded guides.
    pub fn advance(&mut self, dt_ms: f64) {
        let fade = self.config.borrow().visual.fade_duration_ms as f64;
        for guide in &mut self.active {
            guide.age_ms += dt_ms;
            if let Some(fading) = guide.fading_ms.as_mut() {
                *fading += dt_ms;
            }
        }
        self.active
            .retain(|g| g.fading_ms.map_or(true, |f| f < fade));
    }

    /// Whether any guide is currently visible.
    pub fn has_active_guides(&self) -> bool {
        !self.active.is_empty()
    }

    /// Produces the primitives the host should paint this frame.
    pub fn render(&self) -> Vec<GuidePrimitive> {
        let config = self.config.borrow();
        let visual = &config.visual;
        if !visual.show_guides {
            return Vec::new();
        }

        let fade_in = visual.animation_duration_ms as f64;
        let fade_out = visual.fade_duration_ms as f64;
        self.active
            .iter()
            .filter_map(|guide| {
                let rise = if fade_in > 0.0 {
                    (guide.age_ms / fade_in).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let fall = match guide.fading_ms {
                    Some(fading) if fade_out > 0.0 => (1.0 - fading / fade_out).clamp(0.0, 1.0),
                    Some(_) => 0.0,
                    None => 1.0,
                };
                let opacity = rise * fall;
                if opacity <= 0.0 {
                    return None;
                }
                Some(match &guide.shape {
                    GuideShape::Edge { from, to } => GuidePrimitive::Line {
                        from: *from,
                        to: *to,
                        width: visual.guide_width,
                        style: visual.guide_style,
                        color: visual.guide_color,
                        opacity,
                    },
                    GuideShape::Crosshair { center } => GuidePrimitive::Crosshair {
                        center: *center,
                        arm: CROSSHAIR_ARM,
                        color: visual.guide_color,
                        opacity,
                    },
                    GuideShape::Corner { corner } => GuidePrimitive::CornerMarker {
                        corner: *corner,
                        size: CORNER_MARKER,
                        color: visual.guide_color,
                        opacity,
                    },
                    GuideShape::Highlight { area } => GuidePrimitive::ZoneHighlight {
                        area: *area,
                        color: visual.highlight_color,
                        opacity: opacity * visual.highlight_opacity,
                    },
                })
            })
            .collect()
    }
}

/// The full zone edge the snapped point lies on.
///
/// The candidate position came from `nearest_boundary_point`, so it sits on
/// one of the four edges; vertical edges win the corner case.
fn edge_line(area: &Rect, position: &Point) -> (Point, Point) {
    const EPS: f64 = 1e-6;
    if (position.x - area.left()).abs() < EPS {
        (
            Point::new(area.left(), area.top()),
            Point::new(area.left(), area.bottom()),
        )
    } else if (position.x - area.right()).abs() < EPS {
        (
            Point::new(area.right(), area.top()),
            Point::new(area.right(), area.bottom()),
        )
    } else if (position.y - area.top()).abs() < EPS {
        (
            Point::new(area.left(), area.top()),
            Point::new(area.right(), area.top()),
        )
    } else {
        (
            Point::new(area.left(), area.bottom()),
            Point::new(area.right(), area.bottom()),
        )
    }
}
