//! Closed outlines built from lines and circular arcs, and the circular
//! pattern that turns one tooth into a whole gear.
use std::f64::consts::PI;

use log::debug;
use nalgebra::geometry::Point2;

use crate::geometry::{clip_outside, Circle};
use crate::tooth::ToothProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Straight line to the given point
    Line(Point2<f64>),
    /// Circular arc about `center`, ending at `to`
    Arc {
        to: Point2<f64>,
        center: Point2<f64>,
        ccw: bool,
    },
}

impl Segment {
    pub fn end(&self) -> Point2<f64> {
        match self {
            Segment::Line(to) => *to,
            Segment::Arc { to, .. } => *to,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub start: Point2<f64>,
    pub segments: Vec<Segment>,
}

impl Outline {
    pub fn new(start: Point2<f64>) -> Self {
        Outline {
            start,
            segments: Vec::new(),
        }
    }

    /// Full circle, drawn as two counter-clockwise half arcs starting on the +X side
    pub fn circle(center: Point2<f64>, radius: f64) -> Self {
        let right = Point2::new(center.x + radius, center.y);
        let left = Point2::new(center.x - radius, center.y);
        let mut outline = Outline::new(right);
        outline.arc_to(left, center, true);
        outline.arc_to(right, center, true);
        outline
    }

    /// Closed polygon through `corners`
    pub fn polygon(corners: &[Point2<f64>]) -> Option<Self> {
        let (first, rest) = corners.split_first()?;
        let mut outline = Outline::new(*first);
        for p in rest {
            outline.line_to(*p);
        }
        outline.line_to(*first);
        Some(outline)
    }

    pub fn line_to(&mut self, to: Point2<f64>) {
        self.segments.push(Segment::Line(to));
    }

    pub fn arc_to(&mut self, to: Point2<f64>, center: Point2<f64>, ccw: bool) {
        self.segments.push(Segment::Arc { to, center, ccw });
    }

    pub fn end(&self) -> Point2<f64> {
        self.segments.last().map_or(self.start, Segment::end)
    }

    pub fn is_closed(&self, tolerance: f64) -> bool {
        (self.end() - self.start).norm() <= tolerance
    }
}

/// Angle swept going from `from` to `to` about `center`, in (0, 2π].
pub fn arc_sweep(from: &Point2<f64>, to: &Point2<f64>, center: &Point2<f64>, ccw: bool) -> f64 {
    let a0 = (from.y - center.y).atan2(from.x - center.x);
    let a1 = (to.y - center.y).atan2(to.x - center.x);
    let delta = if ccw { a1 - a0 } else { a0 - a1 };
    let sweep = delta.rem_euclid(2.0 * PI);
    if sweep == 0.0 {
        2.0 * PI
    } else {
        sweep
    }
}

/// `count` copies of `tooth`, spaced by its index angle
pub fn circular_pattern(tooth: &ToothProfile, count: usize) -> Vec<ToothProfile> {
    (0..count)
        .map(|k| tooth.rotated(k as f64 * tooth.index_angle))
        .collect()
}

/// Flank points from the root circle to the tip
fn flank_path(flank: &[Point2<f64>], root_point: Option<Point2<f64>>, root: Circle) -> Vec<Point2<f64>> {
    match root_point {
        Some(p) => std::iter::once(p).chain(flank.iter().copied()).collect(),
        None => clip_outside(flank, root),
    }
}

/// Tips closer than this fraction of the outside radius meet at a point
const TIP_TOLERANCE: f64 = 1e-12;

/// Direction of the outside-circle arc from `from` to `to` that passes through `apex`.
///
/// Flanks of pointed teeth cross before the outside circle, leaving flank A's
/// tip past the apex, so the short way round is then clockwise.
fn tip_arc_is_ccw(from: &Point2<f64>, to: &Point2<f64>, apex: &Point2<f64>) -> bool {
    let origin = Point2::origin();
    arc_sweep(from, apex, &origin, true) <= arc_sweep(from, to, &origin, true)
}

/// Counter-clockwise outline of the whole gear: every tooth from the pattern,
/// joined by arcs along the root circle.
pub fn gear_outline(tooth: &ToothProfile) -> Outline {
    let origin = Point2::origin();
    let derived = tooth.derived;
    let root = Circle::new(origin, derived.root_radius());
    let teeth = (2.0 * PI / tooth.index_angle).round() as usize;

    let mut outline: Option<Outline> = None;
    for copy in circular_pattern(tooth, teeth) {
        let rising = flank_path(&copy.flank_a, copy.root_point_a, root);
        let falling = flank_path(&copy.flank_b, copy.root_point_b, root);
        let (first, climb) = match rising.split_first() {
            Some(split) => split,
            None => continue,
        };

        // Along the root circle from the previous tooth
        if let Some(o) = outline.as_mut() {
            o.arc_to(*first, origin, true);
        } else {
            outline = Some(Outline::new(*first));
        }
        if let Some(o) = outline.as_mut() {
            for p in climb {
                o.line_to(*p);
            }
            // Across the tip, then back down the other flank
            if let Some(tip) = falling.last() {
                let from = o.end();
                if (tip - from).norm() > TIP_TOLERANCE * derived.outside_radius() {
                    let ccw = tip_arc_is_ccw(&from, tip, &copy.outside_mid_point);
                    o.arc_to(*tip, origin, ccw);
                }
            }
            for p in falling.iter().rev().skip(1) {
                o.line_to(*p);
            }
        }
    }

    let mut outline = outline.unwrap_or_else(|| Outline::new(origin));
    let start = outline.start;
    outline.arc_to(start, origin, true);
    debug!(
        "Gear outline with {teeth} teeth, {} segments",
        outline.segments.len()
    );
    outline
}
