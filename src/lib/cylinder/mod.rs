//! Lightening cylinder: two concentric rings joined by radial support struts.
use std::f64::consts::PI;

use log::{debug, warn};
use nalgebra::geometry::{Point2, Rotation2};

use crate::error::{GearError, Result};
use crate::outline::Outline;

pub const DEFAULT_INNER_DIAMETER: f64 = 10.0;
pub const DEFAULT_OUTER_DIAMETER: f64 = 20.0;
pub const DEFAULT_THICKNESS_Y: f64 = 2.0;
pub const DEFAULT_THICKNESS_Z: f64 = 2.0;
pub const DEFAULT_NUM_SUPPORT: u32 = 3;

/// Struts reach 90% of a ring wall into each ring so they overlap it
const STRUT_OVERLAP: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSpec {
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    /// Radial wall thickness of each ring, and width of each strut
    pub thickness_y: f64,
    /// Part height
    pub thickness_z: f64,
    pub num_support: u32,
}

impl Default for CylinderSpec {
    fn default() -> Self {
        Self {
            inner_diameter: DEFAULT_INNER_DIAMETER,
            outer_diameter: DEFAULT_OUTER_DIAMETER,
            thickness_y: DEFAULT_THICKNESS_Y,
            thickness_z: DEFAULT_THICKNESS_Z,
            num_support: DEFAULT_NUM_SUPPORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CylinderLayout {
    /// Radii of the four concentric circles, innermost first
    pub circle_radii: [f64; 4],
    /// Strut at angle zero, running along +Y
    pub strut: [Point2<f64>; 4],
    /// Angle of each strut in the pattern
    pub strut_angles: Vec<f64>,
}

impl CylinderSpec {
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| -> Result<()> { Err(GearError::InvalidCylinderSpec(msg)) };
        let sizes = [
            ("inner diameter", self.inner_diameter),
            ("outer diameter", self.outer_diameter),
            ("support thickness", self.thickness_y),
            ("part thickness", self.thickness_z),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| v.is_infinite()) {
            return fail(format!("{name} must be finite, got {value}"));
        }
        if !(self.inner_diameter > 0.0) {
            return fail(format!(
                "inner diameter must be positive, got {}",
                self.inner_diameter
            ));
        }
        if !(self.outer_diameter > 0.0) {
            return fail(format!(
                "outer diameter must be positive, got {}",
                self.outer_diameter
            ));
        }
        if !(self.thickness_y > 0.0) {
            return fail(format!(
                "support thickness must be positive, got {}",
                self.thickness_y
            ));
        }
        if !(self.thickness_z >= 0.0) {
            return fail(format!(
                "part thickness must not be negative, got {}",
                self.thickness_z
            ));
        }
        if self.num_support < 2 {
            return fail(format!(
                "need at least 2 supports, got {}",
                self.num_support
            ));
        }

        if self.inner_diameter / 2.0 + self.thickness_y >= self.outer_diameter / 2.0 - self.thickness_y {
            warn!(
                "Rings overlap: inner ring ends at {}, outer ring starts at {}",
                self.inner_diameter / 2.0 + self.thickness_y,
                self.outer_diameter / 2.0 - self.thickness_y
            );
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<CylinderLayout> {
        self.validate()?;

        let inner = self.inner_diameter / 2.0;
        let outer = self.outer_diameter / 2.0;
        let ty = self.thickness_y;

        let px = ty / 2.0;
        let py1 = inner + STRUT_OVERLAP * ty;
        let py2 = outer - STRUT_OVERLAP * ty;

        let step = 2.0 * PI / self.num_support as f64;
        let layout = CylinderLayout {
            circle_radii: [inner, inner + ty, outer - ty, outer],
            strut: [
                Point2::new(px, py1),
                Point2::new(px, py2),
                Point2::new(-px, py2),
                Point2::new(-px, py1),
            ],
            strut_angles: (0..self.num_support).map(|k| k as f64 * step).collect(),
        };
        debug!("Cylinder layout {layout:?}");
        Ok(layout)
    }
}

impl CylinderLayout {
    /// Corners of strut `k`
    pub fn strut_at(&self, k: usize) -> Option<[Point2<f64>; 4]> {
        let rot = Rotation2::new(*self.strut_angles.get(k)?);
        let mut corners = self.strut;
        for c in corners.iter_mut() {
            *c = rot * *c;
        }
        Some(corners)
    }

    /// Every circle and strut as a closed outline
    pub fn outlines(&self) -> Vec<Outline> {
        let origin = Point2::origin();
        let circles = self.circle_radii.iter().map(|&r| Outline::circle(origin, r));
        let struts = (0..self.strut_angles.len())
            .filter_map(|k| self.strut_at(k))
            .filter_map(|corners| Outline::polygon(&corners));
        circles.chain(struts).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_default_layout() {
        let layout = CylinderSpec::default().layout().unwrap();
        assert_eq!(layout.circle_radii, [5.0, 7.0, 8.0, 10.0]);
        assert_eq!(layout.strut_angles.len(), 3);
        assert!((layout.strut_angles[1] - 2.0 * PI / 3.0).abs() < EPSILON);
        assert_eq!(layout.strut[0], Point2::new(1.0, 5.0 + 1.8));
        assert_eq!(layout.strut[2], Point2::new(-1.0, 10.0 - 1.8));
    }

    #[test]
    fn test_struts_stay_between_rings() {
        let layout = CylinderSpec::default().layout().unwrap();
        let inner = layout.circle_radii[0];
        let outer = layout.circle_radii[3];
        for k in 0..3 {
            for c in layout.strut_at(k).unwrap().iter() {
                let r = c.coords.norm();
                assert!(r > inner && r < outer, "corner {c:?} of strut {k} at r={r}");
            }
        }
        assert!(layout.strut_at(3).is_none());
    }

    #[test]
    fn test_strut_rotation() {
        let spec = CylinderSpec {
            num_support: 4,
            ..CylinderSpec::default()
        };
        let layout = spec.layout().unwrap();
        // A quarter turn moves +Y onto -X
        let corner = layout.strut_at(1).unwrap()[0];
        assert!((corner.x - -layout.strut[0].y).abs() < EPSILON);
        assert!((corner.y - layout.strut[0].x).abs() < EPSILON);
    }

    #[test]
    fn test_outlines() {
        let layout = CylinderSpec::default().layout().unwrap();
        let outlines = layout.outlines();
        assert_eq!(outlines.len(), 4 + 3);
        assert!(outlines.iter().all(|o| o.is_closed(EPSILON)));
    }

    #[test]
    fn test_validation() {
        let ok = CylinderSpec::default();
        assert!(ok.validate().is_ok());
        assert!(CylinderSpec { inner_diameter: 0.0, ..ok }.validate().is_err());
        assert!(CylinderSpec { outer_diameter: -1.0, ..ok }.validate().is_err());
        assert!(CylinderSpec { thickness_y: 0.0, ..ok }.validate().is_err());
        assert!(CylinderSpec { thickness_z: 0.0, ..ok }.validate().is_ok());
        assert!(CylinderSpec { thickness_z: -0.1, ..ok }.validate().is_err());
        assert!(CylinderSpec { thickness_z: f64::INFINITY, ..ok }.validate().is_err());
        assert!(CylinderSpec { outer_diameter: f64::INFINITY, ..ok }.validate().is_err());
        assert!(CylinderSpec { thickness_y: f64::NAN, ..ok }.validate().is_err());
        assert!(matches!(
            CylinderSpec { num_support: 1, ..ok }.layout(),
            Err(GearError::InvalidCylinderSpec(_))
        ));
    }
}
