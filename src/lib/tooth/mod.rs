//! Assembly of a single tooth from two mirrored involute flanks.
use std::f64::consts::PI;

use log::debug;
use nalgebra::geometry::{Point2, Rotation2};

use crate::error::Result;
use crate::gear::{GearDerivedValues, GearSpec};
use crate::involute::{flank_point, sample_flank};

/// Samples per flank, fed to the curve fit in order
pub const INVOLUTE_POINT_COUNT: usize = 10;

/// A point stored by distance from the origin and angle from the X axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Polar {
    distance: f64,
    angle: f64,
}

impl Polar {
    fn of(p: &Point2<f64>) -> Self {
        Polar {
            distance: p.coords.norm(),
            angle: p.y.atan2(p.x),
        }
    }

    fn at(&self, offset: f64) -> Point2<f64> {
        let a = self.angle + offset;
        Point2::new(self.distance * a.cos(), self.distance * a.sin())
    }
}

/// One tooth, centred on the X axis.
///
/// `flank_a` runs below the axis and `flank_b` is its mirror image above it.
/// Both go from the base circle out to the tip, in fit order.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothProfile {
    pub flank_a: Vec<Point2<f64>>,
    pub flank_b: Vec<Point2<f64>>,
    /// Where flank A meets the root circle. `None` when the involute reaches the root itself.
    pub root_point_a: Option<Point2<f64>>,
    pub root_point_b: Option<Point2<f64>>,
    /// Apex of the tooth, on the outside circle
    pub outside_mid_point: Point2<f64>,
    /// Rotation applied to the raw involute to centre the tooth
    pub rotation: f64,
    /// Angle between consecutive teeth
    pub index_angle: f64,
    pub derived: GearDerivedValues,
    // Angle at which this copy sits, relative to the tooth on the X axis
    offset: f64,
    polar_a: Vec<Polar>,
    polar_b: Vec<Polar>,
}

impl ToothProfile {
    /// This tooth turned by `angle` about the origin.
    ///
    /// Points are recomputed from their cached polar form rather than by
    /// rotating the already rotated coordinates again.
    pub fn rotated(&self, angle: f64) -> ToothProfile {
        let offset = self.offset + angle;
        let root_radius = self.derived.root_radius();
        let root_at = |polar: &[Polar], present: bool| {
            if present {
                polar.first().map(|p| {
                    Polar {
                        distance: root_radius,
                        angle: p.angle,
                    }
                    .at(offset)
                })
            } else {
                None
            }
        };

        ToothProfile {
            flank_a: self.polar_a.iter().map(|p| p.at(offset)).collect(),
            flank_b: self.polar_b.iter().map(|p| p.at(offset)).collect(),
            root_point_a: root_at(self.polar_a.as_slice(), self.root_point_a.is_some()),
            root_point_b: root_at(self.polar_b.as_slice(), self.root_point_b.is_some()),
            outside_mid_point: Polar {
                distance: self.derived.outside_radius(),
                angle: 0.0,
            }
            .at(offset),
            rotation: self.rotation,
            index_angle: self.index_angle,
            derived: self.derived,
            offset,
            polar_a: self.polar_a.clone(),
            polar_b: self.polar_b.clone(),
        }
    }

    /// The neighbouring tooth, one index angle further round
    pub fn next_gap(&self) -> ToothProfile {
        self.rotated(self.index_angle)
    }

    /// Angle of this copy relative to the tooth built on the X axis
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// Build the tooth profile for `spec`.
///
/// Any error from the solver or the sampler aborts the build.
pub fn build_tooth(spec: &GearSpec) -> Result<ToothProfile> {
    let derived = spec.derived()?;
    let base_radius = derived.base_circle_radius();

    let involute = sample_flank(base_radius, derived.outside_radius(), INVOLUTE_POINT_COUNT)?;

    // Angle from the X axis to where the involute crosses the pitch circle.
    // With no pressure angle the pitch circle is the base circle.
    let pitch_point = flank_point(base_radius, derived.pitch_radius())?;
    let pitch_point_angle = pitch_point.y.atan2(pitch_point.x);

    let tooth_thickness_angle = -PI / spec.num_teeth as f64;

    // Put the pitch point half a tooth thickness below the X axis
    let rotation = -pitch_point_angle + tooth_thickness_angle / 2.0;
    let rot = Rotation2::new(rotation);
    let flank_a: Vec<Point2<f64>> = involute.iter().map(|p| rot * p).collect();

    // Mirror about the X axis
    let flank_b: Vec<Point2<f64>> = flank_a.iter().map(|p| Point2::new(p.x, -p.y)).collect();

    let polar_a: Vec<Polar> = flank_a.iter().map(Polar::of).collect();
    let polar_b: Vec<Polar> = flank_b.iter().map(Polar::of).collect();

    let (root_point_a, root_point_b) = if derived.needs_root_segment() {
        let root = |p: &Polar| {
            Polar {
                distance: derived.root_radius(),
                angle: p.angle,
            }
            .at(0.0)
        };
        (
            polar_a.first().map(root),
            polar_b.first().map(root),
        )
    } else {
        (None, None)
    };

    debug!(
        "Built tooth: pitch point angle {pitch_point_angle:.6}, rotation {rotation:.6}, root segments {}",
        root_point_a.is_some()
    );

    Ok(ToothProfile {
        flank_a,
        flank_b,
        root_point_a,
        root_point_b,
        outside_mid_point: Point2::new(derived.outside_radius(), 0.0),
        rotation,
        index_angle: -2.0 * tooth_thickness_angle,
        derived,
        offset: 0.0,
        polar_a,
        polar_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GearError;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn points_equal(p1: &Point2<f64>, p2: &Point2<f64>) -> bool {
        (p1 - p2).norm() < EPSILON
    }

    #[test]
    fn test_default_tooth_shape() {
        let spec = GearSpec::default();
        let tooth = build_tooth(&spec).unwrap();
        let d = tooth.derived;

        assert_eq!(tooth.flank_a.len(), INVOLUTE_POINT_COUNT);
        assert_eq!(tooth.flank_b.len(), INVOLUTE_POINT_COUNT);
        assert_relative_eq!(
            tooth.flank_a[0].coords.norm(),
            d.base_circle_radius(),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            tooth.flank_a[INVOLUTE_POINT_COUNT - 1].coords.norm(),
            d.outside_radius(),
            epsilon = EPSILON
        );
        // Flank A sits below the axis, flank B above
        assert!(tooth.flank_a.iter().all(|p| p.y < 0.0));
        assert!(tooth.flank_b.iter().all(|p| p.y > 0.0));
        assert_eq!(tooth.outside_mid_point, Point2::new(d.outside_radius(), 0.0));
        assert_relative_eq!(tooth.index_angle, 2.0 * PI / 24.0, epsilon = EPSILON);
    }

    #[test]
    fn test_pitch_point_lands_half_thickness_below_axis() {
        let spec = GearSpec::default();
        let tooth = build_tooth(&spec).unwrap();
        let d = tooth.derived;
        let pitch = crate::involute::point_at(d.base_circle_radius(), d.pitch_radius()).unwrap();
        let placed = Rotation2::new(tooth.rotation) * pitch;
        assert_relative_eq!(
            placed.y.atan2(placed.x),
            -PI / (2.0 * spec.num_teeth as f64),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_rotation_keeps_radii() {
        let spec = GearSpec::default();
        let tooth = build_tooth(&spec).unwrap();
        let d = tooth.derived;
        let raw = sample_flank(
            d.base_circle_radius(),
            d.outside_radius(),
            INVOLUTE_POINT_COUNT,
        )
        .unwrap();
        for (r, p) in raw.iter().zip(&tooth.flank_a) {
            assert_relative_eq!(r.coords.norm(), p.coords.norm(), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_flanks_are_mirrored() {
        let tooth = build_tooth(&GearSpec::new(4.0, 17, 25.0_f64.to_radians(), 1.0)).unwrap();
        for (a, b) in tooth.flank_a.iter().zip(&tooth.flank_b) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, -b.y);
        }
    }

    #[test]
    fn test_root_points_follow_first_samples() {
        let tooth = build_tooth(&GearSpec::default()).unwrap();
        let root_radius = tooth.derived.root_radius();
        let ra = tooth.root_point_a.unwrap();
        let rb = tooth.root_point_b.unwrap();
        assert_relative_eq!(ra.coords.norm(), root_radius, epsilon = EPSILON);
        assert_relative_eq!(rb.coords.norm(), root_radius, epsilon = EPSILON);
        let fa = tooth.flank_a[0];
        assert_relative_eq!(ra.y.atan2(ra.x), fa.y.atan2(fa.x), epsilon = EPSILON);
        assert!(points_equal(&rb, &Point2::new(ra.x, -ra.y)));
    }

    #[test]
    fn test_no_root_points_when_base_inside_root() {
        let tooth = build_tooth(&GearSpec::new(7.62, 60, 20.0_f64.to_radians(), 2.0)).unwrap();
        assert!(tooth.root_point_a.is_none());
        assert!(tooth.root_point_b.is_none());
        assert!(tooth.next_gap().root_point_a.is_none());
    }

    #[test]
    fn test_next_gap_from_polar_form() {
        let tooth = build_tooth(&GearSpec::default()).unwrap();
        let next = tooth.next_gap();
        let turn = Rotation2::new(tooth.index_angle);
        for (p, q) in tooth.flank_a.iter().zip(&next.flank_a) {
            assert!(points_equal(&(turn * p), q));
        }
        for (p, q) in tooth.flank_b.iter().zip(&next.flank_b) {
            assert!(points_equal(&(turn * p), q));
        }
        assert!(points_equal(
            &(turn * tooth.root_point_a.unwrap()),
            &next.root_point_a.unwrap()
        ));
        assert!(points_equal(&(turn * tooth.outside_mid_point), &next.outside_mid_point));
        assert_relative_eq!(next.offset(), tooth.index_angle, epsilon = EPSILON);
    }

    #[test]
    fn test_full_turn_returns_home() {
        let spec = GearSpec::new(7.62, 7, 20.0_f64.to_radians(), 2.0);
        let tooth = build_tooth(&spec).unwrap();
        let mut copy = tooth.clone();
        for _ in 0..spec.num_teeth {
            copy = copy.next_gap();
        }
        for (p, q) in tooth.flank_a.iter().zip(&copy.flank_a) {
            assert!(points_equal(p, q));
        }
    }

    #[test]
    fn test_build_is_repeatable() {
        let spec = GearSpec::new(3.0, 31, 14.5_f64.to_radians(), 1.0);
        assert_eq!(build_tooth(&spec).unwrap(), build_tooth(&spec).unwrap());
    }

    #[test]
    fn test_smallest_gear_builds() {
        let spec = GearSpec::new(7.62, 3, 20.0_f64.to_radians(), 2.0);
        let tooth = build_tooth(&spec).unwrap();
        assert_eq!(tooth.flank_a.len(), INVOLUTE_POINT_COUNT);
    }

    #[test]
    fn test_zero_pressure_angle() {
        let tooth = build_tooth(&GearSpec::new(7.62, 24, 0.0, 2.0)).unwrap();
        let d = tooth.derived;
        assert_eq!(d.base_circle_diameter, d.pitch_diameter);
        assert_relative_eq!(tooth.rotation, -PI / 48.0, epsilon = EPSILON);
    }

    #[test]
    fn test_invalid_spec_propagates() {
        let err = build_tooth(&GearSpec::new(0.0, 24, 0.3, 2.0)).unwrap_err();
        assert!(matches!(err, GearError::InvalidGearSpec(_)));
        let err = build_tooth(&GearSpec::new(7.62, 0, 0.3, 2.0)).unwrap_err();
        assert!(matches!(err, GearError::InvalidGearSpec(_)));
    }
}
