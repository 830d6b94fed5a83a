//! Sampling of the involute of a circle.
//!
//! Angles are measured from the line joining the centre to the point where the
//! unwinding string leaves the base circle, so the curve starts at `(rb, 0)`
//! and sweeps counter-clockwise as the radius grows.
use log::trace;
use nalgebra::geometry::Point2;

use crate::error::{GearError, Result};

/// The point on the involute of the circle of radius `base_radius` that lies at
/// distance `radius` from the centre.
pub fn point_at(base_radius: f64, radius: f64) -> Result<Point2<f64>> {
    if !(base_radius > 0.0) {
        return Err(GearError::InvalidArgument(format!(
            "base circle radius must be positive, got {base_radius}"
        )));
    }
    // At or inside the base circle the square root below has no real value
    if !(radius > base_radius) || !radius.is_finite() {
        return Err(GearError::DomainError {
            base_radius,
            radius,
        });
    }

    let l = (radius * radius - base_radius * base_radius).sqrt();
    let alpha = l / base_radius;
    let theta = alpha - (base_radius / radius).acos();

    Ok(Point2::new(radius * theta.cos(), radius * theta.sin()))
}

/// Like `point_at`, but a radius exactly on the base circle gives the origin
/// of the involute, `(rb, 0)`, instead of an error.
pub fn flank_point(base_radius: f64, radius: f64) -> Result<Point2<f64>> {
    if base_radius > 0.0 && radius == base_radius {
        Ok(Point2::new(base_radius, 0.0))
    } else {
        point_at(base_radius, radius)
    }
}

fn check_count(count: usize) -> Result<()> {
    if count < 2 {
        return Err(GearError::InvalidArgument(format!(
            "need at least 2 samples, got {count}"
        )));
    }
    Ok(())
}

/// Radius of sample `i` out of `count`, equally spaced from `start` to `end` inclusive.
fn sample_radius(start: f64, end: f64, i: usize, count: usize) -> f64 {
    if i + 1 == count {
        end
    } else {
        start + (end - start) * i as f64 / (count - 1) as f64
    }
}

/// `count` involute points at equally spaced radii from `start_radius` to `end_radius`.
pub fn sample_sequence(
    base_radius: f64,
    start_radius: f64,
    end_radius: f64,
    count: usize,
) -> Result<Vec<Point2<f64>>> {
    check_count(count)?;
    if !(start_radius > base_radius) {
        return Err(GearError::InvalidArgument(format!(
            "start radius {start_radius} must lie outside the base circle ({base_radius})"
        )));
    }
    if !(end_radius > start_radius) {
        return Err(GearError::InvalidArgument(format!(
            "end radius {end_radius} must be greater than start radius {start_radius}"
        )));
    }

    trace!("Sampling {count} involute points from r={start_radius} to r={end_radius}");
    (0..count)
        .map(|i| point_at(base_radius, sample_radius(start_radius, end_radius, i, count)))
        .collect()
}

/// A tooth flank: `count` points from the base circle out to `end_radius`.
///
/// The first sample is the origin of the involute, `(rb, 0)`.
pub fn sample_flank(base_radius: f64, end_radius: f64, count: usize) -> Result<Vec<Point2<f64>>> {
    check_count(count)?;
    if !(base_radius > 0.0) {
        return Err(GearError::InvalidArgument(format!(
            "base circle radius must be positive, got {base_radius}"
        )));
    }
    if !(end_radius > base_radius) {
        return Err(GearError::DomainError {
            base_radius,
            radius: end_radius,
        });
    }

    (0..count)
        .map(|i| flank_point(base_radius, sample_radius(base_radius, end_radius, i, count)))
        .collect()
}
