use std::io::Result;
use std::io::Write;

use crate::outline::{Outline, Segment};
use crate::{g0, g1, g2, g3, xy, xyf, xyijf, z, zf};

/// Depths for successive passes down to `total_depth`.
///
/// Passes of `max_depth` until the remainder is within two passes, then two
/// equal passes to finish, so the last pass is never a sliver.
pub fn depth_passes(total_depth: f64, max_depth: f64) -> Vec<f64> {
    let mut passes = Vec::new();
    if !(total_depth > 0.0 && total_depth.is_finite()) || !(max_depth > 0.0) {
        return passes;
    }

    let mut depth = 0.0;
    while depth < total_depth {
        let remaining = total_depth - depth;
        if remaining > 2.0 * max_depth {
            depth += max_depth;
            passes.push(depth);
        } else {
            passes.push(depth + remaining / 2.0);
            passes.push(total_depth);
            depth = total_depth;
        }
    }
    passes
}

/// Follow `outline` at `z_cut`, scaling model coordinates by `scale`.
/// Starts and ends with the cutter at `z_safe`.
pub fn engrave_outline(
    file: &mut dyn Write,
    outline: &Outline,
    scale: f64,
    z_safe: f64,
    z_cut: f64,
    feed: f64,
) -> Result<()> {
    // Make sure the cutter is up, then rapid to the start and feed in
    g0(file, z(z_safe))?;
    let start = outline.start * scale;
    g0(file, xy(start.x, start.y))?;
    g1(file, zf(z_cut, feed))?;

    let mut current = start;
    for segment in &outline.segments {
        let to = segment.end() * scale;
        match segment {
            Segment::Line(_) => g1(file, xyf(to.x, to.y, feed))?,
            Segment::Arc { center, ccw, .. } => {
                let offset = *center * scale - current;
                let p = xyijf(to.x, to.y, offset.x, offset.y, feed);
                if *ccw {
                    g3(file, p)?
                } else {
                    g2(file, p)?
                }
            }
        }
        current = to;
    }

    // Raise the cutter, ready for the next rapid
    g1(file, zf(z_safe, feed))?;
    Ok(())
}
