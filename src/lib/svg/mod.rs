//! SVG previews of outlines. Model Y points up, so it is flipped on output.
use std::io::{Result, Write};

use nalgebra::geometry::Point2;

use crate::outline::{arc_sweep, Outline, Segment};

fn coords(p: &Point2<f64>) -> String {
    format!("{:.5} {:.5}", p.x, -p.y)
}

/// SVG path data for `outline`
pub fn path_data(outline: &Outline) -> String {
    let mut d = format!("M {}", coords(&outline.start));
    let mut current = outline.start;
    for segment in &outline.segments {
        match segment {
            Segment::Line(to) => d.push_str(&format!(" L {}", coords(to))),
            Segment::Arc { to, center, ccw } => {
                let radius = (current - center).norm();
                let large = arc_sweep(&current, to, center, *ccw) > std::f64::consts::PI;
                // Flipping Y turns model counter-clockwise into screen clockwise,
                // which is SVG's positive sweep direction
                d.push_str(&format!(
                    " A {radius:.5} {radius:.5} 0 {} {} {}",
                    large as u8,
                    *ccw as u8,
                    coords(to)
                ));
            }
        }
        current = segment.end();
    }
    d.push_str(" Z");
    d
}

/// Write a standalone SVG document showing `outlines`, centred on the origin.
/// `extent` is the half-width of the square view box.
pub fn write_document(
    file: &mut dyn Write,
    title: &str,
    extent: f64,
    outlines: &[Outline],
) -> Result<()> {
    let size = 2.0 * extent;
    writeln!(file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        file,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.5} {:.5} {size:.5} {size:.5}">"#,
        -extent, -extent
    )?;
    writeln!(file, "  <title>{}</title>", escape(title))?;
    for outline in outlines {
        writeln!(
            file,
            r#"  <path d="{}" fill="none" stroke="black" stroke-width="{:.5}"/>"#,
            path_data(outline),
            size / 500.0
        )?;
    }
    writeln!(file, "</svg>")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
