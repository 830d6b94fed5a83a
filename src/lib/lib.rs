//! Involute spur gear geometry, and G-code/SVG output for the resulting parts.
use std::io::{Error, ErrorKind, Result, Write};

pub mod cylinder;
pub mod error;
pub mod gear;
pub mod geometry;
pub mod involute;
pub mod outline;
pub mod svg;
pub mod tooth;
pub mod toolpath;

pub use error::GearError;
pub use gear::{solve, GearDerivedValues, GearSpec};
pub use involute::{point_at, sample_flank, sample_sequence};
pub use tooth::{build_tooth, ToothProfile};

pub fn gcode_comment(file: &mut dyn Write, s: &str) -> Result<()> {
    writeln!(file, "({s})")
}

pub fn trailer(file: &mut dyn Write) -> Result<()> {
    writeln!(file, "G30 (Go Home)")?;
    writeln!(file, "M9 (Coolant off)")?;
    writeln!(file, "M5 (Spindle off)")?;
    writeln!(file, "M30")?;

    Ok(())
}

pub fn preamble(
    name: &Option<String>,
    tool: u32,
    tool_comment: &str,
    rpm: f64,
    coolant: bool,
    file: &mut dyn Write,
) -> Result<()> {
    // Print out the name as a comment on the first line, if set
    if let Some(name) = &name {
        gcode_comment(file, name)?;
    }
    // Comment with tool information
    gcode_comment(file, tool_comment)?;

    // Preamble to set the machine into a reasonable mode
    let preamble_str = "
G90 (Absolute)
G54 (G54 Datum)
G17 (X-Y Plane)
G40 (No cutter compensation)
G80 (No cycles)
G94 (Feed per minute)
G91.1 (Incremental arc centers)
G49 (No tool length compensation)
M9 (Coolant off)

G21 (Metric)

G30 (Go Home Before Starting)
    ";
    write!(file, "{preamble_str}\n\n")?;
    tool_change(file, tool, rpm)?;

    // If chosen, start coolant flowing
    if coolant {
        writeln!(file, "M8")?;
    }

    Ok(())
}

pub fn tool_change(file: &mut dyn Write, tool: u32, rpm: f64) -> Result<()> {
    writeln!(file, "M5 (Spindle off)")?;
    writeln!(file, "G30 (Go Home)")?;
    writeln!(file, "M0 (stop for tool change)")?;
    // Choose the tool, enable length compensation and run the tool change cycle
    writeln!(file, "T{tool} G43 H{tool} M6")?;

    writeln!(file, "S{rpm} M3")?;

    Ok(())
}

trait AsGVals {
    fn as_gvals(&self, file: &mut dyn Write) -> Result<()>;
}

#[derive(Clone, Debug)]
pub struct PosAndFeed {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    feed: Option<f64>,
}

pub fn xy(x: f64, y: f64) -> PosAndFeed {
    PosAndFeed {
        x: Some(x),
        y: Some(y),
        z: None,
        feed: None,
    }
}

pub fn xyf(x: f64, y: f64, feed: f64) -> PosAndFeed {
    PosAndFeed {
        x: Some(x),
        y: Some(y),
        z: None,
        feed: Some(feed),
    }
}

pub fn z(z: f64) -> PosAndFeed {
    PosAndFeed {
        x: None,
        y: None,
        z: Some(z),
        feed: None,
    }
}

pub fn zf(z: f64, feed: f64) -> PosAndFeed {
    PosAndFeed {
        x: None,
        y: None,
        z: Some(z),
        feed: Some(feed),
    }
}

impl PosAndFeed {
    fn check_axes(&self) -> Result<()> {
        if self.x.is_none() && self.y.is_none() && self.z.is_none() {
            return Err(illegal_move("move names no axis"));
        }
        Ok(())
    }
}

impl AsGVals for PosAndFeed {
    fn as_gvals(&self, file: &mut dyn Write) -> Result<()> {
        g_val(file, "X", self.x)?;
        g_val(file, "Y", self.y)?;
        g_val(file, "Z", self.z)?;
        g_val(file, "F", self.feed)?;
        Ok(())
    }
}

fn illegal_move(msg: &str) -> Error {
    Error::new(ErrorKind::InvalidInput, msg.to_string())
}

/// Emit a gcode parameter value, if `ov` is `Some`.
/// To make the gcode human-friendly, numbers that round nicely are printed in their minimal form.
fn g_val(file: &mut dyn Write, name: &str, ov: Option<f64>) -> Result<()> {
    if let Some(v) = ov {
        if (v - v.round()).abs() < f64::EPSILON {
            write!(file, " {}{}.", name, v.round())
        } else {
            write!(file, " {name}{v:.4}")
        }
    } else {
        Ok(())
    }
}

fn g_move_linear(file: &mut dyn Write, g: &str, p: &dyn AsGVals) -> Result<()> {
    write!(file, "{g}")?;
    p.as_gvals(file)?;
    writeln!(file)?;
    Ok(())
}

pub fn g0(file: &mut dyn Write, p: PosAndFeed) -> Result<()> {
    if p.feed.is_some() {
        return Err(illegal_move("rapid move with a feed rate"));
    }
    p.check_axes()?;
    match p.z {
        Some(z) if !(z > 0.0) => Err(illegal_move(&format!("rapid move down to Z{z}"))),
        _ => g_move_linear(file, "G0", &p),
    }
}

pub fn g1(file: &mut dyn Write, p: PosAndFeed) -> Result<()> {
    if p.feed.is_none() {
        return Err(illegal_move("feed move without a feed rate"));
    }
    p.check_axes()?;
    g_move_linear(file, "G1", &p)
}

/// Arc end point, with I, J as the offset from the arc start to its center
pub struct PosXYIJ {
    x: f64,
    y: f64,
    i: f64,
    j: f64,
    feed: f64,
}

pub fn xyijf(x: f64, y: f64, i: f64, j: f64, feed: f64) -> PosXYIJ {
    PosXYIJ { x, y, i, j, feed }
}

impl AsGVals for PosXYIJ {
    fn as_gvals(&self, file: &mut dyn Write) -> Result<()> {
        g_val(file, "X", Some(self.x))?;
        g_val(file, "Y", Some(self.y))?;
        g_val(file, "I", Some(self.i))?;
        g_val(file, "J", Some(self.j))?;
        g_val(file, "F", Some(self.feed))?;
        Ok(())
    }
}

/// G2 clockwise arc move
/// See https://www.cnccookbook.com/cnc-g-code-arc-circle-g02-g03/ for a good description of what the params mean
pub fn g2(file: &mut dyn Write, p: PosXYIJ) -> Result<()> {
    g_move_linear(file, "G2", &p)
}

/// G3 counter-clockwise arc move
pub fn g3(file: &mut dyn Write, p: PosXYIJ) -> Result<()> {
    g_move_linear(file, "G3", &p)
}
