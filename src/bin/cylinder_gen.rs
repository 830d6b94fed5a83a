//! G-Code generator for lightening cylinders: two rings joined by radial support struts
use anyhow::{Context, Result};
use involute::cylinder::{CylinderLayout, CylinderSpec};
use involute::toolpath::{depth_passes, engrave_outline};
use involute::{gcode_comment, preamble, svg, trailer};
use log::{info, warn};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cylinder_gen",
    about = "Generates rings joined by support struts, to lighten a cylindrical part"
)]
struct Opt {
    /// Inner diameter, in mm
    #[structopt(long, default_value = "10")]
    inner_dia: f64,

    /// Outer diameter, in mm
    #[structopt(long, default_value = "20")]
    outer_dia: f64,

    /// Ring wall and strut thickness, in mm
    #[structopt(long, default_value = "2")]
    support_thickness: f64,

    /// Part thickness, in mm
    #[structopt(long, default_value = "2")]
    thickness: f64,

    /// Number of support struts
    #[structopt(short, long, default_value = "3")]
    supports: u32,

    /// Diameter of cutter, in mm
    #[structopt(long, default_value = "1")]
    tool_dia: f64,

    /// Cutter RPM
    #[structopt(long, default_value = "10000")]
    rpm: f64,

    /// Feed rate, in mm/min
    #[structopt(long, default_value = "150")]
    feed: f64,

    /// Name for the job
    #[structopt(short, long)]
    name: Option<String>,

    /// Tool number for the cut
    #[structopt(long, default_value = "15")]
    tool: u32,

    /// Max depth per pass, in mm
    #[structopt(long, default_value = "0.25")]
    max_depth: f64,

    /// Output file for the resulting G code
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,

    /// Also write an SVG preview
    #[structopt(long, parse(from_os_str))]
    svg: Option<PathBuf>,

    #[structopt(long)]
    coolant: bool,
}

impl Opt {
    fn spec(&self) -> CylinderSpec {
        CylinderSpec {
            inner_diameter: self.inner_dia,
            outer_diameter: self.outer_dia,
            thickness_y: self.support_thickness,
            thickness_z: self.thickness,
            num_support: self.supports,
        }
    }
}

fn cut_cylinder(opt: &Opt, layout: &CylinderLayout, file: &mut dyn Write) -> Result<()> {
    let passes = depth_passes(opt.thickness, opt.max_depth);
    if passes.is_empty() {
        warn!("Part thickness is {}, nothing to cut", opt.thickness);
    }

    for (n, outline) in layout.outlines().iter().enumerate() {
        gcode_comment(file, &format!("Outline {n}"))?;
        for depth in &passes {
            engrave_outline(file, outline, 1.0, 1.0, -depth, opt.feed)?;
        }
    }
    Ok(())
}

fn help_text(opt: &Opt) {
    println!(
        "Before cut:
        - Create stock with diameter at least {}mm and {}mm thick
        - Set home to center of stock, at the top",
        opt.outer_dia, opt.thickness
    )
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let layout = opt.spec().layout().context("Invalid cylinder parameters")?;
    info!(
        "Cylinder with rings at {:?} and {} struts",
        layout.circle_radii,
        layout.strut_angles.len()
    );
    help_text(&opt);

    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&opt.output)
            .with_context(|| format!("Failed to open {}", opt.output.display()))?,
    );

    preamble(
        &opt.name,
        opt.tool,
        &format!("T{} D={} end mill", opt.tool, opt.tool_dia),
        opt.rpm,
        opt.coolant,
        &mut file,
    )?;
    cut_cylinder(&opt, &layout, &mut file)?;
    trailer(&mut file)?;
    file.flush()?;

    if let Some(path) = &opt.svg {
        let mut preview = BufWriter::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        );
        svg::write_document(
            &mut preview,
            opt.name.as_deref().unwrap_or("Lightening cylinder"),
            opt.outer_dia / 2.0 * 1.1,
            &layout.outlines(),
        )?;
        preview.flush()?;
    }

    Ok(())
}
