//! G-Code generator for cutting involute spur gears out of plate stock.
//! The cutter follows the gear outline itself; apply cutter compensation at the machine.
use anyhow::{Context, Result};
use involute::outline::{gear_outline, Outline};
use involute::toolpath::{depth_passes, engrave_outline};
use involute::{build_tooth, gcode_comment, preamble, svg, trailer, GearSpec};
use log::info;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "gear_gen", about = "An involute spur gear generator")]
struct Opt {
    /// Diametral pitch: teeth per unit of pitch diameter
    #[structopt(short = "p", long, default_value = "7.62")]
    diametral_pitch: f64,

    /// Number of gear teeth
    #[structopt(short, long, default_value = "24")]
    teeth: u32,

    /// Pressure angle, in degrees
    #[structopt(long, default_value = "20")]
    pressure_angle: f64,

    /// Gear thickness, in model units
    #[structopt(long, default_value = "2")]
    thickness: f64,

    /// Millimetres per model unit
    #[structopt(long, default_value = "10")]
    scale: f64,

    /// Diameter of cutter, in mm
    #[structopt(long, default_value = "3")]
    tool_dia: f64,

    /// Cutter RPM
    #[structopt(long, default_value = "8000")]
    rpm: f64,

    /// Feed rate, in mm/min
    #[structopt(long, default_value = "200")]
    feed: f64,

    /// Name for the job
    #[structopt(short, long)]
    name: Option<String>,

    /// Tool number for the cut
    #[structopt(long, default_value = "1")]
    tool: u32,

    /// Max depth per pass, in mm
    #[structopt(long, default_value = "0.5")]
    max_depth: f64,

    /// Output file for the resulting G code
    #[structopt(short, long, parse(from_os_str))]
    output: PathBuf,

    /// Also write an SVG preview of the outline
    #[structopt(long, parse(from_os_str))]
    svg: Option<PathBuf>,

    #[structopt(long)]
    coolant: bool,
}

impl Opt {
    fn spec(&self) -> GearSpec {
        GearSpec::new(
            self.diametral_pitch,
            self.teeth,
            self.pressure_angle.to_radians(),
            self.thickness,
        )
    }
}

fn cut_gear(opt: &Opt, outline: &Outline, file: &mut dyn Write) -> Result<()> {
    let total_depth = opt.thickness * opt.scale;
    let passes = depth_passes(total_depth, opt.max_depth);
    info!("Cutting {} passes to {total_depth}mm", passes.len());

    for (i, depth) in passes.iter().enumerate() {
        gcode_comment(file, &format!("Pass {} of {} at depth {depth:.4}", i + 1, passes.len()))?;
        engrave_outline(file, outline, opt.scale, 1.0, -depth, opt.feed)?;
    }
    Ok(())
}

fn help_text(opt: &Opt, outside_diameter: f64) {
    println!(
        "Before cut:
        - Create plate stock at least {:.2}mm square and {:.2}mm thick
        - Set home to the gear center, at the top of the stock",
        outside_diameter * opt.scale,
        opt.thickness * opt.scale
    )
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let spec = opt.spec();
    spec.validate().context("Invalid gear parameters")?;
    let tooth = build_tooth(&spec).context("Failed to build tooth profile")?;
    let outline = gear_outline(&tooth);
    let body_name = tooth.derived.body_name();
    info!("Built {body_name} with {} outline segments", outline.segments.len());

    help_text(&opt, tooth.derived.outside_diameter);

    let mut file = BufWriter::new(
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&opt.output)
            .with_context(|| format!("Failed to open {}", opt.output.display()))?,
    );

    let name = opt.name.clone().or_else(|| Some(body_name.clone()));
    preamble(
        &name,
        opt.tool,
        &format!("T{} D={} end mill", opt.tool, opt.tool_dia),
        opt.rpm,
        opt.coolant,
        &mut file,
    )?;
    cut_gear(&opt, &outline, &mut file)?;
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
            &body_name,
            tooth.derived.outside_radius() * 1.1,
            &[outline],
        )?;
        preview.flush()?;
        info!("Wrote preview to {}", path.display());
    }

    Ok(())
}
