use std::f64::consts::PI;

use log::debug;

use crate::error::{GearError, Result};

pub const DEFAULT_DIAMETRAL_PITCH: f64 = 7.62;
pub const DEFAULT_NUM_TEETH: u32 = 24;
pub const DEFAULT_PRESSURE_ANGLE_DEG: f64 = 20.0;
pub const DEFAULT_THICKNESS: f64 = 2.0;

/// Fewest teeth the generator accepts
pub const MIN_TEETH: u32 = 3;
/// Steepest pressure angle the generator accepts, in degrees
pub const MAX_PRESSURE_ANGLE_DEG: f64 = 30.0;

// NB: the dedendum switch compares a diametral pitch against 20 degrees in radians.
const DEDENDUM_PITCH_THRESHOLD: f64 = 20.0 * (PI / 180.0);

/// Input parameters for a spur gear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearSpec {
    /// Teeth per unit of pitch diameter
    pub diametral_pitch: f64,
    pub num_teeth: u32,
    /// Pressure angle, in radians
    pub pressure_angle: f64,
    /// Extrusion depth. Not used by the tooth geometry itself.
    pub thickness: f64,
}

impl Default for GearSpec {
    fn default() -> Self {
        Self {
            diametral_pitch: DEFAULT_DIAMETRAL_PITCH,
            num_teeth: DEFAULT_NUM_TEETH,
            pressure_angle: DEFAULT_PRESSURE_ANGLE_DEG.to_radians(),
            thickness: DEFAULT_THICKNESS,
        }
    }
}

impl GearSpec {
    pub fn new(diametral_pitch: f64, num_teeth: u32, pressure_angle: f64, thickness: f64) -> Self {
        Self {
            diametral_pitch,
            num_teeth,
            pressure_angle,
            thickness,
        }
    }

    /// Check the inputs before anything gets built.
    /// Stricter than `solve`: this is the range the generator is willing to cut.
    pub fn validate(&self) -> Result<()> {
        if self.num_teeth < MIN_TEETH {
            return Err(GearError::InvalidGearSpec(format!(
                "number of teeth must be at least {MIN_TEETH}, got {}",
                self.num_teeth
            )));
        }
        if !(self.diametral_pitch > 0.0 && self.diametral_pitch.is_finite()) {
            return Err(GearError::InvalidGearSpec(format!(
                "diametral pitch must be positive and finite, got {}",
                self.diametral_pitch
            )));
        }
        if !(self.thickness > 0.0 && self.thickness.is_finite()) {
            return Err(GearError::InvalidGearSpec(format!(
                "thickness must be positive and finite, got {}",
                self.thickness
            )));
        }
        let max_angle = MAX_PRESSURE_ANGLE_DEG.to_radians();
        if !(0.0..=max_angle).contains(&self.pressure_angle) {
            return Err(GearError::InvalidGearSpec(format!(
                "pressure angle must be between 0 and {MAX_PRESSURE_ANGLE_DEG} degrees, got {:.4}",
                self.pressure_angle.to_degrees()
            )));
        }
        Ok(())
    }

    pub fn derived(&self) -> Result<GearDerivedValues> {
        solve(self.diametral_pitch, self.num_teeth, self.pressure_angle)
    }
}

/// Dimensions that follow from a `GearSpec`. Always recomputed, never edited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearDerivedValues {
    pub pitch_diameter: f64,
    /// Distance from pitch circle to root circle
    pub dedendum: f64,
    pub root_diameter: f64,
    pub base_circle_diameter: f64,
    pub outside_diameter: f64,
}

impl GearDerivedValues {
    pub fn pitch_radius(&self) -> f64 {
        self.pitch_diameter / 2.0
    }

    pub fn root_radius(&self) -> f64 {
        self.root_diameter / 2.0
    }

    pub fn base_circle_radius(&self) -> f64 {
        self.base_circle_diameter / 2.0
    }

    pub fn outside_radius(&self) -> f64 {
        self.outside_diameter / 2.0
    }

    /// True when the involute starts outside the root circle, so a straight
    /// segment has to join each flank to the root.
    pub fn needs_root_segment(&self) -> bool {
        self.base_circle_diameter >= self.root_diameter
    }

    /// Name for the finished part
    pub fn body_name(&self) -> String {
        format!("Gear ({} pitch dia.)", self.pitch_diameter)
    }
}

/// Derive the gear dimensions from diametral pitch, tooth count and pressure angle (radians).
pub fn solve(diametral_pitch: f64, num_teeth: u32, pressure_angle: f64) -> Result<GearDerivedValues> {
    if !(diametral_pitch > 0.0 && diametral_pitch.is_finite()) {
        return Err(GearError::InvalidGearSpec(format!(
            "diametral pitch must be positive and finite, got {diametral_pitch}"
        )));
    }
    if num_teeth == 0 {
        return Err(GearError::InvalidGearSpec(
            "number of teeth must be positive".to_string(),
        ));
    }

    let teeth = num_teeth as f64;
    let pitch_diameter = teeth / diametral_pitch;
    let dedendum = if diametral_pitch < DEDENDUM_PITCH_THRESHOLD {
        1.157 / diametral_pitch
    } else {
        1.25 / diametral_pitch
    };
    let derived = GearDerivedValues {
        pitch_diameter,
        dedendum,
        root_diameter: pitch_diameter - 2.0 * dedendum,
        base_circle_diameter: pitch_diameter * pressure_angle.cos(),
        outside_diameter: (teeth + 2.0) / diametral_pitch,
    };
    debug!("Derived gear values {derived:?}");
    Ok(derived)
}
