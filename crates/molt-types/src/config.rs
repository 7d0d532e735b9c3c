//! The generation parameter set.
//!
//! One immutable `Config` is assembled per run from defaults, then an
//! optional JSON override document, then command-line overrides, merged
//! key-by-key. Unknown keys are reported back to the caller (to warn, never
//! silently apply) and cross-parameter consistency is checked before any
//! geometry is built. All lengths are millimeters, all angles degrees.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Magnet hardware is the common 6 x 2 mm neodymium disc; there are no size
/// parameters for it, only placement ones.
pub const MAGNET_HEIGHT: f64 = 2.0;
pub const MAGNET_DIAMETER: f64 = 6.0;

/// Errors raised while merging or validating a configuration. All of these
/// fire before any geometry exists.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("parameter {key}: expected {expected}, got {found}")]
    InvalidValue {
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("parameter {key} must be finite, got {value}")]
    NonFinite { key: String, value: f64 },

    #[error("parameter {key} must be positive, got {value}")]
    NonPositive { key: &'static str, value: f64 },

    #[error(
        "magnets cannot fit: {wall_key} ({wall}mm) minus magnet_separation_distance \
         ({separation}mm) leaves {remaining:.2}mm for a {height}mm tall magnet"
    )]
    MagnetMisfit {
        wall_key: &'static str,
        wall: f64,
        separation: f64,
        remaining: f64,
        height: f64,
    },

    #[error("lip_position_angles must be two distinct bearings in [-180, 180], got [{start}, {end}]")]
    BadLipSpan { start: f64, end: f64 },

    #[error(
        "tent hinge cannot stack {legs} leg(s): knuckles need {needed:.1}mm of bolt, \
         tent_hinge_bolt_l is {bolt_l}mm"
    )]
    TentHingeTooSmall {
        legs: usize,
        needed: f64,
        bolt_l: f64,
    },

    #[error("tent_legs must not be empty when tenting_stand is enabled")]
    NoTentLegs,

    #[error("output_filetype must be an extension starting with '.', got {value:?}")]
    BadFiletype { value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub output_dir: PathBuf,
    pub split: bool,
    pub carrycase: bool,
    pub flush_carrycase_lip: bool,
    pub honeycomb_base: bool,
    pub strap_loop: bool,
    pub tenting_stand: bool,
    pub output_filetype: String,

    /// Solid slab under the PCB.
    pub base_z_thickness: f64,
    /// Case wall thickness in the board plane.
    pub wall_xy_thickness: f64,
    /// Wall height above the resting PCB top.
    pub wall_z_height: f64,
    /// Gap between the base top and the PCB underside (component clearance).
    pub z_space_under_pcb: f64,
    /// Cavity clearance from the outline where the PCB rests. Negative
    /// squeezes for friction.
    pub wall_xy_bottom_tolerance: f64,
    /// Cavity clearance from the outline at the wall top.
    pub wall_xy_top_tolerance: f64,

    /// Bearing of the default finger cutout.
    pub cutout_position: f64,
    pub cutout_width: f64,
    /// Extra finger cutouts as [bearing, width] pairs.
    pub additional_cutouts: Vec<[f64; 2]>,
    pub chamfer_len: f64,

    /// Hex cell across-flats width.
    pub honeycomb_radius: f64,
    /// Wall left between hex cells.
    pub honeycomb_thickness: f64,

    pub strap_loop_thickness: f64,
    pub strap_loop_end_offset: f64,
    pub strap_loop_gap: f64,

    pub carrycase_tolerance_xy: f64,
    pub carrycase_tolerance_z: f64,
    pub carrycase_wall_xy_thickness: f64,
    /// Gap between the tops of the two inserted cases.
    pub carrycase_z_gap_between_cases: f64,
    pub carrycase_cutout_position: f64,
    pub carrycase_cutout_xy_width: f64,

    /// Radial engagement of the retention lip (also its z thickness).
    pub lip_len: f64,
    /// Arc span of the lip, [start, end] bearings counter-clockwise.
    pub lip_position_angles: [f64; 2],

    pub magnet_position: f64,
    /// Material left between a magnet face and the outer wall surface.
    pub magnet_separation_distance: f64,
    /// Arclength between adjacent magnet centers.
    pub magnet_spacing: f64,
    pub magnet_count: u32,

    /// Tenting legs as [width, length, tilt] triples.
    pub tent_legs: Vec<[f64; 3]>,
    pub tent_hinge_width: f64,
    pub tent_hinge_bolt_d: f64,
    pub tent_hinge_bolt_l: f64,
    pub tent_hinge_bolt_head_d: f64,
    pub tent_hinge_nut_l: f64,
    pub tent_hinge_nut_d: f64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            output_dir: PathBuf::from("build"),
            split: true,
            carrycase: true,
            flush_carrycase_lip: true,
            honeycomb_base: true,
            strap_loop: false,
            tenting_stand: false,
            output_filetype: ".stl".to_string(),
            base_z_thickness: 3.0,
            wall_xy_thickness: 2.81,
            wall_z_height: 4.0,
            z_space_under_pcb: 1.0,
            wall_xy_bottom_tolerance: -0.2,
            wall_xy_top_tolerance: 0.3,
            cutout_position: 10.0,
            cutout_width: 15.0,
            additional_cutouts: Vec::new(),
            chamfer_len: 1.0,
            honeycomb_radius: 6.0,
            honeycomb_thickness: 2.0,
            strap_loop_thickness: 4.0,
            strap_loop_end_offset: 0.0,
            strap_loop_gap: 5.0,
            carrycase_tolerance_xy: 0.4,
            carrycase_tolerance_z: 0.5,
            carrycase_wall_xy_thickness: 3.0,
            carrycase_z_gap_between_cases: 10.0,
            carrycase_cutout_position: -90.0,
            carrycase_cutout_xy_width: 20.0,
            lip_len: 1.3,
            lip_position_angles: [32.0, 158.0],
            magnet_position: -90.0,
            magnet_separation_distance: 0.81,
            magnet_spacing: 10.0,
            magnet_count: 10,
            tent_legs: vec![[30.0, 50.0, 0.0]],
            tent_hinge_width: 5.0,
            tent_hinge_bolt_d: 3.0,
            tent_hinge_bolt_l: 50.0,
            tent_hinge_bolt_head_d: 6.94,
            tent_hinge_nut_l: 2.4,
            tent_hinge_nut_d: 5.5,
        }
    }
}

impl Config {
    /// Total case wall height: base slab + under-PCB space + wall above PCB.
    pub fn wall_height(&self) -> f64 {
        self.base_z_thickness + self.z_space_under_pcb + self.wall_z_height
    }

    /// Merge one override layer, key by key. Later layers win over earlier
    /// ones; the returned list holds keys that matched no parameter (callers
    /// warn about them, they are never applied).
    pub fn merge_layer(
        &mut self,
        layer: &serde_json::Map<String, Value>,
    ) -> Result<Vec<String>, ConfigError> {
        let mut unknown = Vec::new();
        for (key, value) in layer {
            if !self.apply(key, value)? {
                unknown.push(key.clone());
            }
        }
        Ok(unknown)
    }

    /// Cross-parameter consistency, checked once after all layers merge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("base_z_thickness", self.base_z_thickness),
            ("wall_xy_thickness", self.wall_xy_thickness),
            ("wall_z_height", self.wall_z_height),
            ("cutout_width", self.cutout_width),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { key, value });
            }
        }
        if !self.output_filetype.starts_with('.') {
            return Err(ConfigError::BadFiletype {
                value: self.output_filetype.clone(),
            });
        }
        if self.carrycase {
            if self.magnet_count > 0 {
                self.check_magnet_fit("wall_xy_thickness", self.wall_xy_thickness)?;
                self.check_magnet_fit(
                    "carrycase_wall_xy_thickness",
                    self.carrycase_wall_xy_thickness,
                )?;
            }
            let [start, end] = self.lip_position_angles;
            if start == end || !(-180.0..=180.0).contains(&start) || !(-180.0..=180.0).contains(&end)
            {
                return Err(ConfigError::BadLipSpan { start, end });
            }
        }
        if self.tenting_stand {
            if self.tent_legs.is_empty() {
                return Err(ConfigError::NoTentLegs);
            }
            // Innermost knuckle pair must still land on the bolt.
            let legs = self.tent_legs.len();
            let needed = 2.0
                * ((self.tent_hinge_width + 0.2) * legs as f64 + self.tent_hinge_width);
            if needed > self.tent_hinge_bolt_l {
                return Err(ConfigError::TentHingeTooSmall {
                    legs,
                    needed,
                    bolt_l: self.tent_hinge_bolt_l,
                });
            }
        }
        Ok(())
    }

    fn check_magnet_fit(&self, wall_key: &'static str, wall: f64) -> Result<(), ConfigError> {
        let remaining = wall - self.magnet_separation_distance;
        if remaining < MAGNET_HEIGHT {
            return Err(ConfigError::MagnetMisfit {
                wall_key,
                wall,
                separation: self.magnet_separation_distance,
                remaining,
                height: MAGNET_HEIGHT,
            });
        }
        Ok(())
    }

    /// Apply one key. Returns false when the key names no parameter.
    fn apply(&mut self, key: &str, value: &Value) -> Result<bool, ConfigError> {
        match key {
            "output_dir" => self.output_dir = PathBuf::from(expect_str(key, value)?),
            "split" => self.split = expect_bool(key, value)?,
            "carrycase" => self.carrycase = expect_bool(key, value)?,
            "flush_carrycase_lip" => self.flush_carrycase_lip = expect_bool(key, value)?,
            "honeycomb_base" => self.honeycomb_base = expect_bool(key, value)?,
            "strap_loop" => self.strap_loop = expect_bool(key, value)?,
            "tenting_stand" => self.tenting_stand = expect_bool(key, value)?,
            "output_filetype" => self.output_filetype = expect_str(key, value)?.to_string(),
            "base_z_thickness" => self.base_z_thickness = expect_f64(key, value)?,
            "wall_xy_thickness" => self.wall_xy_thickness = expect_f64(key, value)?,
            "wall_z_height" => self.wall_z_height = expect_f64(key, value)?,
            "z_space_under_pcb" => self.z_space_under_pcb = expect_f64(key, value)?,
            "wall_xy_bottom_tolerance" => {
                self.wall_xy_bottom_tolerance = expect_f64(key, value)?
            }
            "wall_xy_top_tolerance" => self.wall_xy_top_tolerance = expect_f64(key, value)?,
            "cutout_position" => self.cutout_position = expect_f64(key, value)?,
            "cutout_width" => self.cutout_width = expect_f64(key, value)?,
            "additional_cutouts" => {
                self.additional_cutouts = expect_pair_list(key, value)?;
            }
            "chamfer_len" => self.chamfer_len = expect_f64(key, value)?,
            "honeycomb_radius" => self.honeycomb_radius = expect_f64(key, value)?,
            "honeycomb_thickness" => self.honeycomb_thickness = expect_f64(key, value)?,
            "strap_loop_thickness" => self.strap_loop_thickness = expect_f64(key, value)?,
            "strap_loop_end_offset" => self.strap_loop_end_offset = expect_f64(key, value)?,
            "strap_loop_gap" => self.strap_loop_gap = expect_f64(key, value)?,
            "carrycase_tolerance_xy" => self.carrycase_tolerance_xy = expect_f64(key, value)?,
            "carrycase_tolerance_z" => self.carrycase_tolerance_z = expect_f64(key, value)?,
            "carrycase_wall_xy_thickness" => {
                self.carrycase_wall_xy_thickness = expect_f64(key, value)?
            }
            "carrycase_z_gap_between_cases" => {
                self.carrycase_z_gap_between_cases = expect_f64(key, value)?
            }
            "carrycase_cutout_position" => {
                self.carrycase_cutout_position = expect_f64(key, value)?
            }
            "carrycase_cutout_xy_width" => {
                self.carrycase_cutout_xy_width = expect_f64(key, value)?
            }
            "lip_len" => self.lip_len = expect_f64(key, value)?,
            "lip_position_angles" => {
                let nums: Option<Vec<f64>> = value
                    .as_array()
                    .map(|a| a.iter().filter_map(Value::as_f64).collect());
                match nums.as_deref() {
                    Some([a, b]) => self.lip_position_angles = [*a, *b],
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            expected: "[start, end] bearing pair",
                            found: value.to_string(),
                        })
                    }
                }
            }
            "magnet_position" => self.magnet_position = expect_f64(key, value)?,
            "magnet_separation_distance" => {
                self.magnet_separation_distance = expect_f64(key, value)?
            }
            "magnet_spacing" => self.magnet_spacing = expect_f64(key, value)?,
            "magnet_count" => {
                self.magnet_count = value.as_u64().and_then(|v| u32::try_from(v).ok()).ok_or(
                    ConfigError::InvalidValue {
                        key: key.to_string(),
                        expected: "non-negative integer",
                        found: value.to_string(),
                    },
                )?
            }
            "tent_legs" => self.tent_legs = expect_leg_list(key, value)?,
            "tent_hinge_width" => self.tent_hinge_width = expect_f64(key, value)?,
            "tent_hinge_bolt_d" => self.tent_hinge_bolt_d = expect_f64(key, value)?,
            "tent_hinge_bolt_l" => self.tent_hinge_bolt_l = expect_f64(key, value)?,
            "tent_hinge_bolt_head_d" => self.tent_hinge_bolt_head_d = expect_f64(key, value)?,
            "tent_hinge_nut_l" => self.tent_hinge_nut_l = expect_f64(key, value)?,
            "tent_hinge_nut_d" => self.tent_hinge_nut_d = expect_f64(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn expect_f64(key: &str, value: &Value) -> Result<f64, ConfigError> {
    let v = value.as_f64().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "number",
        found: value.to_string(),
    })?;
    if !v.is_finite() {
        return Err(ConfigError::NonFinite {
            key: key.to_string(),
            value: v,
        });
    }
    Ok(v)
}

fn expect_bool(key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "boolean",
        found: value.to_string(),
    })
}

fn expect_str<'v>(key: &str, value: &'v Value) -> Result<&'v str, ConfigError> {
    value.as_str().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "string",
        found: value.to_string(),
    })
}

fn expect_pair_list(key: &str, value: &Value) -> Result<Vec<[f64; 2]>, ConfigError> {
    let bad = || ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "list of [number, number] pairs",
        found: value.to_string(),
    };
    let outer = value.as_array().ok_or_else(bad)?;
    // A bare [a, b] pair is accepted as a one-pair list.
    if outer.len() == 2 && outer.iter().all(Value::is_number) {
        return Ok(vec![[
            outer[0].as_f64().ok_or_else(bad)?,
            outer[1].as_f64().ok_or_else(bad)?,
        ]]);
    }
    outer
        .iter()
        .map(|entry| {
            let pair = entry.as_array().ok_or_else(bad)?;
            match pair.as_slice() {
                [a, b] => Ok([
                    a.as_f64().ok_or_else(bad)?,
                    b.as_f64().ok_or_else(bad)?,
                ]),
                _ => Err(bad()),
            }
        })
        .collect()
}

fn expect_leg_list(key: &str, value: &Value) -> Result<Vec<[f64; 3]>, ConfigError> {
    let bad = || ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "list of [width, length, tilt] triples",
        found: value.to_string(),
    };
    value
        .as_array()
        .ok_or_else(bad)?
        .iter()
        .map(|entry| {
            let leg = entry.as_array().ok_or_else(bad)?;
            // The tilt component is optional and defaults to flat.
            match leg.as_slice() {
                [w, l] => Ok([w.as_f64().ok_or_else(bad)?, l.as_f64().ok_or_else(bad)?, 0.0]),
                [w, l, t] => Ok([
                    w.as_f64().ok_or_else(bad)?,
                    l.as_f64().ok_or_else(bad)?,
                    t.as_f64().ok_or_else(bad)?,
                ]),
                _ => Err(bad()),
            }
        })
        .collect()
}
