//! Colour parsing, averaging and branch-colour interpolation.

use crate::types::TreeNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("invalid colour string: {0}")]
    Invalid(String),
    #[error("cannot average an empty list of colours")]
    Empty,
}

/// An RGB colour with unrounded channels. Displays as `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Neutral grey that branches fade towards
    pub const BRANCH_GREY: Self = Self::new(187.0, 187.0, 187.0);

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }
}

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", channel(self.r), channel(self.g), channel(self.b))
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ColorError::Invalid(s.to_string());
        if let Some(hex) = s.strip_prefix('#') {
            let digits: Vec<u32> = hex
                .chars()
                .map(|c| c.to_digit(16))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Rgb::new((r * 17) as f64, (g * 17) as f64, (b * 17) as f64)),
                [r1, r2, g1, g2, b1, b2] => Ok(Rgb::new(
                    (r1 * 16 + r2) as f64,
                    (g1 * 16 + g2) as f64,
                    (b1 * 16 + b2) as f64,
                )),
                _ => Err(invalid()),
            };
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            let parts: Vec<f64> = body
                .split(',')
                .map(|p| p.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid())?;
            if let [r, g, b] = parts.as_slice() {
                return Ok(Rgb::new(*r, *g, *b));
            }
        }
        Err(invalid())
    }
}

/// Per-channel mean of the given colours
pub fn average_colors(colors: &[&str]) -> Result<Rgb, ColorError> {
    if colors.is_empty() {
        return Err(ColorError::Empty);
    }
    let parsed = colors.iter().map(|c| c.parse::<Rgb>()).collect::<Result<Vec<_>, _>>()?;
    let n = parsed.len() as f64;
    let sum = parsed.iter().fold((0.0, 0.0, 0.0), |acc, c| (acc.0 + c.r, acc.1 + c.g, acc.2 + c.b));
    Ok(Rgb::new(sum.0 / n, sum.1 / n, sum.2 / n))
}

/// Linear interpolation in RGB space, rounded to whole channels
pub fn interpolate_rgb(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let lerp = |a: f64, b: f64| f64::from(channel(a + t * (b - a)));
    Rgb::new(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
}

const BRANCH_OPACITY_CONSTANT: f64 = 0.6;
const BRANCH_OPACITY_LOWER_BOUND: f64 = 0.4;
const BRANCH_OPACITY_EXPONENT: f64 = 0.3;

/// Power scale (exponent 0.3) from entropy in [0, 1] to [0.4, 1], clamped
pub fn branch_opacity(entropy: f64) -> f64 {
    let t = entropy.clamp(0.0, 1.0).powf(BRANCH_OPACITY_EXPONENT);
    BRANCH_OPACITY_LOWER_BOUND + t * (1.0 - BRANCH_OPACITY_LOWER_BOUND)
}

/// Branch stroke colours faded towards grey. With per-node entropies the fade
/// follows [`branch_opacity`]; missing entropies count as zero.
pub fn branch_stroke_colors(node_colors: &[Rgb], entropies: Option<&[Option<f64>]>) -> Vec<Rgb> {
    match entropies {
        Some(entropies) => node_colors
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let entropy = entropies.get(idx).copied().flatten().unwrap_or(0.0);
                interpolate_rgb(*col, Rgb::BRANCH_GREY, branch_opacity(entropy))
            })
            .collect(),
        None => node_colors
            .iter()
            .map(|col| interpolate_rgb(*col, Rgb::BRANCH_GREY, BRANCH_OPACITY_CONSTANT))
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeType {
    Nucleotide,
    AminoAcid,
}

/// `gt-nuc…` colourings are nucleotide genotypes, any other `gt…` is amino acid
pub fn genotype_type(color_by: &str) -> Option<GenotypeType> {
    if !color_by.starts_with("gt") {
        return None;
    }
    if color_by.get(3..6) == Some("nuc") {
        Some(GenotypeType::Nucleotide)
    } else {
        Some(GenotypeType::AminoAcid)
    }
}

/// Distinct `color_by` values found in the tree(s) but missing from the colour map.
/// Nodes lacking the attribute contribute `null`.
pub fn extra_values(
    nodes: &[&TreeNode],
    other_nodes: Option<&[&TreeNode]>,
    color_by: &str,
    color_map: &[(Value, String)],
) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    let all = nodes.iter().chain(other_nodes.unwrap_or(&[]).iter());
    for node in all {
        let value = node.attr.get(color_by).cloned().unwrap_or(Value::Null);
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.into_iter()
        .filter(|v| !color_map.iter().any(|(known, _)| known == v))
        .collect()
}
