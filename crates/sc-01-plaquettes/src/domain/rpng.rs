//! RPNG plaquette descriptions
//!
//! Each data corner of a plaquette is described by four characters `rpng`:
//!
//! - `r`: data qubit reset basis (`x`, `y`, `z`), `h` for a Hadamard, `-` for nothing
//! - `p`: data basis of the ancilla-controlled operation (`x` is `CX`, `y` is
//!   `CY`, `z` is `CZ`), `-` for no interaction
//! - `n`: moment of that interaction, a positive digit
//! - `g`: data qubit measurement basis, `h` for a Hadamard, `-` for nothing
//!
//! Corners are listed top-left, top-right, bottom-left, bottom-right. Data
//! resets share the ancilla reset moment and data measurements share the
//! ancilla measurement moment.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{Basis, ExtendedBasis};

use super::errors::PlaquetteError;

/// Moment of every reset, ancilla included.
pub const RESET_MOMENT: usize = 0;
/// Moment of every measurement, ancilla included.
pub const MEASUREMENT_MOMENT: usize = 6;
/// Number of moments in the schedule of one plaquette layer.
pub const SCHEDULE_LENGTH: usize = MEASUREMENT_MOMENT + 1;

/// Description of one data corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rpng {
    pub reset: Option<ExtendedBasis>,
    pub controlled: Option<Basis>,
    pub step: Option<u8>,
    pub measurement: Option<ExtendedBasis>,
}

impl Rpng {
    pub const EMPTY: Rpng = Rpng {
        reset: None,
        controlled: None,
        step: None,
        measurement: None,
    };

    /// Corner interacting in `basis` at `step`, without reset or measurement.
    pub fn interaction(basis: Basis, step: u8) -> Self {
        Self {
            controlled: Some(basis),
            step: Some(step),
            ..Self::EMPTY
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::EMPTY
    }

    /// True if the corner takes part in the controlled operation.
    pub fn interacts(&self) -> bool {
        self.controlled.is_some()
    }
}

fn parse_extended(c: char, field: &str, value: &str) -> Result<Option<ExtendedBasis>, PlaquetteError> {
    if c == '-' {
        return Ok(None);
    }
    ExtendedBasis::from_char(c)
        .map(Some)
        .ok_or_else(|| PlaquetteError::InvalidRpng {
            value: value.to_string(),
            reason: format!("unacceptable character '{c}' for the {field} field"),
        })
}

impl FromStr for Rpng {
    type Err = PlaquetteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = value.chars().collect();
        let [r, p, n, g] = chars[..] else {
            return Err(PlaquetteError::InvalidRpng {
                value: value.to_string(),
                reason: "must be exactly 4 characters long".to_string(),
            });
        };
        let invalid = |reason: String| PlaquetteError::InvalidRpng {
            value: value.to_string(),
            reason,
        };

        let reset = parse_extended(r, "R", value)?;
        let controlled = match p {
            '-' => None,
            c => Some(
                Basis::from_char(c)
                    .ok_or_else(|| invalid(format!("unacceptable character '{c}' for the P field")))?,
            ),
        };
        let step = match n {
            '-' => None,
            c => {
                let digit = c
                    .to_digit(10)
                    .ok_or_else(|| invalid(format!("unacceptable character '{c}' for the N field")))?;
                Some(digit as u8)
            }
        };
        let measurement = parse_extended(g, "G", value)?;

        if controlled.is_some() != step.is_some() {
            return Err(invalid(
                "the P and N fields must both be set or both be empty".to_string(),
            ));
        }
        Ok(Self {
            reset,
            controlled,
            step,
            measurement,
        })
    }
}

impl fmt::Display for Rpng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reset.map_or('-', |b| b.as_char());
        let p = self.controlled.map_or('-', |b| b.as_char());
        let n = self
            .step
            .and_then(|s| char::from_digit(u32::from(s), 10))
            .unwrap_or('-');
        let g = self.measurement.map_or('-', |b| b.as_char());
        write!(f, "{r}{p}{n}{g}")
    }
}

/// Reset and measurement bases of the syndrome qubit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AncillaBases {
    pub reset: Basis,
    pub measurement: Basis,
}

impl Default for AncillaBases {
    fn default() -> Self {
        Self {
            reset: Basis::X,
            measurement: Basis::X,
        }
    }
}

impl FromStr for AncillaBases {
    type Err = PlaquetteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = value.chars().collect();
        let parsed = match chars[..] {
            [r, g] => Basis::from_char(r).zip(Basis::from_char(g)),
            _ => None,
        };
        let (reset, measurement) = parsed.ok_or_else(|| PlaquetteError::InvalidRpng {
            value: value.to_string(),
            reason: "invalid ancilla bases".to_string(),
        })?;
        Ok(Self { reset, measurement })
    }
}

/// Full description of one plaquette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RpngDescription {
    corners: [Rpng; 4],
    ancilla: AncillaBases,
}

impl RpngDescription {
    /// Validated description: interaction moments are unique, positive and
    /// strictly before the measurement moment.
    pub fn new(corners: [Rpng; 4], ancilla: AncillaBases) -> Result<Self, PlaquetteError> {
        let mut seen = BTreeSet::new();
        for step in corners.iter().filter_map(|c| c.step) {
            if step == 0 || usize::from(step) >= MEASUREMENT_MOMENT {
                return Err(PlaquetteError::InvalidDescription {
                    description: format_corners(&corners),
                    reason: format!(
                        "interaction moment {step} must be in 1..{MEASUREMENT_MOMENT}"
                    ),
                });
            }
            if !seen.insert(step) {
                return Err(PlaquetteError::DuplicateTimestep { step });
            }
        }
        Ok(Self { corners, ancilla })
    }

    /// Unvalidated construction for descriptions built from fixed schedules.
    pub(crate) const fn from_valid_parts(corners: [Rpng; 4], ancilla: AncillaBases) -> Self {
        Self { corners, ancilla }
    }

    pub fn from_corners(corners: [Rpng; 4]) -> Result<Self, PlaquetteError> {
        Self::new(corners, AncillaBases::default())
    }

    /// Description with no operation at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn corners(&self) -> &[Rpng; 4] {
        &self.corners
    }

    pub fn ancilla(&self) -> AncillaBases {
        self.ancilla
    }

    pub fn is_empty(&self) -> bool {
        self.corners.iter().all(Rpng::is_null)
    }

    pub fn has_reset(&self) -> bool {
        self.corners
            .iter()
            .any(|c| matches!(c.reset, Some(ExtendedBasis::Basis(_))))
    }

    pub fn has_measurement(&self) -> bool {
        self.corners
            .iter()
            .any(|c| matches!(c.measurement, Some(ExtendedBasis::Basis(_))))
    }

    /// Basis of the stabilizer measured by the syndrome qubit, if any.
    ///
    /// Only defined when the ancilla is prepared and measured in X and every
    /// interacting corner uses the same controlled basis.
    pub fn stabilizer_basis(&self) -> Option<Basis> {
        if self.ancilla != AncillaBases::default() {
            return None;
        }
        let mut bases = self.corners.iter().filter_map(|c| c.controlled);
        let first = bases.next()?;
        bases.all(|b| b == first).then_some(first)
    }
}

fn format_corners(corners: &[Rpng; 4]) -> String {
    corners
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl FromStr for RpngDescription {
    type Err = PlaquetteError;

    /// Accepts `"rpng rpng rpng rpng"` or, with explicit ancilla bases,
    /// `"rg rpng rpng rpng rpng"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let (ancilla, corner_tokens) = match tokens.len() {
            4 => (AncillaBases::default(), &tokens[..]),
            5 => (tokens[0].parse()?, &tokens[1..]),
            _ => {
                return Err(PlaquetteError::InvalidDescription {
                    description: value.to_string(),
                    reason: "there must be 4 corners in the description".to_string(),
                })
            }
        };
        let mut corners = [Rpng::EMPTY; 4];
        for (corner, token) in corners.iter_mut().zip(corner_tokens) {
            *corner = token.parse()?;
        }
        Self::new(corners, ancilla)
    }
}

impl fmt::Display for RpngDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_corners(&self.corners))
    }
}
