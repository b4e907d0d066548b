//! CSS memory plaquettes
//!
//! Plaquette collections for one round of stabilizer measurements on a cube
//! and on the two kinds of spatial pipe. `x_basis` is the basis of the
//! stabilizers whose boundaries lie along the X axis of the layout and
//! `y_basis` the basis of those along the Y axis.
//!
//! Plaquettes measuring `x_basis` stabilizers interact in an "N" order
//! (top-left, bottom-left, top-right, bottom-right) and those measuring
//! `y_basis` stabilizers in a "Z" order (top-left, top-right, bottom-left,
//! bottom-right).
//!
//! Optional data resets and measurements are only added on the corners a
//! plaquette actually interacts with.

use shared_types::{Basis, ExtendedBasis};

use crate::domain::plaquettes::Plaquettes;
use crate::domain::rpng::{AncillaBases, Rpng, RpngDescription};

const VERTICAL_HOOK_STEPS: [u8; 4] = [1, 3, 2, 4];
const HORIZONTAL_HOOK_STEPS: [u8; 4] = [1, 2, 3, 4];

const ALL: [bool; 4] = [true, true, true, true];
const TOP: [bool; 4] = [true, true, false, false];
const BOTTOM: [bool; 4] = [false, false, true, true];
const LEFT: [bool; 4] = [true, false, true, false];
const RIGHT: [bool; 4] = [false, true, false, true];

/// Which family of stabilizer a plaquette measures.
#[derive(Clone, Copy)]
enum Family {
    X,
    Y,
}

struct MemoryRound {
    x_basis: Basis,
    y_basis: Basis,
    reset: Option<Basis>,
    measurement: Option<Basis>,
}

impl MemoryRound {
    fn plaquette(&self, family: Family, used: [bool; 4]) -> RpngDescription {
        let (basis, steps) = match family {
            Family::X => (self.x_basis, VERTICAL_HOOK_STEPS),
            Family::Y => (self.y_basis, HORIZONTAL_HOOK_STEPS),
        };
        let mut corners = [Rpng::EMPTY; 4];
        for (i, corner) in corners.iter_mut().enumerate() {
            if !used[i] {
                continue;
            }
            *corner = Rpng {
                reset: self.reset.map(ExtendedBasis::from),
                measurement: self.measurement.map(ExtendedBasis::from),
                ..Rpng::interaction(basis, steps[i])
            };
        }
        RpngDescription::from_valid_parts(corners, AncillaBases::default())
    }

    fn collect(&self, layout: &[(usize, Family, [bool; 4])]) -> Plaquettes {
        layout
            .iter()
            .map(|(index, family, used)| (*index, self.plaquette(*family, *used)))
            .collect()
    }
}

/// Plaquettes for the `Qubit` template.
pub fn memory_qubit_plaquettes(
    x_basis: Basis,
    y_basis: Basis,
    reset: Option<Basis>,
    measurement: Option<Basis>,
) -> Plaquettes {
    let round = MemoryRound {
        x_basis,
        y_basis,
        reset,
        measurement,
    };
    round.collect(&[
        (5, Family::Y, BOTTOM),
        (8, Family::X, RIGHT),
        (9, Family::X, ALL),
        (10, Family::Y, ALL),
        (11, Family::X, LEFT),
        (14, Family::Y, TOP),
    ])
}

/// Plaquettes for the `VerticalBorders` template of a pipe along X.
pub fn x_pipe_plaquettes(
    x_basis: Basis,
    y_basis: Basis,
    reset: Option<Basis>,
    measurement: Option<Basis>,
) -> Plaquettes {
    let round = MemoryRound {
        x_basis,
        y_basis,
        reset,
        measurement,
    };
    round.collect(&[
        (1, Family::Y, BOTTOM),
        (3, Family::X, ALL),
        (4, Family::Y, ALL),
        (5, Family::Y, ALL),
        (6, Family::X, ALL),
        (8, Family::Y, TOP),
    ])
}

/// Plaquettes for the `HorizontalBorders` template of a pipe along Y.
pub fn y_pipe_plaquettes(
    x_basis: Basis,
    y_basis: Basis,
    reset: Option<Basis>,
    measurement: Option<Basis>,
) -> Plaquettes {
    let round = MemoryRound {
        x_basis,
        y_basis,
        reset,
        measurement,
    };
    round.collect(&[
        (2, Family::X, LEFT),
        (3, Family::X, ALL),
        (4, Family::Y, ALL),
        (5, Family::X, RIGHT),
        (7, Family::Y, ALL),
        (8, Family::X, ALL),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::generation::generate_circuit;
    use crate::domain::template::{Template, TemplateBorder};
    use shared_types::Position2D;

    #[test]
    fn test_qubit_plaquettes_bases() {
        let plaquettes = memory_qubit_plaquettes(Basis::X, Basis::Z, None, None);
        assert_eq!(plaquettes.len(), 6);
        assert_eq!(plaquettes.get(9).unwrap().stabilizer_basis(), Some(Basis::X));
        assert_eq!(plaquettes.get(10).unwrap().stabilizer_basis(), Some(Basis::Z));
        assert!(plaquettes.get(1).is_none());
        assert_eq!(plaquettes.get(9).unwrap().to_string(), "-x1- -x3- -x2- -x4-");
        assert_eq!(plaquettes.get(10).unwrap().to_string(), "-z1- -z2- -z3- -z4-");
        assert_eq!(plaquettes.get(5).unwrap().to_string(), "---- ---- -z3- -z4-");
    }

    #[test]
    fn test_reset_only_on_used_corners() {
        let plaquettes = memory_qubit_plaquettes(Basis::Z, Basis::X, Some(Basis::Z), None);
        let half = plaquettes.get(14).unwrap();
        assert_eq!(half.to_string(), "zx1- zx2- ---- ----");
        assert!(half.has_reset());
        assert!(!half.has_measurement());
    }

    #[test]
    fn test_every_template_index_is_known() {
        for (template, plaquettes) in [
            (
                Template::Qubit,
                memory_qubit_plaquettes(Basis::Z, Basis::X, None, None),
            ),
            (
                Template::VerticalBorders,
                x_pipe_plaquettes(Basis::Z, Basis::X, None, None),
            ),
            (
                Template::HorizontalBorders,
                y_pipe_plaquettes(Basis::Z, Basis::X, None, None),
            ),
        ] {
            let max = template.expected_plaquettes_number();
            assert!(plaquettes.collection().keys().all(|i| (1..=max).contains(i)));
        }
    }

    #[test]
    fn test_pipe_border_matches_cube_interior() {
        // Splicing a pipe border into a cube border yields the bulk pattern.
        let pipe = x_pipe_plaquettes(Basis::Z, Basis::X, None, None);
        let cube = memory_qubit_plaquettes(Basis::Z, Basis::X, None, None);
        let mapping = Template::VerticalBorders
            .border_indices(TemplateBorder::Left)
            .unwrap()
            .to(&Template::Qubit.border_indices(TemplateBorder::Right).unwrap());
        // Pipe index 3 lands on cube index 11 (odd rows), where the bulk has 9.
        assert_eq!(mapping[&3], 11);
        assert_eq!(pipe.get(3), cube.get(9));
        assert_eq!(pipe.get(5), cube.get(10));
    }

    #[test]
    fn test_x_pipe_circuit_has_no_conflict() {
        let pipe = x_pipe_plaquettes(Basis::Z, Basis::X, None, None);
        let circuit =
            generate_circuit(Template::VerticalBorders, 2, &pipe, Position2D::new(5, 0)).unwrap();
        assert!(!circuit.is_empty());
    }

    #[test]
    fn test_y_pipe_circuit_has_no_conflict() {
        let pipe = y_pipe_plaquettes(Basis::Z, Basis::X, Some(Basis::Z), Some(Basis::Z));
        let circuit =
            generate_circuit(Template::HorizontalBorders, 1, &pipe, Position2D::new(0, 3)).unwrap();
        assert!(!circuit.is_empty());
    }
}
