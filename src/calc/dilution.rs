//! C1·V1 = C2·V2 dilution solver
//!
//! The amount of solute is conserved across a dilution, so the product of
//! concentration and volume is the same for the stock (C1, V1) and the final
//! solution (C2, V2). Given any three of the four values the fourth follows.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::units::{ConcentrationUnit, VolumeUnit};
use crate::error::{
    require_finite_result, require_non_negative, require_positive, CalcError, CalcResult,
};

/// One of the four slots of the dilution law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DilutionField {
    C1,
    V1,
    C2,
    V2,
}

impl DilutionField {
    pub const ALL: [DilutionField; 4] = [
        DilutionField::C1,
        DilutionField::V1,
        DilutionField::C2,
        DilutionField::V2,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            DilutionField::C1 => "Stock Concentration (C1)",
            DilutionField::V1 => "Stock Volume (V1)",
            DilutionField::C2 => "Final Concentration (C2)",
            DilutionField::V2 => "Final Volume (V2)",
        }
    }

    /// The other factor on the same side of the law
    pub fn partner(&self) -> DilutionField {
        match self {
            DilutionField::C1 => DilutionField::V1,
            DilutionField::V1 => DilutionField::C1,
            DilutionField::C2 => DilutionField::V2,
            DilutionField::V2 => DilutionField::C2,
        }
    }

    /// The two factors on the opposite side of the law
    pub fn opposite(&self) -> (DilutionField, DilutionField) {
        match self {
            DilutionField::C1 | DilutionField::V1 => (DilutionField::C2, DilutionField::V2),
            DilutionField::C2 | DilutionField::V2 => (DilutionField::C1, DilutionField::V1),
        }
    }

    pub fn is_volume(&self) -> bool {
        matches!(self, DilutionField::V1 | DilutionField::V2)
    }
}

impl fmt::Display for DilutionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A dilution request with exactly one slot left blank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionProblem {
    pub c1: Option<f64>,
    pub v1: Option<f64>,
    pub c2: Option<f64>,
    pub v2: Option<f64>,
    pub concentration_unit: ConcentrationUnit,
    pub volume_unit: VolumeUnit,
}

impl Default for DilutionProblem {
    fn default() -> Self {
        Self {
            c1: None,
            v1: None,
            c2: None,
            v2: None,
            concentration_unit: ConcentrationUnit::Molar,
            volume_unit: VolumeUnit::Milliliter,
        }
    }
}

impl DilutionProblem {
    pub fn new(concentration_unit: ConcentrationUnit, volume_unit: VolumeUnit) -> Self {
        Self {
            concentration_unit,
            volume_unit,
            ..Default::default()
        }
    }

    pub fn with(mut self, field: DilutionField, value: f64) -> Self {
        *self.slot_mut(field) = Some(value);
        self
    }

    pub fn get(&self, field: DilutionField) -> Option<f64> {
        match field {
            DilutionField::C1 => self.c1,
            DilutionField::V1 => self.v1,
            DilutionField::C2 => self.c2,
            DilutionField::V2 => self.v2,
        }
    }

    fn slot_mut(&mut self, field: DilutionField) -> &mut Option<f64> {
        match field {
            DilutionField::C1 => &mut self.c1,
            DilutionField::V1 => &mut self.v1,
            DilutionField::C2 => &mut self.c2,
            DilutionField::V2 => &mut self.v2,
        }
    }

    /// Fields left blank
    pub fn missing(&self) -> Vec<DilutionField> {
        DilutionField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    fn unit_for(&self, field: DilutionField) -> &'static str {
        if field.is_volume() {
            self.volume_unit.symbol()
        } else {
            self.concentration_unit.symbol()
        }
    }
}

/// Result of solving a dilution problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DilutionSolution {
    pub solved_field: DilutionField,
    pub value: f64,
    pub unit: &'static str,
    /// Diluent to add to the stock (V2 - V1), when that is physically meaningful
    pub diluent_volume: Option<f64>,
    /// Explanation or warning for the caller to display
    pub derived_note: Option<String>,
}

impl DilutionSolution {
    /// True when the note is a warning about a physically invalid setup
    pub fn is_implausible(&self) -> bool {
        self.derived_note
            .as_deref()
            .is_some_and(|n| n.starts_with("Warning"))
    }
}

/// Solve C1·V1 = C2·V2 for the single missing field
pub fn solve_dilution(problem: &DilutionProblem) -> CalcResult<DilutionSolution> {
    let missing = problem.missing();
    if missing.len() != 1 {
        return Err(CalcError::AmbiguousInput {
            provided: 4 - missing.len(),
        });
    }
    let unknown = missing[0];

    let divisor_field = unknown.partner();
    let (a, b) = unknown.opposite();

    let value_of = |field: DilutionField| -> CalcResult<f64> {
        let raw = problem.get(field).ok_or_else(|| {
            CalcError::invalid(field.display_name(), "value is required")
        })?;
        require_non_negative(field.display_name(), raw)
    };

    let divisor = value_of(divisor_field)?;
    let product = value_of(a)? * value_of(b)?;

    if divisor == 0.0 {
        return Err(CalcError::DivisionByZero {
            field: divisor_field.display_name().to_string(),
        });
    }

    let value = require_finite_result(unknown.display_name(), product / divisor)?;
    tracing::debug!("Solved {} = {} from {} x {} / {}", unknown, value, a, b, divisor_field);

    let complete = problem.clone().with(unknown, value);
    let (v1, v2) = (complete.v1.unwrap_or(value), complete.v2.unwrap_or(value));
    let vol = problem.unit_for(DilutionField::V1);

    let (diluent_volume, derived_note) = if v1 > v2 {
        tracing::warn!(
            "Implausible dilution: stock volume {} exceeds final volume {}",
            v1,
            v2
        );
        (
            None,
            Some(format!(
                "Warning: stock volume ({:.3} {vol}) exceeds final volume ({:.3} {vol}); \
                 the stock is more dilute than the target concentration.",
                v1, v2
            )),
        )
    } else if unknown == DilutionField::V1 {
        let diluent = v2 - v1;
        (
            Some(diluent),
            Some(format!(
                "You need {:.3} {vol} of stock and {:.3} {vol} of diluent.",
                v1, diluent
            )),
        )
    } else {
        (None, None)
    };

    Ok(DilutionSolution {
        solved_field: unknown,
        value,
        unit: problem.unit_for(unknown),
        diluent_volume,
        derived_note,
    })
}

/// Prepare `final_volume` of a 1:`factor` dilution
///
/// Equivalent to solving with C1 = `factor` X and C2 = 1 X.
pub fn dilution_from_ratio(
    factor: f64,
    final_volume: f64,
    volume_unit: VolumeUnit,
) -> CalcResult<DilutionSolution> {
    let factor = require_positive("dilution factor", factor)?;
    let problem = DilutionProblem::new(ConcentrationUnit::Fold, volume_unit)
        .with(DilutionField::C1, factor)
        .with(DilutionField::C2, 1.0)
        .with(DilutionField::V2, final_volume);
    solve_dilution(&problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn problem() -> DilutionProblem {
        DilutionProblem::new(ConcentrationUnit::Molar, VolumeUnit::Milliliter)
    }

    #[test]
    fn test_worked_example_naoh() {
        // 10 M stock, want 500 mL of 0.5 M
        let p = problem()
            .with(DilutionField::C1, 10.0)
            .with(DilutionField::C2, 0.5)
            .with(DilutionField::V2, 500.0);
        let s = solve_dilution(&p).unwrap();
        assert_eq!(s.solved_field, DilutionField::V1);
        assert!(approx(s.value, 25.0));
        assert!(approx(s.diluent_volume.unwrap(), 475.0));
        assert_eq!(s.unit, "mL");
        assert!(!s.is_implausible());
        assert_eq!(
            s.derived_note.as_deref(),
            Some("You need 25.000 mL of stock and 475.000 mL of diluent.")
        );
    }

    #[test]
    fn test_solve_each_branch_conserves_solute() {
        let full = [(DilutionField::C1, 10.0), (DilutionField::V1, 0.1), (DilutionField::C2, 0.1), (DilutionField::V2, 10.0)];
        for blank in DilutionField::ALL {
            let mut p = problem();
            for (field, value) in full {
                if field != blank {
                    p = p.with(field, value);
                }
            }
            let s = solve_dilution(&p).unwrap();
            assert_eq!(s.solved_field, blank);
            let c = p.clone().with(blank, s.value);
            let lhs = c.c1.unwrap() * c.v1.unwrap();
            let rhs = c.c2.unwrap() * c.v2.unwrap();
            assert!(approx(lhs, rhs), "{:?}: {} != {}", blank, lhs, rhs);
        }
    }

    #[test]
    fn test_rederivation_is_symmetric() {
        let p = problem()
            .with(DilutionField::C1, 7.3)
            .with(DilutionField::C2, 0.42)
            .with(DilutionField::V2, 250.0);
        let v1 = solve_dilution(&p).unwrap().value;

        let again = DilutionProblem {
            c2: None,
            ..p.with(DilutionField::V1, v1)
        };
        let c2 = solve_dilution(&again).unwrap();
        assert_eq!(c2.solved_field, DilutionField::C2);
        assert!(approx(c2.value, 0.42));
    }

    #[test]
    fn test_zero_stock_concentration_rejected() {
        let p = problem()
            .with(DilutionField::C1, 0.0)
            .with(DilutionField::C2, 5.0)
            .with(DilutionField::V2, 10.0);
        let err = solve_dilution(&p).unwrap_err();
        assert_eq!(
            err,
            CalcError::DivisionByZero { field: "Stock Concentration (C1)".to_string() }
        );
    }

    #[test]
    fn test_each_divisor_checked() {
        let cases = [
            (DilutionField::V1, DilutionField::C1),
            (DilutionField::C2, DilutionField::V2),
            (DilutionField::C1, DilutionField::V1),
            (DilutionField::V2, DilutionField::C2),
        ];
        for (blank, divisor) in cases {
            let mut p = problem();
            for field in DilutionField::ALL {
                if field != blank {
                    p = p.with(field, if field == divisor { 0.0 } else { 2.0 });
                }
            }
            match solve_dilution(&p) {
                Err(CalcError::DivisionByZero { field }) => {
                    assert_eq!(field, divisor.display_name())
                }
                other => panic!("expected division by zero for {:?}, got {:?}", blank, other),
            }
        }
    }

    #[test]
    fn test_two_unknowns_rejected() {
        let p = problem().with(DilutionField::C1, 10.0).with(DilutionField::V1, 5.0);
        assert_eq!(
            solve_dilution(&p).unwrap_err(),
            CalcError::AmbiguousInput { provided: 2 }
        );
    }

    #[test]
    fn test_no_unknowns_rejected() {
        let p = problem()
            .with(DilutionField::C1, 1.0)
            .with(DilutionField::V1, 1.0)
            .with(DilutionField::C2, 1.0)
            .with(DilutionField::V2, 1.0);
        assert_eq!(
            solve_dilution(&p).unwrap_err(),
            CalcError::AmbiguousInput { provided: 4 }
        );
    }

    #[test]
    fn test_non_finite_and_negative_rejected() {
        let p = problem()
            .with(DilutionField::C1, f64::INFINITY)
            .with(DilutionField::C2, 1.0)
            .with(DilutionField::V2, 1.0);
        assert!(matches!(solve_dilution(&p), Err(CalcError::InvalidInput { .. })));

        let p = problem()
            .with(DilutionField::C1, 10.0)
            .with(DilutionField::C2, -1.0)
            .with(DilutionField::V2, 1.0);
        assert!(matches!(solve_dilution(&p), Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_stock_weaker_than_target_flagged() {
        // 0.1 M stock cannot make 1 M; V1 = 1 x 10 / 0.1 = 100 > 10
        let p = problem()
            .with(DilutionField::C1, 0.1)
            .with(DilutionField::C2, 1.0)
            .with(DilutionField::V2, 10.0);
        let s = solve_dilution(&p).unwrap();
        assert!(approx(s.value, 100.0));
        assert!(s.diluent_volume.is_none());
        assert!(s.is_implausible());
    }

    #[test]
    fn test_solved_c2_has_concentration_unit() {
        let p = DilutionProblem::new(ConcentrationUnit::Percent, VolumeUnit::Milliliter)
            .with(DilutionField::C1, 10.0)
            .with(DilutionField::V1, 0.1)
            .with(DilutionField::V2, 10.0);
        let s = solve_dilution(&p).unwrap();
        assert_eq!(s.unit, "%");
        assert!(approx(s.value, 0.1));
        assert!(s.derived_note.is_none());
    }

    #[test]
    fn test_dilution_from_ratio_antibody() {
        // 1:1000 for 6 wells of 200 µL
        let s = dilution_from_ratio(1000.0, 1200.0, VolumeUnit::Microliter).unwrap();
        assert!(approx(s.value, 1.2));
        assert!(approx(s.diluent_volume.unwrap(), 1198.8));
        assert!(dilution_from_ratio(0.0, 10.0, VolumeUnit::Milliliter).is_err());
    }

    #[test]
    fn test_overflowing_product_rejected() {
        let p = problem()
            .with(DilutionField::C1, 1e300)
            .with(DilutionField::C2, 1e300)
            .with(DilutionField::V2, 1e300);
        let err = solve_dilution(&p).unwrap_err();
        assert_eq!(err, CalcError::invalid("Stock Volume (V1)", "result is too large to represent"));
    }

    #[test]
    fn test_tiny_divisor_rejected() {
        let p = problem()
            .with(DilutionField::C1, 1e-320)
            .with(DilutionField::C2, 5.0)
            .with(DilutionField::V2, 10.0);
        assert!(matches!(solve_dilution(&p), Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_equal_volumes_need_no_diluent() {
        // C1 == C2: the whole final volume is stock
        let p = problem()
            .with(DilutionField::C1, 0.5)
            .with(DilutionField::C2, 0.5)
            .with(DilutionField::V2, 100.0);
        let s = solve_dilution(&p).unwrap();
        assert!(approx(s.value, 100.0));
        assert_eq!(s.diluent_volume, Some(0.0));
        assert!(!s.is_implausible());
    }
}
