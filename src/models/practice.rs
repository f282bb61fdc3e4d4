//! Practice problem model
//!
//! Free-entry numeric problems. Each problem stores its answer key and the
//! lab setup the key was derived from, so the key can be recomputed with the
//! calculators.

use serde::{Deserialize, Serialize};

use crate::calc::{
    convert_volume, dilution_from_ratio, seeding_volume, solve_dilution, DilutionProblem,
    DilutionSolution, VolumeUnit,
};
use crate::error::{CalcError, CalcResult};
use crate::grading::{AnswerEvaluator, AnswerKey, ExpectedValue, Submission, VerdictResult};

/// One numeric input of a practice problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeField {
    pub label: String,
    pub unit: VolumeUnit,
    pub expected: ExpectedValue,
}

/// The lab setup behind a practice problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PracticeSetup {
    /// Stock volume and diluent volume from C1V1 = C2V2
    Dilution { problem: DilutionProblem },
    /// Stock volume and diluent volume of a 1:factor dilution
    Ratio {
        factor: f64,
        final_volume: f64,
        volume_unit: VolumeUnit,
    },
    /// Volume of cell stock holding the desired number of cells
    Seeding {
        desired_cells: f64,
        stock_cells_per_ml: f64,
    },
}

/// Free-entry practice problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeProblem {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub fields: Vec<PracticeField>,
    pub setup: PracticeSetup,
    pub solution: Vec<String>,
}

/// Problem as shown to a learner, without the answer key
#[derive(Debug, Clone, Serialize)]
pub struct PracticeView {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub fields: Vec<PracticeFieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeFieldView {
    pub label: String,
    pub unit: VolumeUnit,
}

/// Verdict for a practice submission with the worked solution attached
#[derive(Debug, Clone, Serialize)]
pub struct PracticeFeedback {
    pub problem_id: String,
    pub verdict: VerdictResult,
    pub solution: Vec<String>,
}

impl PracticeProblem {
    pub fn answer_key(&self) -> AnswerKey {
        AnswerKey::Numeric {
            values: self.fields.iter().map(|f| f.expected).collect(),
        }
    }

    pub fn view(&self) -> PracticeView {
        PracticeView {
            id: self.id.clone(),
            title: self.title.clone(),
            prompt: self.prompt.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| PracticeFieldView {
                    label: f.label.clone(),
                    unit: f.unit,
                })
                .collect(),
        }
    }

    /// Grade submitted entries in field order
    pub fn check(
        &self,
        evaluator: &AnswerEvaluator,
        submitted: Vec<Option<f64>>,
    ) -> CalcResult<PracticeFeedback> {
        let verdict = evaluator.evaluate(&self.answer_key(), &Submission::Numeric { values: submitted })?;
        Ok(PracticeFeedback {
            problem_id: self.id.clone(),
            verdict,
            solution: self.solution.clone(),
        })
    }

    /// Recompute the answers from the setup, in the units of each field
    pub fn compute_answers(&self) -> CalcResult<Vec<f64>> {
        let raw = match &self.setup {
            PracticeSetup::Dilution { problem } => {
                let solution = solve_dilution(problem)?;
                stock_and_diluent(&solution, problem.volume_unit)?
            }
            PracticeSetup::Ratio {
                factor,
                final_volume,
                volume_unit,
            } => {
                let solution = dilution_from_ratio(*factor, *final_volume, *volume_unit)?;
                stock_and_diluent(&solution, *volume_unit)?
            }
            PracticeSetup::Seeding {
                desired_cells,
                stock_cells_per_ml,
            } => vec![(
                seeding_volume(*desired_cells, *stock_cells_per_ml)?,
                VolumeUnit::Milliliter,
            )],
        };

        if raw.len() != self.fields.len() {
            return Err(CalcError::ArityMismatch {
                expected: self.fields.len(),
                submitted: raw.len(),
            });
        }

        raw.into_iter()
            .zip(&self.fields)
            .map(|((value, unit), field)| convert_volume(value, unit, field.unit))
            .collect()
    }
}

fn stock_and_diluent(
    solution: &DilutionSolution,
    unit: VolumeUnit,
) -> CalcResult<Vec<(f64, VolumeUnit)>> {
    let diluent = solution.diluent_volume.ok_or_else(|| {
        CalcError::invalid(
            "practice setup",
            solution
                .derived_note
                .clone()
                .unwrap_or_else(|| "no diluent volume for this dilution".to_string()),
        )
    })?;
    Ok(vec![(solution.value, unit), (diluent, unit)])
}
