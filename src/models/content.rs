//! Bundled course content
//!
//! Quizzes, scenario quizzes and practice problems for the three course
//! modules.

use crate::calc::{ConcentrationUnit, DilutionField, DilutionProblem, VolumeUnit};
use crate::grading::ExpectedValue;

use super::course::{CourseModule, ScenarioQuiz};
use super::practice::{PracticeField, PracticeProblem, PracticeSetup};
use super::question::QuizQuestion;

pub fn course_modules() -> Vec<CourseModule> {
    vec![fundamentals(), dilutions(), transfection()]
}

// ============================================================================
// Module 1: Cell & Molecular Biology Fundamentals
// ============================================================================

fn fundamentals() -> CourseModule {
    CourseModule {
        id: "module1".into(),
        title: "Module 1: Cell & Molecular Biology Fundamentals".into(),
        quiz: vec![
            QuizQuestion::mcq(
                "Which of these is NOT a typical component of a plasmid used in molecular cloning for expression in eukaryotic cells?",
                &[
                    "Origin of Replication (ori)",
                    "Eukaryotic Promoter (e.g., CMV)",
                    "Selectable Marker (e.g., antibiotic resistance)",
                    "Ribosome (the organelle)",
                ],
                "Ribosome (the organelle)",
            )
            .explained("Plasmids contain DNA sequences like promoters and origins of replication. Ribosomes are cellular machinery for protein synthesis and are not part of the plasmid DNA itself."),
            QuizQuestion::mcq(
                "What is the primary purpose of heat-inactivating serum (e.g., FBS/FCS) for cell culture?",
                &[
                    "To sterilize the serum by killing all microbes",
                    "To inactivate complement proteins that could harm cells",
                    "To enhance the activity of growth factors in the serum",
                    "To remove any residual antibiotics from the serum",
                ],
                "To inactivate complement proteins that could harm cells",
            )
            .explained("Heat inactivation (typically 56°C for 30 minutes) denatures complement proteins, which can otherwise cause cell lysis or activate immune responses in culture."),
            QuizQuestion::mcq(
                "A cell culture medium containing Phenol Red as a pH indicator appears bright yellow. This most likely indicates the medium is:",
                &[
                    "Too alkaline (pH too high)",
                    "Too acidic (pH too low)",
                    "Perfectly neutral (pH 7.4)",
                    "Contaminated with mold",
                ],
                "Too acidic (pH too low)",
            )
            .explained("Phenol Red turns yellow at acidic pH (below ~6.8), often due to excessive cell metabolism producing lactic acid or bacterial contamination producing acidic byproducts."),
            QuizQuestion::mcq(
                "Mycoplasma contamination is notoriously difficult to detect in cell cultures because:",
                &[
                    "They are very large and thus easily filtered out during media preparation.",
                    "They cause rapid, visible cloudiness (turbidity) in the culture medium within hours.",
                    "They are extremely small, lack a cell wall, can pass through standard 0.22 µm sterilization filters, and often do not cause obvious visual changes like turbidity.",
                    "They only grow optimally at room temperature, not in a 37°C incubator.",
                ],
                "They are extremely small, lack a cell wall, can pass through standard 0.22 µm sterilization filters, and often do not cause obvious visual changes like turbidity.",
            )
            .explained("Mycoplasma are among the smallest self-replicating organisms and their lack of a cell wall makes them resistant to some antibiotics and flexible enough to pass through filters. They often cause subtle changes in cell behavior rather than obvious turbidity."),
        ],
        scenarios: vec![ScenarioQuiz {
            id: "contamination-detective".into(),
            title: "Contamination Detective".into(),
            questions: vec![
                QuizQuestion::mcq(
                    "Your cell culture medium has suddenly become cloudy, and under the microscope, you see tiny, fast-moving rod-shaped or spherical particles between your cells. The medium has also turned yellow quickly.",
                    &["Mycoplasma", "Yeast", "Bacteria", "Viral"],
                    "Bacteria",
                ),
                QuizQuestion::mcq(
                    "You notice a 'milky way-like fog' or tiny specks around the nuclei of your cells when stained with DAPI. Cell growth has slowed, and the medium turns yellow faster than usual, but there's no visible cloudiness.",
                    &["Fungal (mold)", "Mycoplasma", "Cross-contamination with other cells", "Bacteria"],
                    "Mycoplasma",
                ),
                QuizQuestion::mcq(
                    "You see fuzzy, filamentous structures growing in your flask, some of which might be floating on the surface of the medium. Some areas might have a cottony appearance.",
                    &["Yeast", "Bacteria", "Fungal (mold)", "Mycoplasma"],
                    "Fungal (mold)",
                ),
            ],
        }],
        practice: vec![],
    }
}

// ============================================================================
// Module 2: Dilutions, Concentrations & Cell Counting
// ============================================================================

fn field(label: &str, unit: VolumeUnit, expected: f64) -> PracticeField {
    PracticeField {
        label: label.to_string(),
        unit,
        expected: ExpectedValue::new(expected),
    }
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|l| l.to_string()).collect()
}

fn dilutions() -> CourseModule {
    CourseModule {
        id: "module2".into(),
        title: "Module 2: Dilutions, Concentrations & Cell Counting".into(),
        quiz: vec![
            QuizQuestion::mcq(
                "If you have a stock solution of 10M NaOH and you want to make 500 mL of 0.5M NaOH, how much of the stock solution do you need?",
                &["2.5 mL", "25 mL", "50 mL", "5 mL"],
                "25 mL",
            )
            .explained("Using C1V1 = C2V2: (10M)(V1) = (0.5M)(500mL). So, V1 = (0.5 × 500) / 10 = 250 / 10 = 25 mL."),
            QuizQuestion::mcq(
                "You count an average of 60 live cells per large square in a Neubauer hemocytometer. Your cells were diluted 1:2 with Trypan Blue before counting. What is the concentration of live cells in your original sample (cells/mL)?",
                &[
                    "0.6 × 10^4 cells/mL",
                    "1.2 × 10^5 cells/mL",
                    "6.0 × 10^5 cells/mL",
                    "1.2 × 10^6 cells/mL",
                ],
                "1.2 × 10^6 cells/mL",
            )
            .explained("Cells/mL = (Avg cells per square) × Dilution Factor × 10^4 = 60 × 2 × 10^4 = 120 × 10^4 = 1.2 × 10^6 cells/mL."),
            QuizQuestion::mcq(
                "To make 50 mL of a 200 µM solution from a 10 mM stock, how much stock solution is required?",
                &["10 µL", "100 µL", "1 mL", "0.1 µL"],
                "1 mL",
            )
            .explained("First, ensure units are consistent. 10 mM = 10,000 µM. C1 = 10,000 µM, V1 = ?, C2 = 200 µM, V2 = 50 mL. V1 = (200 µM × 50 mL) / 10,000 µM = 10,000 / 10,000 mL = 1 mL."),
        ],
        scenarios: vec![],
        practice: vec![
            PracticeProblem {
                id: "bsa-dilution".into(),
                title: "BSA Dilution".into(),
                prompt: "You need to prepare 1 mL of 5% BSA solution in PBS from a 100% (w/v) BSA stock. How much stock BSA and PBS do you need?".into(),
                fields: vec![
                    field("Stock BSA", VolumeUnit::Microliter, 50.0),
                    field("PBS", VolumeUnit::Microliter, 950.0),
                ],
                setup: PracticeSetup::Dilution {
                    problem: DilutionProblem::new(ConcentrationUnit::Percent, VolumeUnit::Milliliter)
                        .with(DilutionField::C1, 100.0)
                        .with(DilutionField::C2, 5.0)
                        .with(DilutionField::V2, 1.0),
                },
                solution: lines(&[
                    "Using C1V1 = C2V2:",
                    "V1 = (C2 × V2) / C1 = (5% × 1 mL) / 100% = 0.05 mL = 50 µL of 100% BSA stock.",
                    "Volume of PBS = V2 - V1 = 1 mL - 0.05 mL = 0.95 mL = 950 µL of PBS.",
                ]),
            },
            PracticeProblem {
                id: "triton-dilution".into(),
                title: "Triton X-100 Dilution".into(),
                prompt: "You need to prepare 10 mL of 0.1% Triton X-100 solution from a 10% (v/v) stock solution. How much stock Triton X-100 and diluent do you need?".into(),
                fields: vec![
                    field("Stock Triton X-100", VolumeUnit::Microliter, 100.0),
                    field("Diluent", VolumeUnit::Milliliter, 9.9),
                ],
                setup: PracticeSetup::Dilution {
                    problem: DilutionProblem::new(ConcentrationUnit::Percent, VolumeUnit::Milliliter)
                        .with(DilutionField::C1, 10.0)
                        .with(DilutionField::C2, 0.1)
                        .with(DilutionField::V2, 10.0),
                },
                solution: lines(&[
                    "Using C1V1 = C2V2:",
                    "V1 = (C2 × V2) / C1 = (0.1% × 10 mL) / 10% = 0.1 mL = 100 µL of 10% Triton X-100 stock.",
                    "Volume of Diluent = V2 - V1 = 10 mL - 0.1 mL = 9.9 mL.",
                ]),
            },
            PracticeProblem {
                id: "antibody-dilution".into(),
                title: "Secondary Antibody Dilution (for 6 wells)".into(),
                prompt: "You need to prepare a secondary antibody solution for 6 wells of a plate. Each well requires 200 µL of antibody solution at a 1:1000 dilution from a concentrated stock. How much antibody stock and buffer do you need for exactly 6 wells?".into(),
                fields: vec![
                    field("Antibody Stock", VolumeUnit::Microliter, 1.2),
                    field("Buffer", VolumeUnit::Microliter, 1198.8),
                ],
                setup: PracticeSetup::Ratio {
                    factor: 1000.0,
                    final_volume: 1200.0,
                    volume_unit: VolumeUnit::Microliter,
                },
                solution: lines(&[
                    "Total volume needed = 6 wells × 200 µL/well = 1200 µL.",
                    "Volume of antibody stock = 1200 µL / 1000 = 1.2 µL.",
                    "Volume of buffer = 1200 µL - 1.2 µL = 1198.8 µL.",
                    "(Note: In practice, you'd prepare a bit extra.)",
                ]),
            },
            PracticeProblem {
                id: "cell-plating".into(),
                title: "Cell Plating".into(),
                prompt: "You have a cell stock with a concentration of 1 × 10^6 cells/mL. You want to plate 2 × 10^5 cells into each well. What volume of your cell stock do you need to add to each well?".into(),
                fields: vec![field("Cell Stock Volume per well", VolumeUnit::Microliter, 200.0)],
                setup: PracticeSetup::Seeding {
                    desired_cells: 2e5,
                    stock_cells_per_ml: 1e6,
                },
                solution: lines(&[
                    "Volume needed = (Desired cells) / (Stock concentration) = (2 × 10^5 cells) / (1 × 10^6 cells/mL) = 0.2 mL.",
                    "Convert to µL: 0.2 mL × 1000 µL/mL = 200 µL per well.",
                ]),
            },
        ],
    }
}

// ============================================================================
// Module 3: Cellular Alchemy: The Art of Transfection
// ============================================================================

fn transfection() -> CourseModule {
    CourseModule {
        id: "module3".into(),
        title: "Module 3: Cellular Alchemy: The Art of Transfection".into(),
        quiz: vec![
            QuizQuestion::mcq(
                "What is the primary purpose of adding 2x BBS in the calcium phosphate transfection method?",
                &[
                    "To provide nutrients to the cells",
                    "To permeabilize the cell membrane",
                    "To form a DNA-calcium phosphate co-precipitate",
                    "To select for transfected cells",
                ],
                "To form a DNA-calcium phosphate co-precipitate",
            )
            .explained("2x BBS (Buffered Saline Solution) provides the phosphate ions that react with calcium chloride and DNA to form the fine precipitate that cells can take up."),
            QuizQuestion::true_false(
                "True or False: For optimal calcium phosphate transfection, cells should ideally be 100% confluent.",
                false,
            )
            .explained("Cells should be actively dividing and typically at a confluency of 50-70% for efficient calcium phosphate transfection. 100% confluency often leads to lower efficiency."),
            QuizQuestion::mcq(
                "Which of the following is NOT a critical factor for successful calcium phosphate transfection?",
                &[
                    "pH of the BBS solution",
                    "Quality and quantity of plasmid DNA",
                    "Vigorous vortexing after adding BBS",
                    "Cell health and confluency",
                ],
                "Vigorous vortexing after adding BBS",
            )
            .explained("Vigorous vortexing after adding BBS can lead to large, irregular precipitates and shear DNA, reducing transfection efficiency. Gentle mixing by inversion is recommended."),
        ],
        scenarios: vec![
            ScenarioQuiz {
                id: "transfection-method-choice".into(),
                title: "The Agony of Choice: Which Method for Which Purpose?".into(),
                questions: vec![QuizQuestion::mcq(
                    "Imagine you want to express proteins quickly and cost-effectively in robust HEK293 cells. Which of the following methods would be most suitable for this project and our course?",
                    &[
                        "Lipofection (e.g., Lipofectamine)",
                        "Electroporation",
                        "Calcium Phosphate Precipitation",
                        "Viral Transduction (e.g., with lentiviruses)",
                    ],
                    "Calcium Phosphate Precipitation",
                )
                .with_feedback(
                    "Exactly! The calcium phosphate method is an established, cost-effective method well-suited for transfecting adherent cells like HEK293.",
                    "While other methods are effective, CaPi is a great balance of cost and efficiency for this specific purpose.",
                )],
            },
            ScenarioQuiz {
                id: "small-volume-pipetting".into(),
                title: "Handling Small Volumes".into(),
                questions: vec![QuizQuestion::mcq(
                    "The calculated plasmid volume is approximately 0.586 µL. Can this be pipetted accurately and directly with standard lab pipettes?",
                    &[
                        "Yes, it's fine.",
                        "No, it's too small for accurate direct pipetting.",
                    ],
                    "No, it's too small for accurate direct pipetting.",
                )
                .with_feedback(
                    "0.586 µL is generally too small to pipette accurately. A good strategy is to prepare a master mix or a working dilution.",
                    "This volume is very prone to error with standard lab equipment.",
                )],
            },
            ScenarioQuiz {
                id: "transfection-troubleshooting".into(),
                title: "Troubleshooting Transfection".into(),
                questions: vec![
                    QuizQuestion::mcq(
                        "Your cells look very unhappy after transfection, and many have detached. What could be a primary reason related to the CaPi method?",
                        &[
                            "Too little DNA was used",
                            "The precipitates were too fine or incubated for too short a time",
                            "The pH of the BBS was too high, leading to coarse, toxic precipitates, or precipitates were left on cells too long",
                            "Cells were not confluent enough",
                        ],
                        "The pH of the BBS was too high, leading to coarse, toxic precipitates, or precipitates were left on cells too long",
                    )
                    .explained("Coarse CaPi precipitates formed due to incorrect pH or overly long incubation with cells can be quite toxic, leading to cell stress and detachment."),
                    QuizQuestion::mcq(
                        "You see hardly any GFP-positive cells 24-48 hours post-transfection. Which is a common critical factor to check first for CaPi transfections?",
                        &[
                            "The incubator temperature was 36°C instead of 37°C",
                            "The pH of the 2x BBS solution was incorrect",
                            "You used 0.5 µg of DNA instead of 0.3 µg",
                            "The cells were only 50% confluent",
                        ],
                        "The pH of the 2x BBS solution was incorrect",
                    )
                    .explained("The pH of the BBS is extremely critical for forming the right kind of fine precipitate for efficient uptake. Incorrect pH is a very common reason for CaPi transfection failure."),
                ],
            },
        ],
        practice: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::AnswerEvaluator;

    #[test]
    fn test_every_answer_is_an_option() {
        for module in course_modules() {
            let questions = module
                .quiz
                .iter()
                .chain(module.scenarios.iter().flat_map(|s| s.questions.iter()));
            for q in questions {
                assert!(q.options.contains(&q.answer), "{}: {}", module.id, q.prompt);
            }
        }
    }

    #[test]
    fn test_practice_keys_match_calculators() {
        let evaluator = AnswerEvaluator::default();
        for problem in course_modules().iter().flat_map(|m| m.practice.clone()) {
            let computed = problem.compute_answers().unwrap();
            let feedback = evaluator
                .evaluate_numeric(
                    &problem.fields.iter().map(|f| f.expected).collect::<Vec<_>>(),
                    &computed.into_iter().map(Some).collect::<Vec<_>>(),
                )
                .unwrap();
            assert!(feedback.all_correct, "{}", problem.id);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let modules = course_modules();
        let mut ids: Vec<&str> = modules
            .iter()
            .flat_map(|m| {
                std::iter::once(m.id.as_str())
                    .chain(m.scenarios.iter().map(|s| s.id.as_str()))
                    .chain(m.practice.iter().map(|p| p.id.as_str()))
            })
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
