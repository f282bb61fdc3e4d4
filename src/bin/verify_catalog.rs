//! Check that every practice problem's stored answers match the calculators
//! Usage: cargo run --bin verify_catalog

use labtutor::config::Config;
use labtutor::grading::AnswerEvaluator;
use labtutor::models::Catalog;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let evaluator = AnswerEvaluator::new(config.tolerance)?;
    let catalog = Catalog::bundled();

    println!(
        "Checking {} modules with tolerance {}",
        catalog.modules().len(),
        config.tolerance
    );

    let mut failures = 0;
    for problem in catalog.practice_problems() {
        println!("\nPractice problem: {} ({})", problem.id, problem.title);

        let computed = match problem.compute_answers() {
            Ok(values) => values,
            Err(e) => {
                println!("  ERROR: {}", e);
                failures += 1;
                continue;
            }
        };

        for (field, value) in problem.fields.iter().zip(&computed) {
            println!(
                "  {}: stored {} {}, computed {:.4} {}",
                field.label, field.expected.value, field.unit, value, field.unit
            );
        }

        let verdict = problem.check(&evaluator, computed.into_iter().map(Some).collect())?;
        if verdict.verdict.all_correct {
            println!("  OK");
        } else {
            println!("  MISMATCH: {:?}", verdict.verdict.per_field_correctness);
            failures += 1;
        }
    }

    for module in catalog.modules() {
        let questions = module
            .quiz
            .iter()
            .chain(module.scenarios.iter().flat_map(|s| s.questions.iter()));
        for question in questions {
            if !question.options.contains(&question.answer) {
                println!("\n{}: answer '{}' is not an option", module.id, question.answer);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        println!("\n{} problem(s) failed verification", failures);
        std::process::exit(1);
    }

    println!("\nAll {} catalog items verified", catalog.item_count());
    Ok(())
}
