//! Quiz MCP Tools
//!
//! Look up course content and grade submissions. Each check call is graded
//! as a new question instance.

use serde_json::Value;

use crate::grading::{evaluate_choice, parse_entry, AnswerEvaluator, ExpectedValue, VerdictResult};
use crate::models::{Catalog, ModuleSummary, ModuleView, PracticeFeedback, QuestionFeedback};

use super::{ToolError, ToolResult};

pub fn list_modules(catalog: &Catalog) -> Vec<ModuleSummary> {
    catalog.modules().iter().map(|m| m.summary()).collect()
}

pub fn get_module(catalog: &Catalog, module_id: &str) -> ToolResult<ModuleView> {
    catalog
        .module(module_id)
        .map(|m| m.view())
        .ok_or_else(|| ToolError::NotFound(format!("Module not found: {}", module_id)))
}

pub fn check_quiz_answer(
    catalog: &Catalog,
    evaluator: &AnswerEvaluator,
    module_id: &str,
    question_number: usize,
    answer: &str,
) -> ToolResult<QuestionFeedback> {
    let module = catalog
        .module(module_id)
        .ok_or_else(|| ToolError::NotFound(format!("Module not found: {}", module_id)))?;
    let question = module.quiz_question(question_number).ok_or_else(|| {
        ToolError::NotFound(format!(
            "Question {} not found in {} ({} questions)",
            question_number,
            module_id,
            module.quiz.len()
        ))
    })?;
    Ok(question.check(evaluator, answer)?)
}

pub fn check_scenario_answer(
    catalog: &Catalog,
    evaluator: &AnswerEvaluator,
    scenario_id: &str,
    question_number: usize,
    answer: &str,
) -> ToolResult<QuestionFeedback> {
    let scenario = catalog
        .scenario(scenario_id)
        .ok_or_else(|| ToolError::NotFound(format!("Scenario quiz not found: {}", scenario_id)))?;
    let question = scenario.question(question_number).ok_or_else(|| {
        ToolError::NotFound(format!(
            "Question {} not found in {} ({} questions)",
            question_number,
            scenario_id,
            scenario.questions.len()
        ))
    })?;
    Ok(question.check(evaluator, answer)?)
}

pub fn check_practice_answer(
    catalog: &Catalog,
    evaluator: &AnswerEvaluator,
    problem_id: &str,
    answers: &[Value],
) -> ToolResult<PracticeFeedback> {
    let problem = catalog
        .practice_problem(problem_id)
        .ok_or_else(|| ToolError::NotFound(format!("Practice problem not found: {}", problem_id)))?;
    Ok(problem.check(evaluator, entries(answers))?)
}

pub fn grade_numeric(
    evaluator: &AnswerEvaluator,
    expected: &[ExpectedValue],
    submitted: &[Value],
) -> ToolResult<VerdictResult> {
    Ok(evaluator.evaluate_numeric(expected, &entries(submitted))?)
}

pub fn grade_choice(expected: &str, submitted: &str) -> VerdictResult {
    evaluate_choice(expected, submitted)
}

/// Read submitted entries: JSON numbers as-is, strings parsed, anything else blank
pub fn entries(values: &[Value]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| match v {
            Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
            Value::String(s) => parse_entry(s),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup() -> (Catalog, AnswerEvaluator) {
        (Catalog::bundled(), AnswerEvaluator::default())
    }

    #[test]
    fn test_list_modules() {
        let (catalog, _) = setup();
        let modules = list_modules(&catalog);
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[1].id, "module2");
        assert_eq!(modules[1].practice_problems, 4);
    }

    #[test]
    fn test_get_module_unknown() {
        let (catalog, _) = setup();
        assert!(matches!(get_module(&catalog, "nope"), Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_check_quiz_answer() {
        let (catalog, evaluator) = setup();
        let right = check_quiz_answer(&catalog, &evaluator, "module2", 1, "25 mL").unwrap();
        assert!(right.verdict.all_correct);
        assert!(right.explanation.is_some());

        let wrong = check_quiz_answer(&catalog, &evaluator, "module2", 1, "2.5 mL").unwrap();
        assert!(!wrong.verdict.all_correct);
        assert_eq!(wrong.correct_answer, "25 mL");
    }

    #[test]
    fn test_check_quiz_answer_out_of_range() {
        let (catalog, evaluator) = setup();
        assert!(matches!(
            check_quiz_answer(&catalog, &evaluator, "module2", 0, "25 mL"),
            Err(ToolError::NotFound(_))
        ));
        assert!(matches!(
            check_quiz_answer(&catalog, &evaluator, "module2", 4, "25 mL"),
            Err(ToolError::NotFound(_))
        ));
    }

    #[test]
    fn test_contamination_detective() {
        let (catalog, evaluator) = setup();
        let wrong =
            check_scenario_answer(&catalog, &evaluator, "contamination-detective", 1, "Yeast")
                .unwrap();
        assert!(!wrong.verdict.all_correct);
        assert!(wrong.verdict.message.contains("Bacteria"));
    }

    #[test]
    fn test_true_false_question() {
        let (catalog, evaluator) = setup();
        let right = check_quiz_answer(&catalog, &evaluator, "module3", 2, "False").unwrap();
        assert!(right.verdict.all_correct);
    }

    #[test]
    fn test_check_practice_answer_mixed_entries() {
        let (catalog, evaluator) = setup();
        let feedback = check_practice_answer(
            &catalog,
            &evaluator,
            "bsa-dilution",
            &[json!("49.99"), json!(950)],
        )
        .unwrap();
        assert!(feedback.verdict.all_correct);

        let feedback = check_practice_answer(
            &catalog,
            &evaluator,
            "bsa-dilution",
            &[json!(48), json!("nine fifty")],
        )
        .unwrap();
        assert_eq!(feedback.verdict.per_field_correctness, vec![false, false]);
        assert!(!feedback.solution.is_empty());
    }

    #[test]
    fn test_check_practice_answer_wrong_arity() {
        let (catalog, evaluator) = setup();
        let err = check_practice_answer(&catalog, &evaluator, "cell-plating", &[json!(200), json!(1)])
            .unwrap_err();
        assert!(matches!(err, ToolError::Calc(_)));
    }

    #[test]
    fn test_grade_numeric_and_choice() {
        let evaluator = AnswerEvaluator::default();
        let expected = [ExpectedValue::new(50.0), ExpectedValue::new(950.0)];
        let v = grade_numeric(&evaluator, &expected, &[json!(48.0), json!(950.0)]).unwrap();
        assert_eq!(v.per_field_correctness, vec![false, true]);
        assert!(!grade_choice("Bacteria", "Yeast").all_correct);
    }

    #[test]
    fn test_entries() {
        let parsed = entries(&[json!(1.5), json!(" 2 "), json!(null), json!(true), json!("x")]);
        assert_eq!(parsed, vec![Some(1.5), Some(2.0), None, None, None]);
    }
}
