//! Course module model
//!
//! A module bundles an end-of-module quiz, scenario quizzes embedded in the
//! lesson, and practice problems.

use serde::Serialize;

use super::practice::{PracticeProblem, PracticeView};
use super::question::{QuestionView, QuizQuestion};

/// Short quiz embedded in a lesson ("Contamination Detective" etc.)
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioQuiz {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseModule {
    pub id: String,
    pub title: String,
    pub quiz: Vec<QuizQuestion>,
    pub scenarios: Vec<ScenarioQuiz>,
    pub practice: Vec<PracticeProblem>,
}

/// Module listing entry
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub id: String,
    pub title: String,
    pub quiz_questions: usize,
    pub scenario_quizzes: usize,
    pub practice_problems: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioView {
    pub id: String,
    pub title: String,
    pub questions: Vec<QuestionView>,
}

/// Module as shown to a learner, with answer keys removed
#[derive(Debug, Clone, Serialize)]
pub struct ModuleView {
    pub id: String,
    pub title: String,
    pub quiz: Vec<QuestionView>,
    pub scenarios: Vec<ScenarioView>,
    pub practice: Vec<PracticeView>,
}

fn number_questions(questions: &[QuizQuestion]) -> Vec<QuestionView> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| q.view(i + 1))
        .collect()
}

impl CourseModule {
    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            quiz_questions: self.quiz.len(),
            scenario_quizzes: self.scenarios.len(),
            practice_problems: self.practice.len(),
        }
    }

    pub fn view(&self) -> ModuleView {
        ModuleView {
            id: self.id.clone(),
            title: self.title.clone(),
            quiz: number_questions(&self.quiz),
            scenarios: self
                .scenarios
                .iter()
                .map(|s| ScenarioView {
                    id: s.id.clone(),
                    title: s.title.clone(),
                    questions: number_questions(&s.questions),
                })
                .collect(),
            practice: self.practice.iter().map(|p| p.view()).collect(),
        }
    }

    /// Quiz question by 1-based number
    pub fn quiz_question(&self, number: usize) -> Option<&QuizQuestion> {
        number.checked_sub(1).and_then(|i| self.quiz.get(i))
    }
}

impl ScenarioQuiz {
    /// Question by 1-based number
    pub fn question(&self, number: usize) -> Option<&QuizQuestion> {
        number.checked_sub(1).and_then(|i| self.questions.get(i))
    }
}

/// All course modules, looked up by id
#[derive(Debug, Clone)]
pub struct Catalog {
    modules: Vec<CourseModule>,
}

impl Catalog {
    pub fn new(modules: Vec<CourseModule>) -> Self {
        Self { modules }
    }

    /// The course shipped with this crate
    pub fn bundled() -> Self {
        Self::new(super::content::course_modules())
    }

    pub fn modules(&self) -> &[CourseModule] {
        &self.modules
    }

    pub fn module(&self, id: &str) -> Option<&CourseModule> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioQuiz> {
        self.modules
            .iter()
            .flat_map(|m| m.scenarios.iter())
            .find(|s| s.id == id)
    }

    pub fn practice_problem(&self, id: &str) -> Option<&PracticeProblem> {
        self.modules
            .iter()
            .flat_map(|m| m.practice.iter())
            .find(|p| p.id == id)
    }

    pub fn practice_problems(&self) -> impl Iterator<Item = &PracticeProblem> {
        self.modules.iter().flat_map(|m| m.practice.iter())
    }

    /// Total gradable items (quiz questions, scenario questions, practice problems)
    pub fn item_count(&self) -> usize {
        self.modules
            .iter()
            .map(|m| {
                m.quiz.len()
                    + m.scenarios.iter().map(|s| s.questions.len()).sum::<usize>()
                    + m.practice.len()
            })
            .sum()
    }
}
