//! Course models
//!
//! Modules, quiz questions and practice problems, plus the bundled course.

mod content;
mod course;
mod practice;
mod question;

pub use content::course_modules;
pub use course::{Catalog, CourseModule, ModuleSummary, ModuleView, ScenarioQuiz, ScenarioView};
pub use practice::{
    PracticeFeedback, PracticeField, PracticeFieldView, PracticeProblem, PracticeSetup,
    PracticeView,
};
pub use question::{QuestionFeedback, QuestionKind, QuestionView, QuizQuestion};
