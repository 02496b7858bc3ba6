//! Per-type presentation shuffling and grading, dispatched by an exhaustive match on the
//! question's variant.

pub mod checkbox;
pub mod matching;
pub mod reorder;
pub mod standard;

pub use checkbox::CheckboxView;
pub use matching::MatchView;
pub use reorder::{Arrangement, ReorderView};
pub use standard::StandardView;

use super::{
    error::ValidationError,
    question::{Question, QuestionKind, QuestionType},
};
use rand::Rng;

/// How the presentation layer should collect an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Grade as soon as an option is picked.
    Immediate,
    /// Collect input, then grade on an explicit submit.
    SubmitButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Standard(StandardView),
    Checkbox(CheckboxView),
    Reorder(ReorderView),
    Match(MatchView),
}

/// A selected question with its option, item or pair order fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedQuestion {
    pub prompt: String,
    pub explanation: String,
    pub presentation: Presentation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Standard(String),
    Checkbox(Vec<String>),
    Reorder(Arrangement),
    Match(Vec<Option<String>>),
}

impl Submission {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Standard(_) => QuestionType::Standard,
            Self::Checkbox(_) => QuestionType::Checkbox,
            Self::Reorder(_) => QuestionType::Reorder,
            Self::Match(_) => QuestionType::Match,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    Incorrect,
    Unmarked,
}

/// Feedback markings, indexed in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marking {
    Standard { chosen: String, correct: String },
    Checkbox(Vec<OptionMark>),
    Reorder(Vec<bool>),
    Match(Vec<bool>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub is_correct: bool,
    pub marking: Marking,
}

impl PresentedQuestion {
    pub fn present<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        let presentation = match &question.kind {
            QuestionKind::Standard { options, answer } => {
                Presentation::Standard(StandardView::present(options, answer, rng))
            }
            QuestionKind::Checkbox { options, correct } => {
                Presentation::Checkbox(CheckboxView::present(options, correct, rng))
            }
            QuestionKind::Reorder { items } => {
                Presentation::Reorder(ReorderView::present(items, rng))
            }
            QuestionKind::Match { pairs } => Presentation::Match(MatchView::present(pairs, rng)),
        };
        Self {
            prompt: question.prompt.clone(),
            explanation: question.explanation.clone(),
            presentation,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match &self.presentation {
            Presentation::Standard(_) => QuestionType::Standard,
            Presentation::Checkbox(_) => QuestionType::Checkbox,
            Presentation::Reorder(_) => QuestionType::Reorder,
            Presentation::Match(_) => QuestionType::Match,
        }
    }

    pub fn interaction(&self) -> Interaction {
        match self.presentation {
            Presentation::Standard(_) => Interaction::Immediate,
            Presentation::Checkbox(_) | Presentation::Reorder(_) | Presentation::Match(_) => {
                Interaction::SubmitButton
            }
        }
    }

    /// Validate and grade a submission. Has no side effects; scoring is the controller's job.
    pub fn grade(&self, submission: &Submission) -> Result<Grade, ValidationError> {
        match (&self.presentation, submission) {
            (Presentation::Standard(view), Submission::Standard(choice)) => Ok(view.grade(choice)),
            (Presentation::Checkbox(view), Submission::Checkbox(selected)) => view.grade(selected),
            (Presentation::Reorder(view), Submission::Reorder(arrangement)) => {
                view.grade(arrangement)
            }
            (Presentation::Match(view), Submission::Match(selections)) => view.grade(selections),
            _ => Err(ValidationError::KindMismatch {
                expected: self.question_type().label(),
                submitted: submission.question_type().label(),
            }),
        }
    }
}
