use super::{Grade, Marking};
use crate::quiz::shuffler::shuffled;
use rand::Rng;

/// Single-choice question with its options in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardView {
    pub options: Vec<String>,
    /// The answer is kept by value, so reordering the options never moves it.
    pub answer: String,
}

impl StandardView {
    pub fn present<R: Rng + ?Sized>(options: &[String], answer: &str, rng: &mut R) -> Self {
        Self {
            options: shuffled(options, rng),
            answer: answer.to_string(),
        }
    }

    pub fn is_answer(&self, option: &str) -> bool {
        option == self.answer
    }

    pub fn grade(&self, choice: &str) -> Grade {
        Grade {
            is_correct: self.is_answer(choice),
            marking: Marking::Standard {
                chosen: choice.to_string(),
                correct: self.answer.clone(),
            },
        }
    }
}
