use super::{Grade, Marking, OptionMark};
use crate::quiz::{error::ValidationError, shuffler::shuffled};
use rand::Rng;
use std::collections::BTreeSet;

/// Multi-select question. Correct only when the submitted set equals the answer set exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxView {
    pub options: Vec<String>,
    pub correct: Vec<String>,
}

impl CheckboxView {
    pub fn present<R: Rng + ?Sized>(options: &[String], correct: &[String], rng: &mut R) -> Self {
        Self {
            options: shuffled(options, rng),
            correct: correct.to_vec(),
        }
    }

    pub fn is_correct_option(&self, option: &str) -> bool {
        self.correct.iter().any(|value| value == option)
    }

    pub fn grade(&self, selected: &[String]) -> Result<Grade, ValidationError> {
        if selected.is_empty() {
            return Err(ValidationError::NoSelection);
        }

        let submitted: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
        let expected: BTreeSet<&str> = self.correct.iter().map(String::as_str).collect();
        let is_correct = selected.len() == self.correct.len() && submitted == expected;

        let marks = self
            .options
            .iter()
            .map(|option| {
                if self.is_correct_option(option) {
                    OptionMark::Correct
                } else if submitted.contains(option.as_str()) {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Unmarked
                }
            })
            .collect();

        Ok(Grade {
            is_correct,
            marking: Marking::Checkbox(marks),
        })
    }
}
