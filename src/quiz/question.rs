use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_QUESTIONS_TO_SHOW: usize = 20;

/// The closed set of interactions a question can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionType {
    Standard,
    Checkbox,
    Reorder,
    Match,
}

impl QuestionType {
    /// Resolve the loosely typed `type` tag found in quiz files. Anything unrecognised is Standard.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("checkbox") => Self::Checkbox,
            Some("reorder") => Self::Reorder,
            Some("match") => Self::Match,
            _ => Self::Standard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Checkbox => "checkbox",
            Self::Reorder => "reorder",
            Self::Match => "match",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    pub text: String,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Standard { options: Vec<String>, answer: String },
    Checkbox { options: Vec<String>, correct: Vec<String> },
    Reorder { items: Vec<RankedItem> },
    Match { pairs: Vec<MatchPair> },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Standard { .. } => QuestionType::Standard,
            Self::Checkbox { .. } => QuestionType::Checkbox,
            Self::Reorder { .. } => QuestionType::Reorder,
            Self::Match { .. } => QuestionType::Match,
        }
    }
}

/// A question as loaded from a quiz file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawQuestion")]
pub struct Question {
    pub prompt: String,
    pub explanation: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    /// Describe semantic defects in the record. An empty list means the record looks sound.
    pub fn lint(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.prompt.trim().is_empty() {
            issues.push("question text is empty".to_string());
        }
        match &self.kind {
            QuestionKind::Standard { options, answer } => {
                if options.is_empty() {
                    issues.push("standard question has no options".to_string());
                }
                if !options.contains(answer) {
                    issues.push(format!("answer \"{}\" is not one of the options", answer));
                }
            }
            QuestionKind::Checkbox { options, correct } => {
                if correct.is_empty() {
                    issues.push("checkbox question has no correct options".to_string());
                }
                let unique: BTreeSet<&String> = correct.iter().collect();
                if unique.len() != correct.len() {
                    issues.push("checkbox correct list contains duplicates".to_string());
                }
                for value in correct.iter().filter(|value| !options.contains(value)) {
                    issues.push(format!("correct value \"{}\" is not one of the options", value));
                }
            }
            QuestionKind::Reorder { items } => {
                let orders: BTreeSet<usize> = items.iter().map(|item| item.order).collect();
                let dense = orders.len() == items.len()
                    && orders.iter().copied().eq(1..=items.len());
                if !dense {
                    issues.push(format!(
                        "reorder ranks must be exactly 1..{} without gaps or repeats",
                        items.len()
                    ));
                }
            }
            QuestionKind::Match { pairs } => {
                let lefts: BTreeSet<&String> = pairs.iter().map(|pair| &pair.left).collect();
                let rights: BTreeSet<&String> = pairs.iter().map(|pair| &pair.right).collect();
                if lefts.len() != pairs.len() {
                    issues.push("match pairs repeat a left value".to_string());
                }
                if rights.len() != pairs.len() {
                    issues.push("match pairs repeat a right value".to_string());
                }
            }
        }
        issues
    }
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        let kind = match QuestionType::from_tag(raw.question_type.as_deref()) {
            QuestionType::Standard => QuestionKind::Standard {
                options: raw.options,
                answer: raw.answer,
            },
            QuestionType::Checkbox => QuestionKind::Checkbox {
                options: raw.options,
                correct: raw.correct,
            },
            QuestionType::Reorder => QuestionKind::Reorder { items: raw.items },
            QuestionType::Match => QuestionKind::Match { pairs: raw.pairs },
        };
        Self {
            prompt: raw.question,
            explanation: raw.explanation,
            kind,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawQuestion {
    #[serde(default, rename = "type")]
    question_type: Option<String>,
    #[serde(default, alias = "prompt")]
    question: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    correct: Vec<String>,
    #[serde(default)]
    items: Vec<RankedItem>,
    #[serde(default)]
    pairs: Vec<MatchPair>,
}

/// The externally supplied quiz definition: a question pool and how many to ask per session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    #[serde(default)]
    pub all_questions: Vec<Question>,
    #[serde(default = "default_questions_to_show")]
    pub questions_to_show: usize,
}

impl QuizConfig {
    pub fn new(all_questions: Vec<Question>, questions_to_show: usize) -> Self {
        let mut config = Self {
            all_questions,
            questions_to_show,
        };
        config.normalize();
        config
    }

    pub fn normalize(&mut self) {
        if self.questions_to_show == 0 {
            self.questions_to_show = DEFAULT_QUESTIONS_TO_SHOW;
        }
    }

    /// Number of questions a session drawn from this pool will contain.
    pub fn session_size(&self) -> usize {
        self.questions_to_show.min(self.all_questions.len())
    }

    /// Collect lint warnings for every question, prefixed with the question's 1-based position
    /// and type, e.g. `question 3 (checkbox): ...`.
    pub fn lint(&self) -> Vec<String> {
        self.all_questions
            .iter()
            .enumerate()
            .flat_map(|(index, question)| {
                let kind = question.question_type().label();
                question
                    .lint()
                    .into_iter()
                    .map(move |issue| format!("question {} ({}): {}", index + 1, kind, issue))
            })
            .collect()
    }
}

const fn default_questions_to_show() -> usize {
    DEFAULT_QUESTIONS_TO_SHOW
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::from_str;

    #[test]
    fn missing_or_unknown_type_falls_back_to_standard() {
        let untyped: Question =
            from_str(r#"{"question": "2 + 2?", "options": ["3", "4"], "answer": "4"}"#).unwrap();
        let unknown: Question = from_str(
            r#"{"type": "essay", "question": "2 + 2?", "options": ["3", "4"], "answer": "4"}"#,
        )
        .unwrap();

        assert_eq!(untyped.question_type(), QuestionType::Standard);
        assert_eq!(unknown.question_type(), QuestionType::Standard);
        assert_eq!(
            untyped.kind,
            QuestionKind::Standard {
                options: vec!["3".to_string(), "4".to_string()],
                answer: "4".to_string()
            }
        );
    }

    #[test]
    fn variant_payloads_are_parsed_by_type_tag() {
        let config: QuizConfig = from_str(
            r#"{
                "allQuestions": [
                    {"type": "Checkbox", "prompt": "Pick vowels", "options": ["a", "b", "e"], "correct": ["a", "e"]},
                    {"type": "reorder", "question": "Sort", "items": [{"text": "b", "order": 2}, {"text": "a", "order": 1}]},
                    {"type": "match", "question": "Pair", "pairs": [{"left": "1", "right": "one"}]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.questions_to_show, DEFAULT_QUESTIONS_TO_SHOW);
        let types: Vec<QuestionType> = config
            .all_questions
            .iter()
            .map(Question::question_type)
            .collect();
        assert_eq!(
            types,
            vec![QuestionType::Checkbox, QuestionType::Reorder, QuestionType::Match]
        );
        assert_eq!(config.all_questions[0].prompt, "Pick vowels");
        assert_eq!(config.all_questions[0].explanation, "");
    }

    #[test]
    fn session_size_is_clamped_to_pool() {
        let question: Question =
            from_str(r#"{"question": "q", "options": ["a"], "answer": "a"}"#).unwrap();
        let config = QuizConfig::new(vec![question; 3], 20);
        assert_eq!(config.session_size(), 3);

        let zero = QuizConfig::new(Vec::new(), 0);
        assert_eq!(zero.questions_to_show, DEFAULT_QUESTIONS_TO_SHOW);
    }

    #[test]
    fn lint_reports_broken_answer_keys() {
        let config: QuizConfig = from_str(
            r#"{
                "allQuestions": [
                    {"question": "q1", "options": ["a", "b"], "answer": "c"},
                    {"type": "reorder", "question": "q2", "items": [{"text": "x", "order": 1}, {"text": "y", "order": 3}]},
                    {"type": "match", "question": "q3", "pairs": [{"left": "l", "right": "r"}, {"left": "l", "right": "s"}]},
                    {"question": "q4", "options": ["a"], "answer": "a"}
                ]
            }"#,
        )
        .unwrap();

        let warnings = config.lint();
        assert_eq!(warnings.len(), 3, "unexpected warnings: {:?}", warnings);
        assert!(warnings[0].starts_with("question 1 (standard):"));
        assert!(warnings[1].starts_with("question 2 (reorder):"));
        assert!(warnings[2].starts_with("question 3 (match):"));
    }
}
