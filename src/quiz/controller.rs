use super::{
    error::{ConfigurationError, QuizError},
    handlers::{Grade, PresentedQuestion, Submission},
    question::QuizConfig,
    selector,
    session::SessionState,
    summary::{self, ResultSummary},
};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Uninitialized,
    Presenting(usize),
    AwaitingGrading(usize),
    Feedback(usize),
    Finished,
}

impl QuizPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Presenting(_) => "presenting a question",
            Self::AwaitingGrading(_) => "awaiting an answer",
            Self::Feedback(_) => "showing feedback",
            Self::Finished => "finished",
        }
    }
}

/// What the feedback collaborator shows after a graded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub explanation: String,
    pub grade: Grade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Finished,
}

/// Values handed to an external persistence hook once a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRecord {
    pub score: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl CompletionRecord {
    pub fn elapsed_seconds(&self) -> i64 {
        self.elapsed.num_seconds().max(0)
    }
}

/// Drives one quiz through presentation, grading, feedback and completion.
///
/// The controller only moves in response to [`Self::start`], [`Self::submit_answer`],
/// [`Self::continue_to_next`] and [`Self::restart`]; nothing advances on its own.
#[derive(Debug)]
pub struct QuizController<R = StdRng> {
    config: Option<QuizConfig>,
    rng: R,
    phase: QuizPhase,
    session: Option<SessionState>,
    last_feedback: Option<Feedback>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizController<StdRng> {
    pub fn new(config: Option<QuizConfig>) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }
}

impl<R: Rng> QuizController<R> {
    pub fn with_rng(config: Option<QuizConfig>, rng: R) -> Self {
        let config = config.map(|mut config| {
            config.normalize();
            config
        });
        Self {
            config,
            rng,
            phase: QuizPhase::Uninitialized,
            session: None,
            last_feedback: None,
            finished_at: None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn config(&self) -> Option<&QuizConfig> {
        self.config.as_ref()
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    /// The question currently on screen, including while its feedback is showing.
    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        match self.phase {
            QuizPhase::Presenting(_) | QuizPhase::AwaitingGrading(_) | QuizPhase::Feedback(_) => {
                self.session.as_ref()?.current_question()
            }
            QuizPhase::Uninitialized | QuizPhase::Finished => None,
        }
    }

    /// Select and shuffle a fresh session. On failure nothing is created and the phase stays
    /// `Uninitialized`.
    pub fn start(&mut self) -> Result<&SessionState, QuizError> {
        if self.phase != QuizPhase::Uninitialized {
            return Err(invalid_transition("start", self.phase));
        }
        let config = self.config.as_ref().ok_or(ConfigurationError::MissingConfig)?;
        let selected = selector::select(
            &config.all_questions,
            config.questions_to_show,
            &mut self.rng,
        )?;

        self.last_feedback = None;
        self.finished_at = None;
        self.phase = QuizPhase::Presenting(0);
        Ok(self.session.insert(SessionState::new(selected, Utc::now())))
    }

    /// Hand the current question to the renderer and wait for a submission.
    pub fn present(&mut self) -> Result<&PresentedQuestion, QuizError> {
        let index = match self.phase {
            QuizPhase::Presenting(index) | QuizPhase::AwaitingGrading(index) => index,
            phase => return Err(invalid_transition("present a question", phase)),
        };
        self.phase = QuizPhase::AwaitingGrading(index);
        self.session
            .as_ref()
            .and_then(|session| session.selected().get(index))
            .ok_or_else(|| invalid_transition("present a question", QuizPhase::Uninitialized))
    }

    /// Grade a submission for the current question. A validation error leaves the question
    /// open with no change to the score.
    pub fn submit_answer(&mut self, submission: &Submission) -> Result<Feedback, QuizError> {
        let index = match self.phase {
            QuizPhase::Presenting(index) | QuizPhase::AwaitingGrading(index) => index,
            phase => return Err(invalid_transition("submit an answer", phase)),
        };
        let Some(session) = self.session.as_mut() else {
            return Err(invalid_transition("submit an answer", QuizPhase::Uninitialized));
        };
        let Some(question) = session.selected().get(index) else {
            return Err(invalid_transition("submit an answer", QuizPhase::Finished));
        };

        self.phase = QuizPhase::AwaitingGrading(index);
        let grade = question.grade(submission)?;
        let feedback = Feedback {
            is_correct: grade.is_correct,
            explanation: question.explanation.clone(),
            grade,
        };
        session.record(feedback.is_correct);

        self.phase = QuizPhase::Feedback(index);
        self.last_feedback = Some(feedback.clone());
        Ok(feedback)
    }

    /// Leave the feedback screen for the next question, or finish after the last one.
    pub fn continue_to_next(&mut self) -> Result<Advance, QuizError> {
        let QuizPhase::Feedback(index) = self.phase else {
            return Err(invalid_transition("continue", self.phase));
        };
        let Some(session) = self.session.as_mut() else {
            return Err(invalid_transition("continue", QuizPhase::Uninitialized));
        };

        session.advance();
        self.last_feedback = None;
        if session.is_complete() {
            self.phase = QuizPhase::Finished;
            self.finished_at = Some(Utc::now());
            Ok(Advance::Finished)
        } else {
            self.phase = QuizPhase::Presenting(index + 1);
            Ok(Advance::Next(index + 1))
        }
    }

    /// Discard the current session and start over with a new selection and shuffle.
    pub fn restart(&mut self) -> Result<&SessionState, QuizError> {
        self.phase = QuizPhase::Uninitialized;
        self.session = None;
        self.last_feedback = None;
        self.finished_at = None;
        self.start()
    }

    pub fn summary(&self) -> Option<ResultSummary> {
        if self.phase != QuizPhase::Finished {
            return None;
        }
        let session = self.session.as_ref()?;
        summary::summarize(session.score(), session.total()).ok()
    }

    pub fn completion(&self) -> Option<CompletionRecord> {
        if self.phase != QuizPhase::Finished {
            return None;
        }
        let session = self.session.as_ref()?;
        let finished_at = self.finished_at?;
        Some(CompletionRecord {
            score: session.score(),
            total: session.total(),
            elapsed: finished_at - session.started_at(),
        })
    }
}

fn invalid_transition(event: &'static str, phase: QuizPhase) -> QuizError {
    QuizError::InvalidTransition {
        event,
        phase: phase.label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{
        error::ValidationError,
        handlers::{Arrangement, Presentation},
        question::QuestionType,
    };
    use serde_json::from_str;
    use std::{collections::HashSet, fs, path::Path};

    fn load_fixture(filename: &str) -> QuizConfig {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(filename);
        let contents = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {}", path.display(), err));
        from_str(&contents).unwrap_or_else(|err| {
            panic!("failed to parse {} as QuizConfig: {}", path.display(), err)
        })
    }

    fn controller(config: QuizConfig, seed: u64) -> QuizController {
        QuizController::with_rng(Some(config), StdRng::seed_from_u64(seed))
    }

    fn correct_submission(question: &PresentedQuestion) -> Submission {
        match &question.presentation {
            Presentation::Standard(view) => Submission::Standard(view.answer.clone()),
            Presentation::Checkbox(view) => Submission::Checkbox(view.correct.clone()),
            Presentation::Reorder(view) => {
                let mut indices: Vec<usize> = (0..view.items.len()).collect();
                indices.sort_by_key(|&index| view.items[index].order);
                Submission::Reorder(Arrangement::from_indices(indices))
            }
            Presentation::Match(view) => Submission::Match(
                view.pairs
                    .iter()
                    .map(|pair| Some(pair.right.clone()))
                    .collect(),
            ),
        }
    }

    fn wrong_submission(question: &PresentedQuestion) -> Submission {
        match &question.presentation {
            Presentation::Standard(_) => Submission::Standard("definitely not an option".into()),
            Presentation::Checkbox(view) => Submission::Checkbox(view.options.clone()),
            Presentation::Reorder(view) => {
                let mut indices: Vec<usize> = (0..view.items.len()).collect();
                indices.sort_by_key(|&index| std::cmp::Reverse(view.items[index].order));
                Submission::Reorder(Arrangement::from_indices(indices))
            }
            Presentation::Match(view) => {
                let mut rights: Vec<Option<String>> =
                    view.pairs.iter().map(|pair| Some(pair.right.clone())).collect();
                rights.rotate_left(1);
                Submission::Match(rights)
            }
        }
    }

    #[test]
    fn missing_config_leaves_controller_uninitialized() {
        let mut controller: QuizController =
            QuizController::with_rng(None, StdRng::seed_from_u64(0));
        assert_eq!(
            controller.start().err(),
            Some(QuizError::Configuration(ConfigurationError::MissingConfig))
        );
        assert_eq!(controller.phase(), QuizPhase::Uninitialized);
        assert!(controller.session().is_none());
    }

    #[test]
    fn empty_pool_leaves_controller_uninitialized() {
        let mut controller = controller(QuizConfig::new(Vec::new(), 5), 0);
        assert_eq!(
            controller.start().err(),
            Some(QuizError::Configuration(ConfigurationError::EmptyPool))
        );
        assert_eq!(controller.phase(), QuizPhase::Uninitialized);
    }

    #[test]
    fn perfect_run_visits_every_question_once_and_finishes() {
        let config = load_fixture("test_fixtures/mixed_question_types.json");
        let expected_total = config.session_size();
        let mut controller = controller(config, 17);
        controller.start().unwrap();

        let mut seen = HashSet::new();
        loop {
            let QuizPhase::Presenting(index) = controller.phase() else {
                panic!("expected a question, found {:?}", controller.phase());
            };
            let question = controller.present().unwrap().clone();
            assert_eq!(controller.phase(), QuizPhase::AwaitingGrading(index));
            assert!(
                seen.insert(question.prompt.clone()),
                "question {:?} was shown twice",
                question.prompt
            );

            let feedback = controller
                .submit_answer(&correct_submission(&question))
                .unwrap();
            assert!(feedback.is_correct, "question {} graded wrong", question.prompt);
            assert_eq!(feedback.explanation, question.explanation);
            assert_eq!(controller.phase(), QuizPhase::Feedback(index));

            if controller.continue_to_next().unwrap() == Advance::Finished {
                break;
            }
        }

        let session = controller.session().unwrap();
        assert_eq!(seen.len(), expected_total);
        assert_eq!(session.current_index(), expected_total);
        assert_eq!(session.score(), expected_total);
        assert_eq!(session.answer_log(), vec![true; expected_total].as_slice());

        let summary = controller.summary().unwrap();
        assert_eq!(summary.percentage, 100);
        let completion = controller.completion().unwrap();
        assert_eq!(completion.score, expected_total);
        assert_eq!(completion.total, expected_total);
        assert!(completion.elapsed_seconds() >= 0);
    }

    #[test]
    fn wrong_answers_never_score() {
        let config = load_fixture("test_fixtures/mixed_question_types.json");
        let mut controller = controller(config, 99);
        controller.start().unwrap();

        while let QuizPhase::Presenting(_) = controller.phase() {
            let question = controller.present().unwrap().clone();
            let feedback = controller
                .submit_answer(&wrong_submission(&question))
                .unwrap();
            assert!(!feedback.is_correct, "question {} scored", question.prompt);
            controller.continue_to_next().unwrap();
        }

        assert_eq!(controller.phase(), QuizPhase::Finished);
        let session = controller.session().unwrap();
        assert_eq!(session.score(), 0);
        assert!(session.answer_log().iter().all(|correct| !correct));
        assert_eq!(
            controller.summary().map(|summary| summary.percentage),
            Some(0)
        );
    }

    #[test]
    fn validation_error_keeps_question_open() {
        let config: QuizConfig = from_str(
            r#"{"allQuestions": [
                {"type": "checkbox", "question": "Pick", "options": ["A", "B", "C"], "correct": ["A", "C"]}
            ]}"#,
        )
        .unwrap();
        let mut controller = controller(config, 1);
        controller.start().unwrap();
        controller.present().unwrap();

        assert_eq!(
            controller.submit_answer(&Submission::Checkbox(Vec::new())),
            Err(QuizError::Validation(ValidationError::NoSelection))
        );
        assert_eq!(controller.phase(), QuizPhase::AwaitingGrading(0));
        assert_eq!(controller.session().unwrap().score(), 0);
        assert!(controller.session().unwrap().answer_log().is_empty());

        let feedback = controller
            .submit_answer(&Submission::Checkbox(vec!["C".into(), "A".into()]))
            .unwrap();
        assert!(feedback.is_correct);
        assert_eq!(controller.session().unwrap().score(), 1);
    }

    #[test]
    fn reorder_in_true_order_scores_exactly_one() {
        let config: QuizConfig = from_str(
            r#"{"allQuestions": [
                {"type": "reorder", "question": "Order", "explanation": "Counting.", "items": [
                    {"text": "one", "order": 1}, {"text": "two", "order": 2},
                    {"text": "three", "order": 3}, {"text": "four", "order": 4}
                ]}
            ]}"#,
        )
        .unwrap();
        let mut controller = controller(config, 8);
        controller.start().unwrap();
        let question = controller.present().unwrap().clone();
        assert_eq!(question.question_type(), QuestionType::Reorder);

        let feedback = controller
            .submit_answer(&correct_submission(&question))
            .unwrap();
        assert!(feedback.is_correct);
        assert_eq!(feedback.explanation, "Counting.");
        assert_eq!(controller.session().unwrap().score(), 1);
    }

    #[test]
    fn events_outside_their_phase_are_rejected_without_change() {
        let config = load_fixture("test_fixtures/mixed_question_types.json");
        let mut controller = controller(config, 5);

        assert!(matches!(
            controller.continue_to_next(),
            Err(QuizError::InvalidTransition { .. })
        ));
        controller.start().unwrap();
        assert!(matches!(
            controller.start(),
            Err(QuizError::InvalidTransition { .. })
        ));
        assert!(matches!(
            controller.continue_to_next(),
            Err(QuizError::InvalidTransition { .. })
        ));
        assert_eq!(controller.phase(), QuizPhase::Presenting(0));

        let question = controller.present().unwrap().clone();
        controller
            .submit_answer(&correct_submission(&question))
            .unwrap();
        assert!(matches!(
            controller.submit_answer(&correct_submission(&question)),
            Err(QuizError::InvalidTransition { .. })
        ));
        assert_eq!(controller.session().unwrap().score(), 1);
        assert!(controller.summary().is_none());
        assert!(controller.completion().is_none());
    }

    #[test]
    fn restart_twice_yields_fresh_independent_sessions() {
        let config = load_fixture("test_fixtures/mixed_question_types.json");
        let total = config.session_size();
        let mut controller = controller(config, 23);
        controller.start().unwrap();
        let question = controller.present().unwrap().clone();
        controller
            .submit_answer(&correct_submission(&question))
            .unwrap();
        controller.continue_to_next().unwrap();

        for _ in 0..2 {
            let session = controller.restart().unwrap();
            assert_eq!(session.score(), 0);
            assert_eq!(session.current_index(), 0);
            assert!(session.answer_log().is_empty());
            assert_eq!(session.total(), total);
            assert_eq!(controller.phase(), QuizPhase::Presenting(0));
            assert!(controller.last_feedback().is_none());
        }
    }

    #[test]
    fn questions_to_show_limits_the_session() {
        let mut config = load_fixture("test_fixtures/mixed_question_types.json");
        config.questions_to_show = 2;
        let mut controller = controller(config, 3);
        assert_eq!(controller.start().unwrap().total(), 2);
    }
}
