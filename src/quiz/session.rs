use super::handlers::PresentedQuestion;
use chrono::{DateTime, Utc};

/// State of one quiz run. Only the controller mutates it.
#[derive(Debug, Clone)]
pub struct SessionState {
    selected: Vec<PresentedQuestion>,
    current_index: usize,
    score: usize,
    answer_log: Vec<bool>,
    started_at: DateTime<Utc>,
}

impl SessionState {
    pub(crate) fn new(selected: Vec<PresentedQuestion>, started_at: DateTime<Utc>) -> Self {
        let answer_log = Vec::with_capacity(selected.len());
        Self {
            selected,
            current_index: 0,
            score: 0,
            answer_log,
            started_at,
        }
    }

    pub fn selected(&self) -> &[PresentedQuestion] {
        &self.selected
    }

    pub fn total(&self) -> usize {
        self.selected.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        self.selected.get(self.current_index)
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Correctness of each answered question, in session order.
    pub fn answer_log(&self) -> &[bool] {
        &self.answer_log
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.selected.len()
    }

    /// Record the outcome for the current question. Ignored if it was already recorded.
    pub(crate) fn record(&mut self, is_correct: bool) {
        if self.answer_log.len() != self.current_index {
            return;
        }
        self.answer_log.push(is_correct);
        if is_correct {
            self.score += 1;
        }
    }

    pub(crate) fn advance(&mut self) {
        if self.current_index < self.selected.len() {
            self.current_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::handlers::{Presentation, StandardView};

    fn session(size: usize) -> SessionState {
        let question = PresentedQuestion {
            prompt: "q".to_string(),
            explanation: String::new(),
            presentation: Presentation::Standard(StandardView {
                options: vec!["a".to_string()],
                answer: "a".to_string(),
            }),
        };
        SessionState::new(vec![question; size], Utc::now())
    }

    #[test]
    fn each_question_scores_at_most_once() {
        let mut state = session(2);
        state.record(true);
        state.record(true);
        assert_eq!(state.score(), 1);
        assert_eq!(state.answer_log(), &[true]);
    }

    #[test]
    fn index_stops_at_total() {
        let mut state = session(2);
        for _ in 0..5 {
            state.advance();
        }
        assert_eq!(state.current_index(), 2);
        assert!(state.is_complete());
        assert!(state.current_question().is_none());
    }
}
