use crate::{
    App, AppView,
    answer_draft::AnswerDraft,
    config,
    log_util::log_debug,
    quiz::{Advance, QuizError, QuizPhase, ValidationError},
    results_client::{self, ResultsClient},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) struct QuizManager<'a> {
    app: &'a mut App,
}

impl<'a> QuizManager<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Begin a fresh session. Any previous session is discarded.
    pub(crate) fn start_quiz(app: &mut App) {
        let mut manager = QuizManager::new(app);
        manager.app.save_receiver = None;
        manager.app.save_status = None;
        manager.app.notice = None;

        match manager.app.controller.restart() {
            Ok(session) => {
                log_debug(&format!(
                    "Quiz: started session of {} question(s) from {}",
                    session.total(),
                    manager.app.quiz_path.display()
                ));
                manager.app.view = AppView::Quiz;
                manager.present_current();
            }
            Err(err) => {
                log_debug(&format!("Quiz: failed to start session: {}", err));
                App::push_error(&mut manager.app.error, format!("Cannot start quiz: {}", err));
                manager.app.view = AppView::Menu;
            }
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        match self.app.controller.phase() {
            QuizPhase::Feedback(_) => self.continue_quiz(),
            QuizPhase::Finished => match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('r') | KeyCode::Char('R')) => {
                    QuizManager::start_quiz(self.app)
                }
                (KeyModifiers::NONE, KeyCode::Char('m')) => self.app.return_to_menu(),
                _ => {}
            },
            QuizPhase::Presenting(_) | QuizPhase::AwaitingGrading(_) => {
                self.handle_answer_key(key)
            }
            QuizPhase::Uninitialized => {
                if let (KeyModifiers::NONE, KeyCode::Char('m')) = (key.modifiers, key.code) {
                    self.app.return_to_menu();
                }
            }
        }
    }

    fn handle_answer_key(&mut self, key: KeyEvent) {
        let Some(question) = self.app.controller.current_question().cloned() else {
            return;
        };
        let draft = &mut self.app.draft;
        match (key.modifiers, key.code) {
            (KeyModifiers::SHIFT, KeyCode::Up) | (_, KeyCode::Char('K')) => draft.move_item_up(),
            (KeyModifiers::SHIFT, KeyCode::Down) | (_, KeyCode::Char('J')) => {
                draft.move_item_down()
            }
            (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
                draft.cursor_next(&question)
            }
            (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
                draft.cursor_previous(&question)
            }
            (KeyModifiers::NONE, KeyCode::Right | KeyCode::Char('l')) => {
                draft.cycle_pick(&question, true)
            }
            (KeyModifiers::NONE, KeyCode::Left | KeyCode::Char('h')) => {
                draft.cycle_pick(&question, false)
            }
            (KeyModifiers::NONE, KeyCode::Char(' ')) => draft.toggle_checked(),
            (KeyModifiers::NONE, KeyCode::Enter) => self.submit(),
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.app.return_to_menu(),
            _ => {}
        }
    }

    pub(crate) fn submit(&mut self) {
        let Some(submission) = self
            .app
            .controller
            .current_question()
            .and_then(|question| self.app.draft.to_submission(question))
        else {
            return;
        };

        match self.app.controller.submit_answer(&submission) {
            Ok(feedback) => {
                self.app.notice = None;
                log_debug(&format!(
                    "Quiz: graded {} answer for question {} (correct: {})",
                    submission.question_type().label(),
                    self.question_number(),
                    feedback.is_correct
                ));
            }
            Err(QuizError::Validation(err)) => {
                log_debug(&format!(
                    "Quiz: rejected submission for question {}: {}",
                    self.question_number(),
                    err
                ));
                self.app.notice = Some(validation_prompt(&err));
            }
            Err(err) => {
                log_debug(&format!("Quiz: submission failed: {}", err));
                App::push_error(&mut self.app.error, err.to_string());
            }
        }
    }

    pub(crate) fn continue_quiz(&mut self) {
        match self.app.controller.continue_to_next() {
            Ok(Advance::Next(index)) => {
                log_debug(&format!("Quiz: moved to question {}", index + 1));
                self.present_current();
            }
            Ok(Advance::Finished) => self.finish(),
            Err(err) => log_debug(&format!("Quiz: continue ignored: {}", err)),
        }
    }

    fn present_current(&mut self) {
        match self.app.controller.present() {
            Ok(question) => {
                self.app.draft = AnswerDraft::for_question(Some(question));
            }
            Err(err) => {
                self.app.draft = AnswerDraft::Empty;
                log_debug(&format!("Quiz: nothing to present: {}", err));
            }
        }
        self.app.notice = None;
    }

    fn finish(&mut self) {
        self.app.draft = AnswerDraft::Empty;
        let Some(record) = self.app.controller.completion() else {
            return;
        };
        if let Some(summary) = self.app.controller.summary() {
            log_debug(&format!(
                "Quiz: finished with {}/{} ({}%, {})",
                summary.score,
                summary.total,
                summary.percentage,
                summary.tier.label()
            ));
        }

        let settings = config::current();
        if settings.save_results {
            self.app.save_receiver = Some(results_client::spawn_save(
                ResultsClient::from_config(&settings),
                self.app.quiz_name.clone(),
                record,
            ));
            self.app.save_status = Some("Saving result…".to_string());
        } else {
            self.app.save_status = Some("Result saving is disabled.".to_string());
        }
    }

    fn question_number(&self) -> usize {
        self.app
            .controller
            .session()
            .map(|session| session.current_index() + 1)
            .unwrap_or(0)
    }
}

fn validation_prompt(err: &ValidationError) -> String {
    match err {
        ValidationError::NoSelection => "Select at least one answer before submitting.".to_string(),
        ValidationError::IncompletePairing => "Pair every item before submitting.".to_string(),
        other => format!("Cannot submit: {}.", other),
    }
}
