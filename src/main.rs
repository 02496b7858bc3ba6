mod answer_draft;
mod config;
mod log_util;
mod quiz;
mod quiz_source;
mod results_client;
mod ui_renderer;
mod view_managers;

use answer_draft::AnswerDraft;
use color_eyre::Result;
use config::ConfigForm;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use dotenvy::dotenv;
use log_util::log_debug;
use quiz::QuizController;
use quiz_source::{QuizLoad, QuizSource};
use ratatui::{DefaultTerminal, Frame};
use results_client::SaveMessage;
use std::{
    env,
    path::PathBuf,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};
use ui_renderer::UiRenderer;
use view_managers::{ConfigManager, MenuManager, QuizManager};

pub(crate) const SAVE_LOADING_FRAMES: [&str; 4] = ["-", "\\", "|", "/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppView {
    Menu,
    Quiz,
    Config,
}

fn main() -> color_eyre::Result<()> {
    dotenv().ok();
    color_eyre::install()?;
    let quiz_arg = env::args().nth(1).map(PathBuf::from);
    let terminal = ratatui::init();
    let result = App::new(quiz_arg).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub(crate) running: bool,
    /// Current view being displayed.
    pub(crate) view: AppView,
    /// Currently selected index in the main menu.
    pub(crate) menu_index: usize,
    /// Quiz file the controller was built from.
    pub(crate) quiz_path: PathBuf,
    /// Name reported with saved results.
    pub(crate) quiz_name: String,
    /// Set when the quiz path came from the command line rather than configuration.
    quiz_path_pinned: bool,
    pub(crate) controller: QuizController,
    /// Input for the question on screen.
    pub(crate) draft: AnswerDraft,
    /// Any error encountered while loading files or saving results.
    pub(crate) error: Option<String>,
    /// Inline hint for the current question, e.g. an incomplete submission.
    pub(crate) notice: Option<String>,
    /// Receives the outcome of the background result save.
    pub(crate) save_receiver: Option<Receiver<SaveMessage>>,
    /// Latest status message related to result saving.
    pub(crate) save_status: Option<String>,
    /// Spinner frame index while a save is running.
    pub(crate) save_loading_frame: usize,
    /// Holds the editable configuration state when rendering the config view.
    pub(crate) config_form: ConfigForm,
}

impl App {
    /// Construct a new instance of [`App`], loading the quiz from `quiz_arg` or the configured file.
    pub fn new(quiz_arg: Option<PathBuf>) -> Self {
        let mut aggregated_error: Option<String> = None;

        if let Err(err) = config::initialize() {
            Self::push_error(
                &mut aggregated_error,
                format!("Configuration load failed: {}", err),
            );
        }
        let settings = config::current();
        let quiz_path_pinned = quiz_arg.is_some();
        let quiz_path = quiz_arg.unwrap_or_else(|| PathBuf::from(&settings.quiz_file));

        let load = QuizSource::new(&quiz_path).load(settings.questions_to_show_override);
        let (quiz_name, controller) = Self::controller_from_load(load, &mut aggregated_error);

        Self {
            running: false,
            view: AppView::Menu,
            menu_index: 0,
            quiz_path,
            quiz_name,
            quiz_path_pinned,
            controller,
            draft: AnswerDraft::Empty,
            error: aggregated_error,
            notice: None,
            save_receiver: None,
            save_status: None,
            save_loading_frame: 0,
            config_form: ConfigForm::from_config(settings),
        }
    }

    fn controller_from_load(
        load: QuizLoad,
        error: &mut Option<String>,
    ) -> (String, QuizController) {
        let QuizLoad {
            path,
            quiz_name,
            config,
            warnings,
            error: load_error,
        } = load;

        for warning in &warnings {
            log_debug(&format!("App: quiz warning in {}: {}", path.display(), warning));
        }
        match (&config, load_error) {
            (Some(config), _) => log_debug(&format!(
                "App: loaded {} question(s) from {}, showing {}",
                config.all_questions.len(),
                path.display(),
                config.session_size()
            )),
            (None, Some(load_error)) => {
                log_debug(&format!("App: quiz load failed: {}", load_error));
                Self::push_error(error, load_error);
            }
            (None, None) => {}
        }
        (quiz_name, QuizController::new(config))
    }

    /// Re-read the quiz file so configuration changes apply to the next session.
    pub(crate) fn reload_quiz(&mut self) {
        let settings = config::current();
        if !self.quiz_path_pinned {
            self.quiz_path = PathBuf::from(&settings.quiz_file);
        }
        let load = QuizSource::new(&self.quiz_path).load(settings.questions_to_show_override);
        let (quiz_name, controller) = Self::controller_from_load(load, &mut self.error);
        self.quiz_name = quiz_name;
        self.controller = controller;
        self.draft = AnswerDraft::Empty;
        self.notice = None;
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        let tick_rate = Duration::from_millis(120);
        while self.running {
            self.poll_save_messages();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(tick_rate)?;
        }
        Ok(())
    }

    /// Dispatch rendering based on the active view.
    fn render(&mut self, frame: &mut Frame) {
        UiRenderer::new(self).render(frame);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, tick_rate: Duration) -> Result<()> {
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(_) => {}
                Event::Resize(_, _) => {}
                _ => {}
            }
            self.poll_save_messages();
        } else {
            self.on_tick();
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        if self.save_receiver.is_some() {
            self.save_loading_frame = (self.save_loading_frame + 1) % SAVE_LOADING_FRAMES.len();
            let frame = SAVE_LOADING_FRAMES[self.save_loading_frame];
            self.save_status = Some(format!("{} Saving result…", frame));
        }
        self.poll_save_messages();
    }

    fn poll_save_messages(&mut self) {
        let mut clear_receiver = false;
        if let Some(receiver) = self.save_receiver.as_ref() {
            match receiver.try_recv() {
                Ok(message) => {
                    clear_receiver = true;
                    match message {
                        SaveMessage::Saved(summary) => {
                            log_debug(&format!("App: {}", summary));
                            self.save_status = Some(summary);
                        }
                        SaveMessage::Skipped(reason) => {
                            log_debug(&format!("App: result save skipped: {}", reason));
                            self.save_status = Some(reason);
                        }
                        SaveMessage::Failed(reason) => self.handle_save_error(reason),
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    clear_receiver = true;
                    self.handle_save_error("Background save worker disconnected".to_string());
                }
            }
        }

        if clear_receiver {
            self.save_receiver = None;
        }
    }

    fn handle_save_error(&mut self, message: String) {
        let trimmed = message.trim().to_string();
        log_debug(&format!("App: result save failed: {}", trimmed));
        Self::push_error(
            &mut self.error,
            format!("Saving result failed: {}", trimmed),
        );
        self.save_status = Some("Result was not saved.".to_string());
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc)
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (KeyModifiers::NONE, KeyCode::Char('q')) if self.view != AppView::Quiz => self.quit(),
            _ => match self.view {
                AppView::Menu => MenuManager::new(self).handle_menu_key(key),
                AppView::Quiz => QuizManager::new(self).handle_key(key),
                AppView::Config => ConfigManager::new(self).handle_key(key),
            },
        }
    }

    pub(crate) fn return_to_menu(&mut self) {
        if matches!(self.view, AppView::Config) {
            self.config_form = ConfigForm::from_config(config::current());
        }
        self.notice = None;
        self.view = AppView::Menu;
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }

    /// Append a message to an optional error slot.
    pub(crate) fn push_error(slot: &mut Option<String>, message: String) {
        if let Some(existing) = slot {
            existing.push_str(" | ");
            existing.push_str(&message);
        } else {
            *slot = Some(message);
        }
    }
}
