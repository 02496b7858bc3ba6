use crate::{
    App, AppView,
    config::{self, ConfigForm},
    log_util::log_debug,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) struct ConfigManager<'a> {
    app: &'a mut App,
}

impl<'a> ConfigManager<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub(crate) fn show_config(&mut self) {
        self.app.config_form = ConfigForm::from_config(config::current());
        self.app
            .config_form
            .set_status("Set questions per session (0 keeps the quiz file's count) and result saving. Saving reloads the quiz.");
        self.app.view = AppView::Config;
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => {
                self.app.config_form.select_next();
            }
            (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => {
                self.app.config_form.select_previous();
            }
            (KeyModifiers::NONE, KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-')) => {
                self.app.config_form.adjust_current(-1);
            }
            (
                KeyModifiers::NONE,
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') | KeyCode::Char('='),
            ) => {
                self.app.config_form.adjust_current(1);
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) | (KeyModifiers::NONE, KeyCode::Enter) => {
                self.save_config_changes();
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => self.reset_config_form(),
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.app.return_to_menu(),
            _ => {}
        }
    }

    fn save_config_changes(&mut self) {
        if !self.app.config_form.dirty {
            self.app
                .config_form
                .set_status("Nothing changed; the loaded quiz is unchanged.");
            return;
        }

        let target_override = self.app.config_form.questions_to_show_override;
        let target_save = self.app.config_form.save_results;

        match config::update(|config| {
            config.questions_to_show_override = target_override;
            config.save_results = target_save;
        }) {
            Ok(updated) => {
                self.app.config_form.apply_saved(updated);
                self.app.reload_quiz();
                let status = reload_status(
                    &self.app.quiz_name,
                    self.app.controller.config().map(|quiz| quiz.session_size()),
                    self.app.config_form.save_results,
                );
                log_debug(&format!("App: configuration saved; {}", status));
                self.app.config_form.set_status(status);
            }
            Err(err) => {
                App::push_error(
                    &mut self.app.error,
                    format!("Failed to save configuration: {}", err),
                );
                self.app
                    .config_form
                    .set_status("Failed to save configuration. Check error panel.");
                log_debug(&format!("App: failed to save configuration: {}", err));
            }
        }
    }

    fn reset_config_form(&mut self) {
        let current = config::current();
        self.app.config_form = ConfigForm::from_config(current);
        self.app
            .config_form
            .set_status("Reverted to the saved quiz settings.");
    }
}

/// Status line shown after saving, describing the session the next start will run.
fn reload_status(quiz_name: &str, session_size: Option<usize>, save_results: bool) -> String {
    let saving = if save_results {
        "results will be saved"
    } else {
        "results stay local"
    };
    match session_size {
        Some(size) => format!(
            "Saved. {} reloaded with {} question(s) per session; {}.",
            quiz_name, size, saving
        ),
        None => format!("Saved, but {} could not be reloaded. Check error panel.", quiz_name),
    }
}
