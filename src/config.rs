use color_eyre::eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::{
    env, fs, io,
    path::PathBuf,
    sync::{OnceLock, RwLock},
};

/// Globally accessible application configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_quiz_file_value")]
    pub quiz_file: String,
    /// Replaces the quiz file's `questionsToShow` when non-zero.
    #[serde(default)]
    pub questions_to_show_override: usize,
    #[serde(default)]
    pub save_results: bool,
    #[serde(default = "default_results_api_url_value")]
    pub results_api_url: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
}

impl AppConfig {
    fn normalize(&mut self) {
        if self.quiz_file.trim().is_empty() {
            self.quiz_file = DEFAULT_QUIZ_FILE.to_string();
        }
        if self.results_api_url.trim().is_empty() {
            self.results_api_url = DEFAULT_RESULTS_API_URL.to_string();
        }
        self.results_api_url = self.results_api_url.trim_end_matches('/').to_string();
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(RESULTS_URL_ENV) {
            if !url.trim().is_empty() {
                self.results_api_url = url.trim().to_string();
            }
        }
    }

    pub fn has_user(&self) -> bool {
        !self.user_id.trim().is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quiz_file: DEFAULT_QUIZ_FILE.to_string(),
            questions_to_show_override: 0,
            save_results: false,
            results_api_url: DEFAULT_RESULTS_API_URL.to_string(),
            user_id: String::new(),
            user_name: String::new(),
        }
    }
}

const DEFAULT_QUIZ_FILE: &str = "quizzes/sample.json";
const DEFAULT_RESULTS_API_URL: &str = "http://localhost:8080/api/v1";
const RESULTS_URL_ENV: &str = "QUIZFLOW_RESULTS_URL";
const CONFIG_FILE_PATH: &str = "config/app_config.toml";

static APP_CONFIG: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn config_lock() -> &'static RwLock<AppConfig> {
    APP_CONFIG.get_or_init(|| RwLock::new(AppConfig::default()))
}

/// Attempt to load configuration from disk. If loading fails, the in-memory config will be reset to defaults
/// and the error will be returned for the caller to surface if desired.
pub fn initialize() -> Result<()> {
    let (mut config, result) = match load_config_from_disk() {
        Ok(config) => (config, Ok(())),
        Err(err) => (AppConfig::default(), Err(err)),
    };
    config.apply_env_overrides();
    config.normalize();
    match config_lock().write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
    result
}

/// Retrieve a clone of the current configuration.
pub fn current() -> AppConfig {
    match config_lock().read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Apply the provided mutation to the in-memory configuration and persist the result to disk.
pub fn update<F>(mutator: F) -> Result<AppConfig>
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = config_lock()
        .write()
        .map_err(|_| eyre!("configuration lock poisoned"))?;
    mutator(&mut config);
    config.normalize();
    save_config_to_disk(&config)?;
    Ok(config.clone())
}

/// Path to the configuration file used for persistence.
pub fn config_file_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_PATH)
}

fn load_config_from_disk() -> Result<AppConfig> {
    let path = config_file_path();
    match fs::read_to_string(&path) {
        Ok(contents) => parse_config(&contents)
            .wrap_err_with(|| format!("failed to parse configuration at {}", path.display())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => Err(eyre!(format!(
            "failed to read configuration at {}: {}",
            path.display(),
            err
        ))),
    }
}

fn parse_config(contents: &str) -> Result<AppConfig> {
    let mut config: AppConfig = toml::from_str(contents)?;
    config.normalize();
    Ok(config)
}

fn save_config_to_disk(config: &AppConfig) -> Result<()> {
    let path = config_file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).wrap_err_with(|| {
            format!(
                "failed to create configuration directory {}",
                parent.display()
            )
        })?;
    }
    let serialized =
        toml::to_string_pretty(config).wrap_err("failed to serialize configuration to TOML")?;
    fs::write(&path, serialized)
        .wrap_err_with(|| format!("failed to write configuration to {}", path.display()))
}

fn default_quiz_file_value() -> String {
    DEFAULT_QUIZ_FILE.to_string()
}

fn default_results_api_url_value() -> String {
    DEFAULT_RESULTS_API_URL.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigField {
    QuestionsToShow,
    SaveResults,
}

/// Editable copy of the configuration shown in the config view.
#[derive(Debug, Clone)]
pub struct ConfigForm {
    pub(crate) questions_to_show_override: usize,
    pub(crate) save_results: bool,
    field: ConfigField,
    pub(crate) dirty: bool,
    pub(crate) status: Option<String>,
}

impl ConfigForm {
    pub(crate) fn from_config(config: AppConfig) -> Self {
        Self {
            questions_to_show_override: config.questions_to_show_override,
            save_results: config.save_results,
            field: ConfigField::QuestionsToShow,
            dirty: false,
            status: None,
        }
    }

    pub(crate) fn selected_index(&self) -> usize {
        match self.field {
            ConfigField::QuestionsToShow => 0,
            ConfigField::SaveResults => 1,
        }
    }

    pub(crate) fn select_next(&mut self) {
        self.field = match self.field {
            ConfigField::QuestionsToShow => ConfigField::SaveResults,
            ConfigField::SaveResults => ConfigField::QuestionsToShow,
        };
    }

    pub(crate) fn select_previous(&mut self) {
        self.select_next();
    }

    pub(crate) fn adjust_current(&mut self, delta: isize) {
        if delta == 0 {
            return;
        }

        match self.field {
            ConfigField::SaveResults => {
                self.save_results = !self.save_results;
                self.dirty = true;
                self.status = None;
            }
            ConfigField::QuestionsToShow => {
                let current = self.questions_to_show_override as isize;
                let updated = (current + delta).max(0) as usize;
                if updated != self.questions_to_show_override {
                    self.questions_to_show_override = updated;
                    self.dirty = true;
                    self.status = None;
                }
            }
        }
    }

    pub(crate) fn apply_saved(&mut self, config: AppConfig) {
        self.questions_to_show_override = config.questions_to_show_override;
        self.save_results = config.save_results;
        self.dirty = false;
        self.status = None;
    }

    pub(crate) fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = Some(status.into());
    }
}
