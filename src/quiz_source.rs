use crate::quiz::QuizConfig;
use color_eyre::eyre::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Outcome of reading a quiz file. Errors are kept as text so the app can show them and carry on.
#[derive(Debug)]
pub struct QuizLoad {
    pub path: PathBuf,
    pub quiz_name: String,
    pub config: Option<QuizConfig>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct QuizSource {
    path: PathBuf,
}

impl QuizSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the quiz file. A non-zero `questions_to_show_override` replaces the
    /// file's own `questionsToShow`.
    pub fn load(&self, questions_to_show_override: usize) -> QuizLoad {
        let quiz_name = quiz_name_for(&self.path);
        match Self::read_config(&self.path) {
            Ok(parsed) => {
                let questions_to_show = if questions_to_show_override > 0 {
                    questions_to_show_override
                } else {
                    parsed.questions_to_show
                };
                let config = QuizConfig::new(parsed.all_questions, questions_to_show);
                let warnings = config.lint();
                QuizLoad {
                    path: self.path.clone(),
                    quiz_name,
                    config: Some(config),
                    warnings,
                    error: None,
                }
            }
            Err(err) => QuizLoad {
                path: self.path.clone(),
                quiz_name,
                config: None,
                warnings: Vec::new(),
                error: Some(format!("{:#}", err)),
            },
        }
    }

    fn read_config(path: &Path) -> Result<QuizConfig> {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read quiz file at {}", path.display()))?;
        serde_json::from_str(&contents)
            .wrap_err_with(|| format!("failed to parse quiz file at {}", path.display()))
    }
}

/// Name reported with saved results: the file stem in upper case, e.g. `quizzes/1a.json` -> `1A`.
pub fn quiz_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(filename: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(filename)
    }

    #[test]
    fn loads_fixture_and_applies_override() {
        let load = QuizSource::new(fixture("test_fixtures/mixed_question_types.json")).load(3);
        assert!(load.error.is_none(), "unexpected error: {:?}", load.error);
        assert!(load.warnings.is_empty(), "unexpected warnings: {:?}", load.warnings);
        let config = load.config.unwrap();
        assert_eq!(config.all_questions.len(), 6);
        assert_eq!(config.questions_to_show, 3);
        assert_eq!(load.quiz_name, "MIXED_QUESTION_TYPES");
    }

    #[test]
    fn missing_file_is_reported_not_raised() {
        let load = QuizSource::new(fixture("test_fixtures/does_not_exist.json")).load(0);
        assert!(load.config.is_none());
        let error = load.error.unwrap();
        assert!(error.contains("failed to read quiz file"), "{}", error);
    }

    #[test]
    fn quiz_names_come_from_the_file_stem() {
        assert_eq!(quiz_name_for(Path::new("nivo1/1a.json")), "1A");
        assert_eq!(quiz_name_for(Path::new("")), "UNKNOWN");
    }
}
