use thiserror::Error;

/// Fatal problems with the supplied quiz data. A session is never started when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no quiz configuration was supplied")]
    MissingConfig,
    #[error("the question pool is empty")]
    EmptyPool,
    #[error("cannot summarise a session with zero questions")]
    EmptySession,
}

/// A submission that breaks a question type's precondition. The question stays open for another attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no selection")]
    NoSelection,
    #[error("incomplete pairing")]
    IncompletePairing,
    #[error("arrangement must place every item exactly once")]
    InvalidArrangement,
    #[error("a {submitted} answer cannot be submitted for a {expected} question")]
    KindMismatch {
        expected: &'static str,
        submitted: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot {event} while {phase}")]
    InvalidTransition {
        event: &'static str,
        phase: &'static str,
    },
}
