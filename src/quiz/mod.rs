pub mod controller;
pub mod error;
pub mod handlers;
pub mod question;
pub mod selector;
pub mod session;
pub mod shuffler;
pub mod summary;

pub use controller::{Advance, CompletionRecord, Feedback, QuizController, QuizPhase};
pub use error::{QuizError, ValidationError};
pub use handlers::{
    Arrangement, Interaction, Marking, OptionMark, Presentation, PresentedQuestion, Submission,
};
pub use question::QuizConfig;
