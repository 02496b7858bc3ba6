use crate::quiz::{Arrangement, Presentation, PresentedQuestion, Submission};

/// In-progress input for the question on screen. Nothing here is graded until it is
/// turned into a [`Submission`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AnswerDraft {
    Empty,
    Standard {
        cursor: usize,
    },
    Checkbox {
        cursor: usize,
        checked: Vec<bool>,
    },
    Reorder {
        cursor: usize,
        arrangement: Arrangement,
    },
    Match {
        cursor: usize,
        /// Index into the shared choice list for each left item.
        picks: Vec<Option<usize>>,
    },
}

impl AnswerDraft {
    pub(crate) fn for_question(question: Option<&PresentedQuestion>) -> Self {
        let Some(question) = question else {
            return Self::Empty;
        };
        match &question.presentation {
            Presentation::Standard(_) => Self::Standard { cursor: 0 },
            Presentation::Checkbox(view) => Self::Checkbox {
                cursor: 0,
                checked: vec![false; view.options.len()],
            },
            Presentation::Reorder(view) => Self::Reorder {
                cursor: 0,
                arrangement: view.initial_arrangement(),
            },
            Presentation::Match(view) => Self::Match {
                cursor: 0,
                picks: vec![None; view.pairs.len()],
            },
        }
    }

    pub(crate) fn cursor(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Standard { cursor }
            | Self::Checkbox { cursor, .. }
            | Self::Reorder { cursor, .. }
            | Self::Match { cursor, .. } => *cursor,
        }
    }

    fn rows(&self, question: &PresentedQuestion) -> usize {
        match &question.presentation {
            Presentation::Standard(view) => view.options.len(),
            Presentation::Checkbox(view) => view.options.len(),
            Presentation::Reorder(view) => view.items.len(),
            Presentation::Match(view) => view.pairs.len(),
        }
    }

    fn cursor_mut(&mut self) -> Option<&mut usize> {
        match self {
            Self::Empty => None,
            Self::Standard { cursor }
            | Self::Checkbox { cursor, .. }
            | Self::Reorder { cursor, .. }
            | Self::Match { cursor, .. } => Some(cursor),
        }
    }

    pub(crate) fn cursor_next(&mut self, question: &PresentedQuestion) {
        let rows = self.rows(question);
        if let Some(cursor) = self.cursor_mut().filter(|_| rows > 0) {
            *cursor = (*cursor + 1) % rows;
        }
    }

    pub(crate) fn cursor_previous(&mut self, question: &PresentedQuestion) {
        let rows = self.rows(question);
        if let Some(cursor) = self.cursor_mut().filter(|_| rows > 0) {
            *cursor = if *cursor == 0 { rows - 1 } else { *cursor - 1 };
        }
    }

    pub(crate) fn toggle_checked(&mut self) {
        if let Self::Checkbox { cursor, checked } = self {
            if let Some(value) = checked.get_mut(*cursor) {
                *value = !*value;
            }
        }
    }

    /// Swap the highlighted reorder item with the one above it; the cursor follows the item.
    pub(crate) fn move_item_up(&mut self) {
        if let Self::Reorder {
            cursor,
            arrangement,
        } = self
        {
            if arrangement.move_up(*cursor) {
                *cursor -= 1;
            }
        }
    }

    pub(crate) fn move_item_down(&mut self) {
        if let Self::Reorder {
            cursor,
            arrangement,
        } = self
        {
            if arrangement.move_down(*cursor) {
                *cursor += 1;
            }
        }
    }

    /// Cycle the highlighted left item's pick through the choices and back to unpaired.
    pub(crate) fn cycle_pick(&mut self, question: &PresentedQuestion, forward: bool) {
        let Presentation::Match(view) = &question.presentation else {
            return;
        };
        let choices = view.choices.len();
        if let Self::Match { cursor, picks } = self {
            if let Some(pick) = picks.get_mut(*cursor) {
                *pick = match (*pick, forward) {
                    (None, true) if choices > 0 => Some(0),
                    (None, false) if choices > 0 => Some(choices - 1),
                    (Some(index), true) if index + 1 < choices => Some(index + 1),
                    (Some(index), false) if index > 0 => Some(index - 1),
                    _ => None,
                };
            }
        }
    }

    pub(crate) fn to_submission(&self, question: &PresentedQuestion) -> Option<Submission> {
        match (self, &question.presentation) {
            (Self::Standard { cursor }, Presentation::Standard(view)) => view
                .options
                .get(*cursor)
                .map(|option| Submission::Standard(option.clone())),
            (Self::Checkbox { checked, .. }, Presentation::Checkbox(view)) => {
                Some(Submission::Checkbox(
                    view.options
                        .iter()
                        .zip(checked)
                        .filter(|(_, checked)| **checked)
                        .map(|(option, _)| option.clone())
                        .collect(),
                ))
            }
            (Self::Reorder { arrangement, .. }, Presentation::Reorder(_)) => {
                Some(Submission::Reorder(arrangement.clone()))
            }
            (Self::Match { picks, .. }, Presentation::Match(view)) => Some(Submission::Match(
                picks
                    .iter()
                    .map(|pick| pick.and_then(|index| view.choices.get(index).cloned()))
                    .collect(),
            )),
            _ => None,
        }
    }
}
