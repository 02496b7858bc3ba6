use crate::view_managers::menu_manager::MENU_OPTIONS;
use crate::{
    App, AppView,
    answer_draft::AnswerDraft,
    config,
    quiz::{Feedback, Interaction, Marking, OptionMark, Presentation, PresentedQuestion, QuizPhase},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

const UNPAIRED_LABEL: &str = "-- choose --";

pub(crate) struct UiRenderer<'a> {
    app: &'a mut App,
}

impl<'a> UiRenderer<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub(crate) fn render(&mut self, frame: &mut Frame) {
        match self.app.view {
            AppView::Menu => self.render_menu(frame),
            AppView::Quiz => match self.app.controller.phase() {
                QuizPhase::Finished => self.render_results(frame),
                _ => self.render_quiz(frame),
            },
            AppView::Config => self.render_config(frame),
        }
    }

    fn render_menu(&mut self, frame: &mut Frame) {
        let app = &mut *self.app;
        let layout = Self::standard_layout(frame.area());

        frame.render_widget(
            Paragraph::new(Self::header_text(app))
                .block(Block::bordered().title(Self::header_title(app)))
                .centered(),
            layout[0],
        );

        let items: Vec<ListItem> = MENU_OPTIONS
            .iter()
            .map(|label| ListItem::new(*label))
            .collect();
        let mut list_state = ListState::default();
        list_state.select(Some(app.menu_index));

        frame.render_stateful_widget(
            List::new(items)
                .block(Block::bordered().title(Line::from("Actions")))
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            layout[1],
            &mut list_state,
        );

        let mut status_lines = Vec::new();
        if let Some(error) = &app.error {
            status_lines.push(format!("Error: {}", error));
        }
        status_lines.push("Use ↑/↓ or j/k to choose. Press Enter to select.".to_string());
        status_lines.push("Press 1 or 2 for quick selection. Esc, Ctrl-C, or q to quit.".to_string());

        frame.render_widget(
            Paragraph::new(status_lines.join("\n"))
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Status"))),
            layout[2],
        );
    }

    fn render_quiz(&mut self, frame: &mut Frame) {
        let app = &*self.app;
        let outer = Self::standard_layout(frame.area());

        frame.render_widget(
            Paragraph::new(Self::progress_text(app))
                .block(Block::bordered().title(Self::header_title(app)))
                .centered(),
            outer[0],
        );

        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(4),
            ])
            .split(outer[1]);

        let (answered, total) = app
            .controller
            .session()
            .map(|session| (session.answer_log().len(), session.total()))
            .unwrap_or((0, 0));
        let ratio = if total == 0 {
            0.0
        } else {
            answered as f64 / total as f64
        };
        frame.render_widget(
            Gauge::default()
                .block(Block::bordered().title(Line::from("Progress")))
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(format!("{}/{}", answered, total)),
            body[0],
        );

        let Some(question) = app.controller.current_question() else {
            frame.render_widget(
                Paragraph::new("No question to show. Press m to return to the menu.")
                    .block(Block::bordered().title(Line::from("Question"))),
                body[1],
            );
            Self::render_quiz_status(app, frame, outer[2]);
            return;
        };

        frame.render_widget(
            Paragraph::new(question.prompt.as_str())
                .wrap(Wrap { trim: false })
                .block(
                    Block::bordered()
                        .title(Line::from(format!("{} question", question.question_type().label()))),
                ),
            body[1],
        );

        let feedback = match app.controller.phase() {
            QuizPhase::Feedback(_) => app.controller.last_feedback(),
            _ => None,
        };
        let items = Self::answer_items(question, &app.draft, feedback);
        let mut list_state = ListState::default();
        if feedback.is_none() && !items.is_empty() {
            list_state.select(Some(app.draft.cursor()));
        }

        frame.render_stateful_widget(
            List::new(items)
                .block(Block::bordered().title(Line::from("Answers")))
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            body[2],
            &mut list_state,
        );

        Self::render_quiz_status(app, frame, outer[2]);

        if let Some(feedback) = feedback {
            Self::render_feedback_overlay(feedback, frame);
        }
    }

    fn answer_items(
        question: &PresentedQuestion,
        draft: &AnswerDraft,
        feedback: Option<&Feedback>,
    ) -> Vec<ListItem<'static>> {
        let marking = feedback.map(|feedback| &feedback.grade.marking);
        match (&question.presentation, draft) {
            (Presentation::Standard(view), _) => view
                .options
                .iter()
                .map(|option| {
                    let mark = match marking {
                        Some(Marking::Standard { chosen, correct }) => {
                            if option == correct {
                                Some(true)
                            } else if option == chosen {
                                Some(false)
                            } else {
                                None
                            }
                        }
                        _ => None,
                    };
                    Self::marked_item(option.clone(), mark)
                })
                .collect(),
            (Presentation::Checkbox(view), AnswerDraft::Checkbox { checked, .. }) => view
                .options
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let is_checked = checked.get(index).copied().unwrap_or(false);
                    let text = format!("[{}] {}", if is_checked { "x" } else { " " }, option);
                    let mark = match marking {
                        Some(Marking::Checkbox(marks)) => match marks.get(index) {
                            Some(OptionMark::Correct) => Some(true),
                            Some(OptionMark::Incorrect) => Some(false),
                            Some(OptionMark::Unmarked) | None => None,
                        },
                        _ => None,
                    };
                    Self::marked_item(text, mark)
                })
                .collect(),
            (Presentation::Reorder(view), AnswerDraft::Reorder { arrangement, .. }) => view
                .arranged(arrangement)
                .into_iter()
                .enumerate()
                .map(|(slot, item)| {
                    let mark = match marking {
                        Some(Marking::Reorder(slots)) => slots.get(slot).copied(),
                        _ => None,
                    };
                    Self::marked_item(format!("{}. {}", slot + 1, item.text), mark)
                })
                .collect(),
            (Presentation::Match(view), AnswerDraft::Match { picks, .. }) => view
                .lefts()
                .enumerate()
                .map(|(row, left)| {
                    let pick = picks
                        .get(row)
                        .copied()
                        .flatten()
                        .and_then(|index| view.choices.get(index))
                        .map(String::as_str)
                        .unwrap_or(UNPAIRED_LABEL);
                    let mark = match marking {
                        Some(Marking::Match(rows)) => rows.get(row).copied(),
                        _ => None,
                    };
                    Self::marked_item(format!("{}  →  {}", left, pick), mark)
                })
                .collect(),
            _ => vec![ListItem::new("Preparing answers…")],
        }
    }

    fn marked_item(text: String, mark: Option<bool>) -> ListItem<'static> {
        match mark {
            Some(true) => ListItem::new(format!("✓ {}", text)).style(Style::default().fg(Color::Green)),
            Some(false) => ListItem::new(format!("✗ {}", text)).style(Style::default().fg(Color::Red)),
            None => ListItem::new(format!("  {}", text)),
        }
    }

    fn render_quiz_status(app: &App, frame: &mut Frame, area: Rect) {
        let mut status_lines = Vec::new();
        if let Some(error) = &app.error {
            status_lines.push(format!("Error: {}", error));
        }
        if let Some(notice) = &app.notice {
            status_lines.push(notice.clone());
        }
        match app.controller.current_question() {
            Some(question) => {
                let hint = match &question.presentation {
                    Presentation::Standard(_) => "↑/↓ choose an answer.",
                    Presentation::Checkbox(_) => "↑/↓ move, Space to tick.",
                    Presentation::Reorder(_) => "↑/↓ move, Shift+↑/↓ or K/J to shift the item.",
                    Presentation::Match(_) => "↑/↓ choose a row, ←/→ pick a match.",
                };
                let action = match question.interaction() {
                    Interaction::Immediate => "Enter to answer.",
                    Interaction::SubmitButton => "Enter to submit.",
                };
                status_lines.push(format!("{} {}", hint, action));
            }
            None => status_lines.push("Press m to return to the menu.".to_string()),
        }
        status_lines.push("Press m for menu. Esc or Ctrl-C to quit.".to_string());

        frame.render_widget(
            Paragraph::new(status_lines.join("\n"))
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Status"))),
            area,
        );
    }

    fn render_feedback_overlay(feedback: &Feedback, frame: &mut Frame) {
        let area = Self::popup_area(frame.area(), 60, 9);
        let (headline, color) = if feedback.is_correct {
            ("✅ Correct!", Color::Green)
        } else {
            ("❌ Incorrect!", Color::Red)
        };

        let mut lines = vec![Line::from(headline).bold().fg(color).centered()];
        if !feedback.explanation.trim().is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(feedback.explanation.clone()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("Press any key to continue").italic().centered());

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Feedback"))),
            area,
        );
    }

    fn render_results(&mut self, frame: &mut Frame) {
        let app = &*self.app;
        let layout = Self::standard_layout(frame.area());

        frame.render_widget(
            Paragraph::new(format!("Quiz file: {}", app.quiz_path.display()))
                .block(Block::bordered().title(Self::header_title(app)))
                .centered(),
            layout[0],
        );

        let result_lines = match app.controller.summary() {
            Some(summary) => vec![
                Line::from(summary.tier.marker()).centered(),
                Line::from(summary.tier.label()).bold().centered(),
                Line::from(""),
                Line::from(format!(
                    "You answered {} of {} correctly ({}%).",
                    summary.score, summary.total, summary.percentage
                ))
                .centered(),
                Line::from(""),
                Line::from(summary.tier.message()).centered(),
            ],
            None => vec![Line::from("No result available for this session.").centered()],
        };

        frame.render_widget(
            Paragraph::new(result_lines)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Results"))),
            layout[1],
        );

        let mut status_lines = Vec::new();
        if let Some(error) = &app.error {
            status_lines.push(format!("Error: {}", error));
        }
        if let Some(save_status) = &app.save_status {
            status_lines.push(format!("Save: {}", save_status));
        }
        status_lines.push(
            "Press r to try again, m for menu. Esc or Ctrl-C to quit.".to_string(),
        );

        frame.render_widget(
            Paragraph::new(status_lines.join("\n"))
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Status"))),
            layout[2],
        );
    }

    fn render_config(&mut self, frame: &mut Frame) {
        let app = &mut *self.app;
        let layout = Self::standard_layout(frame.area());

        let config_path = config::config_file_path();
        let header_text = format!(
            "Config file: {}\nAdjust how many questions a session shows and whether results are saved.",
            config_path.display()
        );

        frame.render_widget(
            Paragraph::new(header_text)
                .block(Block::bordered().title(Self::header_title(app)))
                .centered(),
            layout[0],
        );

        let questions_label = if app.config_form.questions_to_show_override == 0 {
            "from quiz file".to_string()
        } else {
            app.config_form.questions_to_show_override.to_string()
        };
        let items = vec![
            ListItem::new(format!("Questions per session: {}", questions_label)),
            ListItem::new(format!(
                "Save results to API: {}",
                if app.config_form.save_results {
                    "Enabled"
                } else {
                    "Disabled"
                }
            )),
        ];

        let mut list_state = ListState::default();
        list_state.select(Some(app.config_form.selected_index()));

        frame.render_stateful_widget(
            List::new(items)
                .block(Block::bordered().title(Line::from("Defaults")))
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            layout[1],
            &mut list_state,
        );

        let mut status_lines = Vec::new();
        if let Some(error) = &app.error {
            status_lines.push(format!("Error: {}", error));
        }
        status_lines.push("↑/↓ or j/k choose field. ←/→ or h/l adjust value.".to_string());
        status_lines.push("Press s to save, r to reset, m to return to the menu.".to_string());
        if app.config_form.dirty {
            status_lines.push("Unsaved changes".to_string());
        }
        if let Some(config_status) = &app.config_form.status {
            status_lines.push(config_status.clone());
        }

        frame.render_widget(
            Paragraph::new(status_lines.join("\n"))
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Status"))),
            layout[2],
        );
    }

    fn standard_layout(area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(5),
            ])
            .split(area)
    }

    fn popup_area(area: Rect, percent_x: u16, height: u16) -> Rect {
        let width = (area.width.saturating_mul(percent_x) / 100).max(20).min(area.width);
        let height = height.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    fn header_title(app: &App) -> Line<'static> {
        Line::from(format!("Quizflow • {}", app.quiz_name))
            .bold()
            .blue()
            .centered()
    }

    fn header_text(app: &App) -> String {
        let pool_line = match app.controller.config() {
            Some(config) => format!(
                "{} question(s) in pool, {} per session",
                config.all_questions.len(),
                config.session_size()
            ),
            None => "No quiz loaded".to_string(),
        };
        format!("Quiz file: {}\n{}", app.quiz_path.display(), pool_line)
    }

    fn progress_text(app: &App) -> String {
        match app.controller.session() {
            Some(session) => format!(
                "Question {} of {}\nScore: {}",
                (session.current_index() + 1).min(session.total()),
                session.total(),
                session.score()
            ),
            None => "No session running".to_string(),
        }
    }
}
