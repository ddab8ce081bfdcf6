use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::feedback::{self, Feedback, OptionMark};
use crate::repository::Question;
use crate::session::Mode;
use crate::session::quiz::Quiz;
use crate::ui::layout::wrap_text;
use crate::ui::theme::Theme;

/// One question with its options, feedback and review action.
pub struct QuestionCard<'a> {
    question: &'a Question,
    quiz: &'a Quiz,
    theme: &'a Theme,
    position: (usize, usize),
    option_cursor: Option<usize>,
    focused: bool,
}

impl<'a> QuestionCard<'a> {
    pub fn new(question: &'a Question, quiz: &'a Quiz, theme: &'a Theme) -> Self {
        Self {
            question,
            quiz,
            theme,
            position: (1, 1),
            option_cursor: None,
            focused: false,
        }
    }

    /// 1-based position in the visible list.
    pub fn position(mut self, index: usize, total: usize) -> Self {
        self.position = (index + 1, total);
        self
    }

    pub fn option_cursor(mut self, cursor: Option<usize>) -> Self {
        self.option_cursor = cursor;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn is_missed(&self) -> bool {
        feedback::is_missed(
            self.quiz.mode(),
            self.quiz.submitted(),
            self.quiz.selected(&self.question.id),
            self.question.answer_index,
        )
    }

    fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let q = self.question;
        let selected = self.quiz.selected(&q.id);
        let fb = self.quiz.feedback_for(q);
        let locked = self.quiz.options_locked();

        let mut lines = Vec::new();
        for row in wrap_text(&q.prompt, width) {
            lines.push(Line::from(Span::styled(
                row,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(Line::from(""));

        let option_width = width.saturating_sub(6).max(1);
        for (i, option) in q.options.iter().enumerate() {
            let mark = feedback::option_mark(fb, selected, i, q.answer_index);
            let (glyph, style) = match mark {
                OptionMark::Plain => ("  ", Style::default().fg(colors.fg())),
                OptionMark::Picked => (
                    "● ",
                    Style::default()
                        .fg(colors.option_picked())
                        .add_modifier(Modifier::BOLD),
                ),
                OptionMark::Correct => (
                    "✓ ",
                    Style::default()
                        .fg(colors.option_correct())
                        .bg(colors.option_correct_bg()),
                ),
                OptionMark::Incorrect => (
                    "✗ ",
                    Style::default()
                        .fg(colors.option_incorrect())
                        .bg(colors.option_incorrect_bg()),
                ),
            };
            let style = if locked && mark == OptionMark::Plain {
                style.fg(colors.text_dim())
            } else {
                style
            };
            let cursor = if self.focused && self.option_cursor == Some(i) {
                Span::styled("›", Style::default().fg(colors.border_focused()))
            } else {
                Span::raw(" ")
            };

            for (row_idx, row) in wrap_text(option, option_width).into_iter().enumerate() {
                let lead = if row_idx == 0 {
                    format!("{}. ", i + 1)
                } else {
                    "   ".to_string()
                };
                let glyph = if row_idx == 0 { glyph } else { "  " };
                lines.push(Line::from(vec![
                    if row_idx == 0 { cursor.clone() } else { Span::raw(" ") },
                    Span::styled(lead, Style::default().fg(colors.text_dim())),
                    Span::styled(format!("{glyph}{row}"), style),
                ]));
            }
        }

        if q.options.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (no options)",
                Style::default().fg(colors.warning()),
            )));
        } else if q.answer_index >= q.options.len() {
            lines.push(Line::from(Span::styled(
                "  (answer index out of range)",
                Style::default().fg(colors.warning()),
            )));
        }

        if let Feedback::Revealed { correct } = fb {
            lines.push(Line::from(""));
            let verdict = if correct {
                Span::styled(
                    "Correct!",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    "Incorrect.",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )
            };
            lines.push(Line::from(verdict));
            if !q.explanation.trim().is_empty() {
                for row in wrap_text(&q.explanation, width) {
                    lines.push(Line::from(Span::styled(
                        row,
                        Style::default().fg(colors.text_dim()),
                    )));
                }
            }
            if !q.refs.trim().is_empty() {
                for row in wrap_text(&format!("Ref: {}", q.refs), width) {
                    lines.push(Line::from(Span::styled(
                        row,
                        Style::default()
                            .fg(colors.text_dim())
                            .add_modifier(Modifier::ITALIC),
                    )));
                }
            }
        }

        if self.quiz.can_save_to_review(q) {
            lines.push(Line::from(""));
            if self.quiz.review().contains(&q.id) {
                lines.push(Line::from(Span::styled(
                    "Saved ✓",
                    Style::default().fg(colors.success()),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "[r] Save to review",
                    Style::default().fg(colors.accent()),
                )));
            }
        } else if self.quiz.mode() == Mode::Test && !self.quiz.submitted() && selected.is_some()
        {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Answer recorded",
                Style::default().fg(colors.text_dim()),
            )));
        }

        lines
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let q = self.question;

        let border = if self.is_missed() {
            colors.error()
        } else if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let mut title = format!(" {}/{} · {} ", self.position.0, self.position.1, q.category);
        if !q.id.is_empty() {
            title.push_str(&format!("· {} ", q.id));
        }

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height == 0 {
            return;
        }

        let padded = Rect::new(inner.x + 1, inner.y, inner.width - 2, inner.height);
        let lines = self.lines(padded.width as usize);

        // Keep the option cursor visible on short terminals.
        let scroll = match self.option_cursor {
            Some(cursor) => {
                let prompt_rows = wrap_text(&q.prompt, padded.width as usize).len() + 1;
                let target = prompt_rows + cursor + 1;
                target.saturating_sub(padded.height as usize) as u16
            }
            None => 0,
        };
        Paragraph::new(lines).scroll((scroll, 0)).render(padded, buf);
    }
}
