use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::feedback::{self, Feedback};
use crate::session::quiz::Quiz;
use crate::ui::layout::truncate;
use crate::ui::theme::Theme;

/// Compact index of the visible questions, one row each.
pub struct QuestionList<'a> {
    quiz: &'a Quiz,
    selected: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QuestionList<'a> {
    pub fn new(quiz: &'a Quiz, selected: usize, focused: bool, theme: &'a Theme) -> Self {
        Self {
            quiz,
            selected,
            focused,
            theme,
        }
    }
}

impl Widget for QuestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let questions = self.quiz.active_questions();

        let block = Block::bordered()
            .title(format!(" Questions ({}) ", questions.len()))
            .border_style(Style::default().fg(if self.focused {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width < 4 {
            return;
        }

        let height = inner.height as usize;
        let offset = self.selected.saturating_sub(height.saturating_sub(1));
        let text_width = (inner.width as usize).saturating_sub(3);

        let lines: Vec<Line> = questions
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, q)| {
                let selected = self.quiz.selected(&q.id);
                let (marker, marker_style) = match self.quiz.feedback_for(q) {
                    Feedback::Revealed { correct: true } => {
                        ("✓", Style::default().fg(colors.success()))
                    }
                    Feedback::Revealed { correct: false } => {
                        ("✗", Style::default().fg(colors.error()))
                    }
                    Feedback::Hidden if selected.is_some() => {
                        ("●", Style::default().fg(colors.option_picked()))
                    }
                    Feedback::Hidden => ("○", Style::default().fg(colors.text_dim())),
                };
                let missed = feedback::is_missed(
                    self.quiz.mode(),
                    self.quiz.submitted(),
                    selected,
                    q.answer_index,
                );
                let mut row_style = Style::default().fg(if missed {
                    colors.error()
                } else {
                    colors.fg()
                });
                if i == self.selected {
                    row_style = row_style.bg(colors.accent_dim()).add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(format!(" {marker} "), marker_style),
                    Span::styled(truncate(&q.prompt, text_width), row_style),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
