use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::quiz::Quiz;
use crate::ui::layout::truncate;
use crate::ui::theme::Theme;

/// Category chips in one scrolling row, or a one-line summary when compact.
pub struct CategoryBar<'a> {
    quiz: &'a Quiz,
    cursor: Option<usize>,
    theme: &'a Theme,
    compact: bool,
}

impl<'a> CategoryBar<'a> {
    pub fn new(quiz: &'a Quiz, cursor: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            quiz,
            cursor,
            theme,
            compact: false,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    fn summary_spans(&self, cursor: Option<usize>, width: usize) -> Vec<Span<'a>> {
        let colors = &self.theme.colors;
        let categories = self.quiz.categories();
        let mut spans = Vec::new();
        let mut used = 0;

        if let Some(c) = cursor {
            let category = &categories[c];
            let mut style = if self.quiz.is_category_selected(category) {
                Style::default()
                    .fg(colors.chip_selected_fg())
                    .bg(colors.chip_selected_bg())
            } else {
                Style::default().fg(colors.fg()).bg(colors.accent_dim())
            };
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            let position = format!("{}/{} ", c + 1, categories.len());
            let chip = truncate(
                &format!(" {category} "),
                width.saturating_sub(position.chars().count() + 1),
            );
            used += position.chars().count() + chip.chars().count() + 1;
            spans.push(Span::styled(position, Style::default().fg(colors.text_dim())));
            spans.push(Span::styled(chip, style));
            spans.push(Span::raw(" "));
        }

        let selected = self.quiz.selected_categories();
        let summary = if selected.is_empty() {
            "all categories".to_string()
        } else {
            let names: Vec<&str> = selected.iter().map(String::as_str).collect();
            format!("on: {}", names.join(", "))
        };
        spans.push(Span::styled(
            truncate(&summary, width.saturating_sub(used)),
            Style::default().fg(colors.text_dim()),
        ));
        spans
    }
}

/// First chip to draw so the chip at `cursor` fits in `width` columns,
/// counting the scroll marker drawn when `start > 0`.
fn first_visible(widths: &[usize], cursor: usize, width: usize) -> usize {
    let mut start = 0;
    loop {
        let marker = usize::from(start > 0);
        let used: usize = widths[start..=cursor].iter().map(|w| w + 1).sum();
        if used + marker <= width || start == cursor {
            return start;
        }
        start += 1;
    }
}

impl Widget for CategoryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let categories = self.quiz.categories();
        let selected_count = self.quiz.selected_categories().len();

        let title = if selected_count == 0 {
            " Categories · all ".to_string()
        } else {
            format!(" Categories · {selected_count} selected ")
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.cursor.is_some() {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if categories.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                " no categories yet",
                Style::default().fg(colors.text_dim()),
            )))
            .render(inner, buf);
            return;
        }

        let cursor = self.cursor.map(|c| c.min(categories.len() - 1));
        if self.compact {
            let spans = self.summary_spans(cursor, inner.width as usize);
            Paragraph::new(Line::from(spans)).render(inner, buf);
            return;
        }

        let labels: Vec<String> = categories.iter().map(|c| format!(" {c} ")).collect();
        let widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
        let start = cursor
            .map(|c| first_visible(&widths, c, inner.width as usize))
            .unwrap_or(0);

        let mut spans = Vec::new();
        if start > 0 {
            spans.push(Span::styled("‹", Style::default().fg(colors.text_dim())));
        }
        for (i, (category, label)) in categories.iter().zip(labels).enumerate().skip(start) {
            let mut style = if self.quiz.is_category_selected(category) {
                Style::default()
                    .fg(colors.chip_selected_fg())
                    .bg(colors.chip_selected_bg())
            } else {
                Style::default().fg(colors.fg()).bg(colors.accent_dim())
            };
            if cursor == Some(i) {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Question;
    use crate::store::preferences::Preferences;

    #[test]
    fn first_visible_scrolls_minimally() {
        let widths = [10, 10, 10, 10];
        assert_eq!(first_visible(&widths, 0, 30), 0);
        assert_eq!(first_visible(&widths, 1, 30), 0);
        assert_eq!(first_visible(&widths, 3, 30), 2);
        assert_eq!(first_visible(&widths, 3, 5), 3);
    }

    #[test]
    fn first_visible_leaves_room_for_scroll_marker() {
        // chips 1..=2 need 22 columns plus one for the marker
        assert_eq!(first_visible(&[10, 10, 10], 2, 22), 2);
        assert_eq!(first_visible(&[10, 10, 10], 2, 23), 1);
    }

    fn quiz() -> Quiz {
        let mut quiz = Quiz::new(Preferences::in_memory(), crate::engine::sampler::DEFAULT_TEST_SIZE);
        quiz.set_questions(
            ["Signs", "Parking", "Right-of-Way"]
                .iter()
                .enumerate()
                .map(|(i, category)| Question {
                    id: format!("q{i}"),
                    category: category.to_string(),
                    prompt: "?".into(),
                    options: vec!["a".into(), "b".into()],
                    answer_index: 0,
                    explanation: String::new(),
                    refs: String::new(),
                })
                .collect(),
        );
        quiz
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn cursor_chip_is_fully_drawn_after_scrolling() {
        let quiz = quiz();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        CategoryBar::new(&quiz, Some(1), &theme).render(area, &mut buf);
        let line = row(&buf, 1);
        assert!(line.contains('‹'));
        assert!(line.contains(" Right-of-Way "), "{line:?}");
    }

    #[test]
    fn compact_bar_summarises_selection() {
        let mut quiz = quiz();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 3);

        let mut buf = Buffer::empty(area);
        CategoryBar::new(&quiz, None, &theme)
            .compact(true)
            .render(area, &mut buf);
        assert!(row(&buf, 1).contains("all categories"));

        quiz.toggle_category("Signs");
        quiz.toggle_category("Parking");
        let mut buf = Buffer::empty(area);
        CategoryBar::new(&quiz, Some(1), &theme)
            .compact(true)
            .render(area, &mut buf);
        let line = row(&buf, 1);
        assert!(line.contains("2/3"), "{line:?}");
        assert!(line.contains("on: Signs, Parking"), "{line:?}");
    }
}
