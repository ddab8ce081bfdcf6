use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::engine::Score;
use crate::ui::theme::Theme;

/// Horizontal bar filled to the share of correct answers.
pub struct ScoreBar<'a> {
    label: String,
    score: Score,
    theme: &'a Theme,
}

impl<'a> ScoreBar<'a> {
    pub fn new(label: &str, score: Score, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            score,
            theme,
        }
    }
}

impl Widget for ScoreBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let ratio = self.score.ratio().clamp(0.0, 1.0);
        let filled_width = (ratio * inner.width as f64) as u16;
        let label = format!(
            "{}/{} · {}%",
            self.score.correct, self.score.total, self.score.percent
        );

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_len = label.chars().count() as u16;
        let label_x = inner.x + (inner.width.saturating_sub(label_len)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_shows_counts_and_percent() {
        let theme = Theme::default();
        let score = Score {
            correct: 2,
            total: 3,
            percent: 67,
        };
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        ScoreBar::new("Score", score, &theme).render(area, &mut buf);
        let middle: String = (0..30).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(middle.contains("2/3 · 67%"));
    }
}
