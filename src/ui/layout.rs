use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: question list beside the card
    Medium, // 60-99 cols: card only, category chips shown
    Narrow, // <60 cols: card only, chips collapsed into a summary line
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_list(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn compact_categories(&self) -> bool {
        *self == LayoutTier::Narrow
    }

    pub fn show_score_bar(&self, height: u16) -> bool {
        height >= 24 && *self != LayoutTier::Narrow
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub search: Rect,
    pub categories: Rect,
    pub status: Rect,
    pub list: Option<Rect>,
    pub card: Rect,
    pub score_bar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let tier = LayoutTier::from_area(area);
        let show_bar = tier.show_score_bar(area.height);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(if show_bar { 3 } else { 0 }),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        let (list, card) = if tier.show_list() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(vertical[4]);
            (Some(horizontal[0]), horizontal[1])
        } else {
            (None, vertical[4])
        };

        Self {
            header: vertical[0],
            search: vertical[1],
            categories: vertical[2],
            status: vertical[3],
            list,
            card,
            score_bar: show_bar.then_some(vertical[5]),
            footer: vertical[6],
            tier,
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// Greedy word wrap on whitespace. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Truncate to `width` chars, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_width() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 80, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 40, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn wide_layout_has_list_and_score_bar() {
        let layout = AppLayout::new(Rect::new(0, 0, 120, 40), 1);
        assert!(layout.list.is_some());
        assert!(layout.score_bar.is_some());
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.height, 1);
    }

    #[test]
    fn narrow_layout_is_card_only() {
        let layout = AppLayout::new(Rect::new(0, 0, 50, 20), 2);
        assert!(layout.list.is_none());
        assert!(layout.score_bar.is_none());
        assert_eq!(layout.card.width, 50);
        assert!(layout.tier.compact_categories());
        assert!(!LayoutTier::Medium.compact_categories());
    }

    #[test]
    fn hints_pack_into_lines() {
        let lines = pack_hint_lines(&["[q] Quit", "[/] Search", "[t] Test"], 24);
        assert_eq!(lines, vec!["  [q] Quit  [/] Search", "  [t] Test"]);
        assert!(pack_hint_lines(&[], 80).is_empty());
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap_text("What does a red octagonal sign mean?", 12);
        assert_eq!(lines, vec!["What does a", "red", "octagonal", "sign mean?"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
    }

    #[test]
    fn wrap_splits_long_words_and_keeps_empty_line() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert!(wrap_text("anything", 0).is_empty());
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Right-of-Way", 20), "Right-of-Way");
        assert_eq!(truncate("Right-of-Way", 6), "Right…");
        assert_eq!(truncate("abc", 0), "");
    }
}
