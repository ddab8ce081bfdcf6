use crate::session::Mode;

/// Whether a question's correctness is shown right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Hidden,
    Revealed { correct: bool },
}

impl Feedback {
    pub fn is_revealed(self) -> bool {
        matches!(self, Feedback::Revealed { .. })
    }
}

/// How a single option should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Picked,
    Correct,
    Incorrect,
}

/// Practice reveals as soon as a question is answered; a test only after
/// it has been submitted.
pub fn feedback(mode: Mode, submitted: bool, selected: Option<usize>, answer_index: usize) -> Feedback {
    let Some(picked) = selected else {
        return Feedback::Hidden;
    };
    let visible = match mode {
        Mode::Practice => true,
        Mode::Test => submitted,
    };
    if visible {
        Feedback::Revealed {
            correct: picked == answer_index,
        }
    } else {
        Feedback::Hidden
    }
}

pub fn option_mark(
    feedback: Feedback,
    selected: Option<usize>,
    option: usize,
    answer_index: usize,
) -> OptionMark {
    let picked = selected == Some(option);
    if feedback.is_revealed() {
        if option == answer_index {
            OptionMark::Correct
        } else if picked {
            OptionMark::Incorrect
        } else {
            OptionMark::Plain
        }
    } else if picked {
        OptionMark::Picked
    } else {
        OptionMark::Plain
    }
}

/// Options stop accepting picks once a test is submitted.
pub fn options_locked(mode: Mode, submitted: bool) -> bool {
    mode == Mode::Test && submitted
}

/// A submitted test question that was answered, but wrongly.
pub fn is_missed(mode: Mode, submitted: bool, selected: Option<usize>, answer_index: usize) -> bool {
    mode == Mode::Test && submitted && selected.is_some_and(|p| p != answer_index)
}
