use std::path::PathBuf;
use std::sync::mpsc::Sender;

use crate::config::Config;
use crate::event::AppEvent;
use crate::repository::{LoadError, LoadHandle, Question, QuestionSource};
use crate::session::Mode;
use crate::session::quiz::Quiz;
use crate::store::preferences::Preferences;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

/// Which part of the screen receives keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Questions,
    Search,
    Categories,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct App {
    pub quiz: Quiz,
    pub config: Config,
    pub theme: &'static Theme,
    pub source: QuestionSource,
    pub focus: Focus,
    pub search: LineInput,
    /// Index into the active question list.
    pub cursor: usize,
    pub option_cursor: usize,
    pub category_cursor: usize,
    pub load_state: LoadState,
    /// One-line message for the status row, cleared on the next action.
    pub notice: Option<String>,
    pub should_quit: bool,
    loader: Option<LoadHandle>,
    /// Bumped by every `start_loading`; older deliveries are dropped.
    load_generation: u64,
}

impl App {
    pub fn new(config: Config) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            log::warn!("theme {:?} not found, using default", config.theme);
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let prefs = Preferences::open_dir(PathBuf::from(&config.data_dir));
        let quiz = Quiz::new(prefs, config.test_size);
        Self::with_quiz(config, theme, quiz)
    }

    pub fn with_quiz(config: Config, theme: &'static Theme, quiz: Quiz) -> Self {
        let source = QuestionSource::parse(&config.questions);
        let search = LineInput::new(quiz.query());
        Self {
            quiz,
            config,
            theme,
            source,
            focus: Focus::Questions,
            search,
            cursor: 0,
            option_cursor: 0,
            category_cursor: 0,
            load_state: LoadState::Loading,
            notice: None,
            should_quit: false,
            loader: None,
            load_generation: 0,
        }
    }

    /// Start loading the bank in the background. Any load still running is
    /// cancelled so its result can never overwrite this one.
    pub fn start_loading(&mut self, tx: Sender<AppEvent>) {
        if let Some(previous) = self.loader.take() {
            previous.cancel();
        }
        self.load_generation += 1;
        let generation = self.load_generation;
        self.load_state = LoadState::Loading;
        log::info!("loading questions from {} (load {generation})", self.source);
        self.loader = Some(LoadHandle::spawn(self.source.clone(), move |result| {
            let _ = tx.send(AppEvent::QuestionsLoaded { generation, result });
        }));
    }

    /// Apply the result of load `generation`. Results from a load that has
    /// since been replaced are ignored.
    pub fn on_questions_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Question>, LoadError>,
    ) {
        if generation != self.load_generation {
            log::debug!(
                "ignoring result of load {generation}, load {} is current",
                self.load_generation
            );
            return;
        }
        self.loader = None;
        match result {
            Ok(questions) => {
                self.quiz.set_questions(questions);
                self.load_state = LoadState::Ready;
                self.clamp_cursors();
            }
            Err(err) => {
                log::error!(
                    "failed to load questions from {} ({}): {err}",
                    self.source,
                    err.reason()
                );
                self.load_state = LoadState::Failed(err.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Cancel any in-flight load before exit.
    pub fn shutdown(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.cancel();
        }
        self.should_quit = true;
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.active_questions().get(self.cursor)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.quiz.mode() == mode {
            return;
        }
        self.quiz.set_mode(mode);
        self.cursor = 0;
        self.option_cursor = 0;
        self.notice = None;
    }

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
    }

    /// Feed a key to the search field, re-filtering on every edit.
    pub fn handle_search_input(&mut self, key: crossterm::event::KeyEvent) {
        match self.search.handle(key) {
            InputResult::Edited => {
                self.quiz.set_query(self.search.value());
                self.clamp_cursors();
            }
            InputResult::Submit | InputResult::Cancel => self.focus = Focus::Questions,
            InputResult::Continue => {}
        }
    }

    pub fn focus_categories(&mut self) {
        if self.quiz.categories().is_empty() {
            return;
        }
        self.category_cursor = self.category_cursor.min(self.quiz.categories().len() - 1);
        self.focus = Focus::Categories;
    }

    pub fn move_category_cursor(&mut self, delta: isize) {
        let len = self.quiz.categories().len();
        if len == 0 {
            return;
        }
        self.category_cursor = step(self.category_cursor, delta, len);
    }

    pub fn toggle_category_at_cursor(&mut self) {
        let Some(category) = self.quiz.categories().get(self.category_cursor).cloned() else {
            return;
        };
        self.quiz.toggle_category(&category);
        self.clamp_cursors();
    }

    /// Empty the search and deselect every category.
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.quiz.clear_filters();
        self.clamp_cursors();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.quiz.active_questions().len();
        if len == 0 {
            return;
        }
        let next = step(self.cursor, delta, len);
        if next != self.cursor {
            self.cursor = next;
            self.option_cursor = self.preferred_option_cursor();
        }
    }

    pub fn move_option_cursor(&mut self, delta: isize) {
        let Some(len) = self.current_question().map(|q| q.options.len()) else {
            return;
        };
        if len == 0 {
            return;
        }
        self.option_cursor = step(self.option_cursor, delta, len);
    }

    /// Answer the current question with `option` (0-based).
    pub fn pick(&mut self, option: usize) {
        let Some(question) = self.current_question() else {
            return;
        };
        if option >= question.options.len() {
            return;
        }
        let id = question.id.clone();
        if self.quiz.pick(&id, option) {
            self.option_cursor = option;
            self.notice = None;
        }
    }

    pub fn pick_at_cursor(&mut self) {
        self.pick(self.option_cursor);
    }

    pub fn new_test(&mut self) {
        self.quiz.new_test();
        self.cursor = 0;
        self.option_cursor = 0;
        self.notice = None;
    }

    pub fn submit(&mut self) {
        let before = self.quiz.review().len();
        if !self.quiz.submit() {
            return;
        }
        if let Some(result) = self.quiz.test_result() {
            let added = self.quiz.review().len() - before;
            self.notice = Some(format!(
                "Submitted: {}/{} correct. {added} added to review.",
                result.correct, result.total
            ));
        }
    }

    pub fn save_current_to_review(&mut self) {
        let Some(question) = self.current_question() else {
            return;
        };
        if !self.quiz.can_save_to_review(question) {
            return;
        }
        let id = question.id.clone();
        if self.quiz.save_to_review(&id) {
            self.notice = Some("Saved to review.".to_string());
        }
    }

    pub fn clear_review(&mut self) {
        if self.quiz.review().is_empty() {
            return;
        }
        self.quiz.clear_review();
        self.notice = Some("Review list cleared.".to_string());
    }

    /// Start the option cursor on the current answer if there is one.
    fn preferred_option_cursor(&self) -> usize {
        self.current_question()
            .and_then(|q| self.quiz.selected(&q.id))
            .unwrap_or(0)
    }

    fn clamp_cursors(&mut self) {
        let len = self.quiz.active_questions().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
        self.option_cursor = self.preferred_option_cursor();
        let categories = self.quiz.categories().len();
        self.category_cursor = self.category_cursor.min(categories.saturating_sub(1));
    }
}

/// Move `current` by `delta` within `0..len`, stopping at the ends.
fn step(current: usize, delta: isize, len: usize) -> usize {
    let max = len.saturating_sub(1);
    if delta < 0 {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize).min(max)
    }
}
