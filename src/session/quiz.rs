use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::engine::feedback::{self, Feedback};
use crate::engine::filter::{FilterState, all_categories};
use crate::engine::review::ReviewQueue;
use crate::engine::sampler;
use crate::engine::scoring::{self, Score};
use crate::repository::Question;
use crate::session::Mode;
use crate::session::answers::AnswerMap;
use crate::store::preferences::Preferences;
use crate::store::schema::{
    FILTERS_KEY, MODE_KEY, PersistedFilters, PersistedWrongIds, WRONG_IDS_KEY,
};

/// Everything the user can change, in one place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizState {
    pub mode: Mode,
    pub filter: FilterState,
    pub answers: AnswerMap,
    pub test_questions: Vec<Question>,
    pub submitted: bool,
    pub review: ReviewQueue,
}

/// Outcome of a submitted test: correct answers out of the whole sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestResult {
    pub correct: usize,
    pub total: usize,
}

/// Owns the question bank and the quiz state, and applies user actions.
///
/// Every action that changes the filter or the bank goes through
/// `refresh`, which recomputes the filtered list and, in test
/// mode, draws a new sample. Mode, category selection and the review
/// queue are written through to the preference store on every change.
pub struct Quiz {
    questions: Vec<Question>,
    categories: Vec<String>,
    filtered: Vec<Question>,
    state: QuizState,
    prefs: Preferences,
    rng: SmallRng,
    test_size: usize,
}

impl Quiz {
    pub fn new(prefs: Preferences, test_size: usize) -> Self {
        Self::with_rng(prefs, test_size, SmallRng::from_entropy())
    }

    pub fn with_rng(prefs: Preferences, test_size: usize, rng: SmallRng) -> Self {
        let mode: Mode = prefs.read(MODE_KEY, Mode::Practice);
        let stored_categories: PersistedFilters = prefs.read(FILTERS_KEY, Vec::new());
        let wrong_ids: PersistedWrongIds = prefs.read(WRONG_IDS_KEY, Vec::new());

        let mut filter = FilterState::default();
        for category in stored_categories {
            if !filter.is_selected(&category) {
                filter.categories.push(category);
            }
        }

        Self {
            questions: Vec::new(),
            categories: Vec::new(),
            filtered: Vec::new(),
            state: QuizState {
                mode,
                filter,
                review: ReviewQueue::from_ids(wrong_ids),
                ..QuizState::default()
            },
            prefs,
            rng,
            test_size: test_size.max(1),
        }
    }

    /// Replace the question bank.
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.categories = all_categories(&questions);
        self.questions = questions;
        self.refresh();
    }

    /// Recompute the filtered list; in test mode the sample follows it.
    fn refresh(&mut self) {
        self.filtered = self.state.filter.apply(&self.questions);
        if self.state.mode == Mode::Test {
            self.resample();
        }
    }

    /// Draw a fresh test sample, clearing its answers and submission.
    fn resample(&mut self) {
        let pool = sampler::candidate_pool(&self.filtered, &self.questions);
        let sample = sampler::sample(pool, self.test_size, &mut self.rng);
        log::debug!(
            "drew {} test questions from a pool of {}",
            sample.len(),
            pool.len()
        );
        self.state.answers = AnswerMap::seeded(sample.iter().map(|q| q.id.as_str()));
        self.state.test_questions = sample;
        self.state.submitted = false;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        self.prefs.write(MODE_KEY, &mode);
        log::debug!("switched to {} mode", mode.as_str());
        if mode == Mode::Test {
            self.resample();
        }
    }

    pub fn set_query(&mut self, query: &str) {
        if self.state.filter.query == query {
            return;
        }
        self.state.filter.query = query.to_string();
        self.refresh();
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.state.filter.toggle_category(category);
        self.persist_filters();
        self.refresh();
    }

    /// Drop both the query and the category selection with one refresh.
    pub fn clear_filters(&mut self) {
        let had_categories = !self.state.filter.categories.is_empty();
        if self.state.filter.query.is_empty() && !had_categories {
            return;
        }
        self.state.filter.query.clear();
        self.state.filter.categories.clear();
        if had_categories {
            self.persist_filters();
        }
        self.refresh();
    }

    /// Start over with a new sample, switching to test mode if needed.
    pub fn new_test(&mut self) {
        if self.state.mode != Mode::Test {
            self.state.mode = Mode::Test;
            self.prefs.write(MODE_KEY, &Mode::Test);
        }
        self.resample();
    }

    /// Record a selection. Returns false when the test is already submitted.
    pub fn pick(&mut self, question_id: &str, option: usize) -> bool {
        if feedback::options_locked(self.state.mode, self.state.submitted) {
            return false;
        }
        self.state.answers.pick(question_id, option);
        true
    }

    /// Grade the current test and queue every missed question for review.
    /// Only the first call per sample has any effect.
    pub fn submit(&mut self) -> bool {
        if self.state.mode != Mode::Test || self.state.submitted {
            return false;
        }
        self.state.submitted = true;
        let missed = scoring::missed_ids(&self.state.test_questions, &self.state.answers);
        let added = self.state.review.merge(missed);
        if added > 0 {
            self.persist_review();
        }
        log::info!(
            "test submitted: {}/{} correct, {added} new review ids",
            self.score().correct,
            self.state.test_questions.len()
        );
        true
    }

    /// Manually queue a practice question. Returns true if it was added.
    pub fn save_to_review(&mut self, question_id: &str) -> bool {
        if self.state.mode != Mode::Practice {
            return false;
        }
        let added = self.state.review.add(question_id);
        if added {
            self.persist_review();
        }
        added
    }

    pub fn clear_review(&mut self) {
        self.state.review.clear();
        self.persist_review();
    }

    fn persist_filters(&mut self) {
        self.prefs.write(FILTERS_KEY, &self.state.filter.categories);
    }

    fn persist_review(&mut self) {
        self.prefs.write(WRONG_IDS_KEY, &self.state.review);
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn query(&self) -> &str {
        &self.state.filter.query
    }

    pub fn selected_categories(&self) -> &[String] {
        &self.state.filter.categories
    }

    pub fn is_category_selected(&self, category: &str) -> bool {
        self.state.filter.is_selected(category)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Every category in the bank, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filtered(&self) -> &[Question] {
        &self.filtered
    }

    pub fn test_questions(&self) -> &[Question] {
        &self.state.test_questions
    }

    /// The list on screen: the sample in test mode, the filtered list otherwise.
    pub fn active_questions(&self) -> &[Question] {
        match self.state.mode {
            Mode::Practice => &self.filtered,
            Mode::Test => &self.state.test_questions,
        }
    }

    pub fn selected(&self, question_id: &str) -> Option<usize> {
        self.state.answers.get(question_id)
    }

    pub fn submitted(&self) -> bool {
        self.state.submitted
    }

    pub fn review(&self) -> &ReviewQueue {
        &self.state.review
    }

    pub fn test_size(&self) -> usize {
        self.test_size
    }

    pub fn score(&self) -> Score {
        scoring::compute_score(self.active_questions(), &self.state.answers)
    }

    pub fn test_result(&self) -> Option<TestResult> {
        if self.state.mode != Mode::Test || !self.state.submitted {
            return None;
        }
        Some(TestResult {
            correct: self.score().correct,
            total: self.state.test_questions.len(),
        })
    }

    pub fn feedback_for(&self, question: &Question) -> Feedback {
        feedback::feedback(
            self.state.mode,
            self.state.submitted,
            self.selected(&question.id),
            question.answer_index,
        )
    }

    pub fn options_locked(&self) -> bool {
        feedback::options_locked(self.state.mode, self.state.submitted)
    }

    /// "Save to Review" is offered for wrongly answered practice questions.
    pub fn can_save_to_review(&self, question: &Question) -> bool {
        self.state.mode == Mode::Practice
            && self
                .selected(&question.id)
                .is_some_and(|picked| !question.is_correct(picked))
    }
}
