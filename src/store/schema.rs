//! Storage keys and the shapes persisted under them. Each key holds one
//! whole JSON value that is rewritten on every change.

/// `"practice"` or `"test"`.
pub const MODE_KEY: &str = "quizdr_mode";
/// Array of selected category names.
pub const FILTERS_KEY: &str = "quizdr_filters";
/// Array of question ids in the review queue.
pub const WRONG_IDS_KEY: &str = "quizdr_wrong_ids";

pub type PersistedFilters = Vec<String>;
pub type PersistedWrongIds = Vec<String>;
