use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Selected option per question id. An id may be present but unanswered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMap {
    selections: HashMap<String, Option<usize>>,
}

impl AnswerMap {
    /// A map with every id present and unanswered.
    pub fn seeded<'a, I: IntoIterator<Item = &'a str>>(ids: I) -> Self {
        Self {
            selections: ids.into_iter().map(|id| (id.to_string(), None)).collect(),
        }
    }

    /// Record or overwrite the selection for `id`.
    pub fn pick(&mut self, id: &str, option: usize) {
        self.selections.insert(id.to_string(), Some(option));
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.selections.get(id).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|v| v.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_ids_start_unanswered() {
        let map = AnswerMap::seeded(["a", "b"]);
        assert_eq!(map.get("a"), None);
        assert_eq!(map.answered_count(), 0);
    }

    #[test]
    fn pick_overwrites() {
        let mut map = AnswerMap::default();
        map.pick("a", 1);
        map.pick("a", 3);
        assert_eq!(map.get("a"), Some(3));
        assert_eq!(map.get("b"), None);
        assert_eq!(map.answered_count(), 1);
    }
}
