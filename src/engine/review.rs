use serde::{Deserialize, Serialize};

/// Union of `existing` and `new_ids`, first occurrence wins.
pub fn merge(existing: &[String], new_ids: &[String]) -> Vec<String> {
    let mut queue = ReviewQueue::from_ids(existing.to_vec());
    queue.merge(new_ids.iter().cloned());
    queue.into_ids()
}

/// Ids of previously missed questions. Grows until explicitly cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewQueue {
    ids: Vec<String>,
}

impl ReviewQueue {
    /// Build from stored ids, dropping duplicates.
    pub fn from_ids(ids: Vec<String>) -> Self {
        let mut queue = Self::default();
        queue.merge(ids);
        queue
    }

    /// Add every id not already queued. Returns how many were new.
    pub fn merge<I: IntoIterator<Item = String>>(&mut self, new_ids: I) -> usize {
        let before = self.ids.len();
        for id in new_ids {
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
        self.ids.len() - before
    }

    /// Returns false if the id was already queued.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<String> {
        self.ids
    }
}
