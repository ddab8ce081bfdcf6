use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::repository::Question;

/// Free-text query plus selected categories. An empty selection means
/// every category passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub categories: Vec<String>,
}

impl FilterState {
    /// Remove the category if selected, append it otherwise.
    pub fn toggle_category(&mut self, category: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category.to_string());
        }
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn apply(&self, all: &[Question]) -> Vec<Question> {
        filter_questions(all, &self.query, &self.categories)
    }
}

/// Keep the questions that pass both the category and text filters, in
/// their original order.
pub fn filter_questions(all: &[Question], query: &str, categories: &[String]) -> Vec<Question> {
    let needle = query.trim().to_lowercase();
    all.iter()
        .filter(|q| matches_prepared(q, &needle, categories))
        .cloned()
        .collect()
}

fn matches_prepared(question: &Question, needle: &str, categories: &[String]) -> bool {
    let in_category = categories.is_empty() || categories.iter().any(|c| *c == question.category);
    if !in_category {
        return false;
    }
    needle.is_empty()
        || question.prompt.to_lowercase().contains(needle)
        || question
            .options
            .iter()
            .any(|o| o.to_lowercase().contains(needle))
        || question.category.to_lowercase().contains(needle)
}

/// Distinct categories, sorted.
pub fn all_categories(all: &[Question]) -> Vec<String> {
    all.iter()
        .map(|q| q.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str, category: &str, prompt: &str, options: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            category: category.to_string(),
            prompt: prompt.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer_index: 0,
            explanation: String::new(),
            refs: String::new(),
        }
    }

    fn bank() -> Vec<Question> {
        vec![
            q("1", "Signs", "What does an octagon mean?", &["Stop", "Yield"]),
            q("2", "Parking", "How far from a hydrant?", &["15 feet", "5 feet"]),
            q("3", "Signs", "Yellow diamond signs warn of?", &["Hazards", "Parks"]),
            q("4", "Speed", "Rural interstate limit?", &["70 mph", "55 mph"]),
            q("5", "Parking", "Uphill with a curb, turn wheels?", &["Away", "Toward"]),
        ]
    }

    fn ids(qs: &[Question]) -> Vec<&str> {
        qs.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let all = bank();
        let out = filter_questions(&all, "", &[]);
        assert_eq!(ids(&out), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn whitespace_query_is_empty() {
        let all = bank();
        assert_eq!(filter_questions(&all, "   ", &[]).len(), all.len());
    }

    #[test]
    fn category_selection_restricts() {
        let all = bank();
        let out = filter_questions(&all, "", &["Parking".to_string()]);
        assert_eq!(ids(&out), vec!["2", "5"]);
    }

    #[test]
    fn query_matches_prompt_options_and_category_case_insensitively() {
        let all = bank();
        assert_eq!(ids(&filter_questions(&all, "OCTAGON", &[])), vec!["1"]);
        assert_eq!(ids(&filter_questions(&all, "15 feet", &[])), vec!["2"]);
        assert_eq!(ids(&filter_questions(&all, "speed", &[])), vec!["4"]);
        assert_eq!(ids(&filter_questions(&all, "  hydrant ", &[])), vec!["2"]);
    }

    #[test]
    fn query_and_category_combine() {
        let all = bank();
        let out = filter_questions(&all, "yellow", &["Parking".to_string()]);
        assert!(out.is_empty());
        let out = filter_questions(&all, "yellow", &["Signs".to_string()]);
        assert_eq!(ids(&out), vec!["3"]);
    }

    #[test]
    fn output_is_ordered_subset_for_many_filters() {
        let all = bank();
        let queries = ["", "a", "e", "mph", "zzz", "s"];
        let cats: Vec<Vec<String>> = vec![
            vec![],
            vec!["Signs".into()],
            vec!["Speed".into(), "Parking".into()],
            vec!["Nope".into()],
        ];
        for query in queries {
            for selected in &cats {
                let out = filter_questions(&all, query, selected);
                let mut last = None;
                for item in &out {
                    let pos = all.iter().position(|q| q.id == item.id).unwrap();
                    assert!(last.is_none_or(|l| pos > l), "order broken for {query:?}");
                    last = Some(pos);
                }
            }
        }
    }

    #[test]
    fn toggle_category_adds_then_removes() {
        let mut state = FilterState::default();
        state.toggle_category("Signs");
        state.toggle_category("Speed");
        assert_eq!(state.categories, vec!["Signs", "Speed"]);
        state.toggle_category("Signs");
        assert_eq!(state.categories, vec!["Speed"]);
        assert!(!state.is_selected("Signs"));
        assert!(state.is_selected("Speed"));
    }

    #[test]
    fn filter_state_apply_matches_free_function() {
        let all = bank();
        let state = FilterState {
            query: "feet".to_string(),
            categories: vec!["Parking".to_string()],
        };
        assert_eq!(state.apply(&all), filter_questions(&all, "feet", &state.categories));
        assert_eq!(ids(&state.apply(&all)), vec!["2"]);
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        assert_eq!(all_categories(&bank()), vec!["Parking", "Signs", "Speed"]);
        assert!(all_categories(&[]).is_empty());
    }
}
