use serde::{Deserialize, Serialize};

use crate::repository::Question;
use crate::session::answers::AnswerMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
}

impl Score {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Score the answered questions of `active`. Unanswered ones do not count
/// towards `total`.
pub fn compute_score(active: &[Question], answers: &AnswerMap) -> Score {
    let mut correct = 0;
    let mut total = 0;
    for q in active {
        if let Some(picked) = answers.get(&q.id) {
            total += 1;
            if q.is_correct(picked) {
                correct += 1;
            }
        }
    }
    Score {
        correct,
        total,
        percent: percent(correct, total),
    }
}

pub fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}

/// Ids in `active` whose answer is missing or wrong.
pub fn missed_ids(active: &[Question], answers: &AnswerMap) -> Vec<String> {
    active
        .iter()
        .filter(|q| !answers.get(&q.id).is_some_and(|picked| q.is_correct(picked)))
        .map(|q| q.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str, answer_index: usize) -> Question {
        Question {
            id: id.to_string(),
            category: "Signs".to_string(),
            prompt: String::new(),
            options: vec!["a".into(), "b".into(), "c".into()],
            answer_index,
            explanation: String::new(),
            refs: String::new(),
        }
    }

    #[test]
    fn empty_answers_score_zero() {
        let qs = vec![q("1", 0), q("2", 1)];
        assert_eq!(
            compute_score(&qs, &AnswerMap::default()),
            Score {
                correct: 0,
                total: 0,
                percent: 0
            }
        );
    }

    #[test]
    fn all_correct_is_one_hundred_percent() {
        let qs = vec![q("1", 0), q("2", 1), q("3", 2)];
        let mut answers = AnswerMap::default();
        answers.pick("1", 0);
        answers.pick("2", 1);
        answers.pick("3", 2);
        let score = compute_score(&qs, &answers);
        assert_eq!(score.correct, 3);
        assert_eq!(score.total, 3);
        assert_eq!(score.percent, 100);
    }

    #[test]
    fn unanswered_questions_do_not_count() {
        let qs = vec![q("1", 0), q("2", 1), q("3", 2)];
        let mut answers = AnswerMap::seeded(qs.iter().map(|q| q.id.as_str()));
        answers.pick("1", 0);
        answers.pick("2", 0);
        let score = compute_score(&qs, &answers);
        assert_eq!((score.correct, score.total, score.percent), (1, 2, 50));
    }

    #[test]
    fn answers_outside_active_list_are_ignored() {
        let qs = vec![q("1", 0)];
        let mut answers = AnswerMap::default();
        answers.pick("1", 0);
        answers.pick("other", 2);
        assert_eq!(compute_score(&qs, &answers).total, 1);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn missed_ids_include_unanswered_and_wrong() {
        let qs = vec![q("1", 0), q("2", 1), q("3", 2)];
        let mut answers = AnswerMap::seeded(qs.iter().map(|q| q.id.as_str()));
        answers.pick("1", 0);
        answers.pick("2", 2);
        assert_eq!(missed_ids(&qs, &answers), vec!["2", "3"]);
    }
}
