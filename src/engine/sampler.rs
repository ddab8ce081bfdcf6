use rand::Rng;
use rand::seq::SliceRandom;

use crate::repository::Question;

pub const DEFAULT_TEST_SIZE: usize = 15;

/// The filtered list, or every question when the filter matches nothing,
/// so a test is never empty while any question exists.
pub fn candidate_pool<'a>(filtered: &'a [Question], all: &'a [Question]) -> &'a [Question] {
    if filtered.is_empty() { all } else { filtered }
}

/// Draw `min(size, pool.len())` questions without replacement: shuffle a
/// copy of the pool and keep the front.
pub fn sample<R: Rng + ?Sized>(pool: &[Question], size: usize, rng: &mut R) -> Vec<Question> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(size.min(pool.len()));
    shuffled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn pool(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: format!("q{i}"),
                category: "Signs".to_string(),
                prompt: format!("prompt {i}"),
                options: vec!["a".to_string(), "b".to_string()],
                answer_index: 0,
                explanation: String::new(),
                refs: String::new(),
            })
            .collect()
    }

    #[test]
    fn sample_size_is_bounded_by_pool_and_limit() {
        let mut rng = SmallRng::seed_from_u64(7);
        for n in [1, 5, 14, 15, 16, 40] {
            let p = pool(n);
            let s = sample(&p, DEFAULT_TEST_SIZE, &mut rng);
            assert_eq!(s.len(), n.min(DEFAULT_TEST_SIZE));
        }
    }

    #[test]
    fn sample_draws_from_pool_without_duplicates() {
        let mut rng = SmallRng::seed_from_u64(11);
        let p = pool(30);
        for _ in 0..50 {
            let s = sample(&p, DEFAULT_TEST_SIZE, &mut rng);
            let ids: HashSet<&str> = s.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), s.len());
            assert!(s.iter().all(|q| p.contains(q)));
        }
    }

    #[test]
    fn empty_pool_yields_empty_sample() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(sample(&[], DEFAULT_TEST_SIZE, &mut rng).is_empty());
    }

    #[test]
    fn every_question_gets_picked_eventually() {
        let mut rng = SmallRng::seed_from_u64(3);
        let p = pool(20);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            for q in sample(&p, 5, &mut rng) {
                seen.insert(q.id);
            }
        }
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn candidate_pool_falls_back_to_all() {
        let all = pool(4);
        assert_eq!(candidate_pool(&[], &all).len(), 4);
        assert_eq!(candidate_pool(&all[..2], &all).len(), 2);
    }
}
