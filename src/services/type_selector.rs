//! 题型选择
//!
//! 规则：每套测验最多一道简答题。先抛硬币决定是否包含简答题，
//! 其余位置在 O/X 和选择题之间均匀抽取，最后整体打乱顺序

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::question::QuestionType;

/// 每套测验的题目数量
pub const QUESTION_COUNT: usize = 3;

const FILLER_TYPES: [QuestionType; 2] = [QuestionType::Ox, QuestionType::MultipleChoice];

/// 选出 `count` 个题型
///
/// 纯函数，随机源由调用方注入，测试时可使用固定种子
pub fn select_question_types<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<QuestionType> {
    if count == 0 {
        return Vec::new();
    }

    let include_short_answer = rng.random_bool(0.5);
    let filler_count = if include_short_answer { count - 1 } else { count };

    let mut types: Vec<QuestionType> = (0..filler_count)
        .map(|_| FILLER_TYPES[rng.random_range(0..FILLER_TYPES.len())])
        .collect();

    if include_short_answer {
        types.push(QuestionType::ShortAnswer);
    }

    types.shuffle(rng);
    types
}

/// 使用线程本地随机源选出默认数量的题型
pub fn random_question_types() -> Vec<QuestionType> {
    select_question_types(&mut rand::rng(), QUESTION_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn short_answer_count(types: &[QuestionType]) -> usize {
        types
            .iter()
            .filter(|t| **t == QuestionType::ShortAnswer)
            .count()
    }

    #[test]
    fn test_at_most_one_short_answer() {
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let types = select_question_types(&mut rng, QUESTION_COUNT);
            assert_eq!(types.len(), QUESTION_COUNT);
            assert!(short_answer_count(&types) <= 1, "seed {seed}: {types:?}");
        }
    }

    #[test]
    fn test_generalizes_to_other_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in [1, 2, 5, 12] {
            for _ in 0..50 {
                let types = select_question_types(&mut rng, count);
                assert_eq!(types.len(), count);
                assert!(short_answer_count(&types) <= 1);
            }
        }
        assert!(select_question_types(&mut rng, 0).is_empty());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = select_question_types(&mut StdRng::seed_from_u64(42), QUESTION_COUNT);
        let b = select_question_types(&mut StdRng::seed_from_u64(42), QUESTION_COUNT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_answer_is_optional_and_not_pinned() {
        let mut with_short = 0;
        let mut positions = HashSet::new();
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..1000 {
            let types = select_question_types(&mut rng, QUESTION_COUNT);
            if let Some(pos) = types.iter().position(|t| *t == QuestionType::ShortAnswer) {
                with_short += 1;
                positions.insert(pos);
            }
        }

        // 硬币是公平的，1000 次里两种结果都应大量出现
        assert!((350..=650).contains(&with_short), "with_short = {with_short}");
        assert_eq!(positions.len(), QUESTION_COUNT);
    }

    #[test]
    fn test_fillers_use_both_types() {
        let mut rng = StdRng::seed_from_u64(99);
        let seen: HashSet<QuestionType> = (0..200)
            .flat_map(|_| select_question_types(&mut rng, QUESTION_COUNT))
            .collect();
        assert!(seen.contains(&QuestionType::Ox));
        assert!(seen.contains(&QuestionType::MultipleChoice));
    }

    #[test]
    fn test_thread_rng_entry_point() {
        let types = random_question_types();
        assert_eq!(types.len(), QUESTION_COUNT);
        assert!(short_answer_count(&types) <= 1);
    }
}
