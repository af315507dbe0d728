use indexmap::IndexMap;
use std::cmp::Ordering;

/// Select the `limit` most popular words.
///
/// Words are ordered by count (descending), then by length in characters
/// (descending), then alphabetically. The returned map iterates in that order.
pub fn rank<I>(word_counts: I, limit: usize) -> IndexMap<String, usize>
where
    I: IntoIterator<Item = (String, usize)>,
{
    if limit == 0 {
        return IndexMap::new();
    }

    let mut entries: Vec<(String, usize)> = word_counts.into_iter().collect();
    entries.sort_unstable_by(popularity);
    entries.truncate(limit);
    entries.into_iter().collect()
}

fn popularity((a_word, a_count): &(String, usize), (b_word, b_count): &(String, usize)) -> Ordering {
    b_count
        .cmp(a_count)
        .then_with(|| b_word.chars().count().cmp(&a_word.chars().count()))
        .then_with(|| a_word.cmp(b_word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    fn ranked(map: &IndexMap<String, usize>) -> Vec<(&str, usize)> {
        map.iter().map(|(w, c)| (w.as_str(), *c)).collect()
    }

    #[test]
    fn test_orders_by_count_descending() {
        let result = rank(counts(&[("bar", 1), ("foo", 3), ("baz", 2)]), 10);
        assert_eq!(ranked(&result), vec![("foo", 3), ("baz", 2), ("bar", 1)]);
    }

    #[test]
    fn test_ties_prefer_longer_then_alphabetical() {
        let result = rank(
            counts(&[("cat", 2), ("zebra", 2), ("apple", 2), ("ox", 2), ("dog", 2)]),
            10,
        );
        assert_eq!(
            ranked(&result),
            vec![("apple", 2), ("zebra", 2), ("cat", 2), ("dog", 2), ("ox", 2)]
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // "żółw" is 4 characters but 7 bytes
        let result = rank(counts(&[("żółw", 1), ("abcde", 1)]), 2);
        assert_eq!(ranked(&result), vec![("abcde", 1), ("żółw", 1)]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let result = rank(counts(&[("a", 5), ("b", 4), ("c", 3)]), 2);
        assert_eq!(ranked(&result), vec![("a", 5), ("b", 4)]);
    }

    #[test]
    fn test_limit_larger_than_input() {
        let result = rank(counts(&[("a", 1)]), 100);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_zero_limit_and_empty_input() {
        assert!(rank(counts(&[("a", 1)]), 0).is_empty());
        assert!(rank(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_rank_is_idempotent() {
        let input = counts(&[("the", 9), ("fox", 4), ("dog", 4), ("jumps", 4), ("over", 1), ("a", 1)]);
        let once = rank(input, 4);

        let same_limit = rank(once.clone(), 4);
        let larger_limit = rank(once.clone(), 50);

        assert_eq!(ranked(&same_limit), ranked(&once));
        assert_eq!(ranked(&larger_limit), ranked(&once));
    }
}
