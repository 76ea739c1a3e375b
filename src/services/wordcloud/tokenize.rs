use std::collections::HashMap;

use itertools::Itertools;
use regex::Regex;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "how",
    "if", "in", "is", "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were",
    "what", "will", "with", "you", "your",
];

// Counting is case-insensitive; the rendered form is the casing seen most
// often. Purely numeric tokens are dropped.
// TODO: segment CJK runs instead of treating each run as one token.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<(String, usize)> {
    let token_pattern = Regex::new(r"\w\w+").unwrap();

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut casings: HashMap<String, HashMap<String, usize>> = HashMap::new();

    for token in token_pattern.find_iter(text) {
        let raw = token.as_str();
        let lowered = raw.to_lowercase();

        if STOPWORDS.contains(&lowered.as_str()) {
            continue;
        }
        if lowered.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        *counts.entry(lowered.clone()).or_insert(0) += 1;
        *casings
            .entry(lowered)
            .or_default()
            .entry(raw.to_string())
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(max_words)
        .map(|(lowered, count)| {
            let display = casings
                .get(&lowered)
                .and_then(|forms| {
                    forms
                        .iter()
                        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
                        .next()
                        .map(|(form, _)| form.clone())
                })
                .unwrap_or(lowered);

            (display, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::word_frequencies;

    #[test]
    fn counts_case_insensitively_and_orders_by_count() {
        let text = "WEEX weex Weex tutorial tutorial signup";
        let words = word_frequencies(text, 10);

        assert_eq!(words.len(), 3);
        assert_eq!(words[0], ("WEEX".to_string(), 3));
        assert_eq!(words[1], ("tutorial".to_string(), 2));
        assert_eq!(words[2], ("signup".to_string(), 1));
    }

    #[test]
    fn picks_the_most_frequent_casing() {
        let words = word_frequencies("Weex Weex WEEX weex Weex", 10);

        assert_eq!(words, vec![("Weex".to_string(), 5)]);
    }

    #[test]
    fn drops_stopwords_numbers_and_single_letters() {
        let words = word_frequencies("the a 2024 100 x trading", 10);

        assert_eq!(words, vec![("trading".to_string(), 1)]);
    }

    #[test]
    fn truncates_to_max_words() {
        let text = "alpha alpha alpha beta beta gamma";
        let words = word_frequencies(text, 2);

        assert_eq!(
            words,
            vec![("alpha".to_string(), 3), ("beta".to_string(), 2)]
        );
    }

    #[test]
    fn keeps_cjk_runs() {
        let words = word_frequencies("weex 交易所 weex", 10);

        assert_eq!(words[0], ("weex".to_string(), 2));
        assert_eq!(words[1], ("交易所".to_string(), 1));
    }
}
