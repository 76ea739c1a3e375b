use regex::{Regex, RegexBuilder};

pub struct KeywordFilter {
    patterns: Vec<Regex>,
}

impl KeywordFilter {
    pub fn compile(patterns: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(KeywordFilter { patterns })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::KeywordFilter;

    fn weex_filter() -> KeywordFilter {
        let patterns = [
            r"\bweex\b",
            r"\bwe\s+ex\b",
            r"\bweex\s+交易所\b",
            r"\bweex\s+Exchange\b",
            r"\bweex\b.*\b交易所\b",
            r"\bweex\b.*\bExchange\b",
        ];
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();

        KeywordFilter::compile(&patterns).unwrap()
    }

    #[test]
    fn matches_titles() {
        let filter = weex_filter();

        assert!(filter.matches("WEEX tutorial for beginners"));
        assert!(filter.matches("how to trade on weex exchange in 2024"));
        assert!(filter.matches("weex 交易所 注册教程"));
        assert!(filter.matches("why we ex changed our plans"));
    }

    #[test]
    fn rejects_unrelated_titles() {
        let filter = weex_filter();

        assert!(!filter.matches("weexample is not the keyword"));
        assert!(!filter.matches("crypto exchange roundup"));
        assert!(!filter.matches(""));
    }

    #[test]
    fn empty_pattern_list_matches_nothing() {
        let filter = KeywordFilter::compile(&[]).unwrap();

        assert!(!filter.matches("weex"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let patterns = vec!["(unclosed".to_string()];

        assert!(KeywordFilter::compile(&patterns).is_err());
    }
}
