use nestkv::Command;

pub struct Autocompleter {
    keywords: Vec<&'static str>,
}

impl Autocompleter {
    pub fn new() -> Self {
        let mut keywords = Command::KEYWORDS.to_vec();
        // single-letter tokens are faster to type than to pick
        keywords.retain(|kw| kw.len() > 1);
        keywords.sort();

        Self { keywords }
    }

    /// Keywords starting with `word`. Only the first word of a line is a keyword.
    pub fn get_suggestions(&self, word: &str, is_first_word: bool) -> Vec<String> {
        if !is_first_word || word.is_empty() {
            return Vec::new();
        }

        self.keywords
            .iter()
            .filter(|kw| kw.starts_with(word) && **kw != word)
            .map(|kw| kw.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_suggestions() {
        let completer = Autocompleter::new();
        assert_eq!(completer.get_suggestions("co", true), vec!["commit", "count"]);
        assert!(completer.get_suggestions("co", false).is_empty());
        assert!(completer.get_suggestions("set", true).is_empty());
    }
}
