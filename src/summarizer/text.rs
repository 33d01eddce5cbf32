use crate::{Error, Result};
use regex::Regex;

/// Normalizes article text before summarization: drops HTML tags, then any
/// character outside the plain-prose set the model was exercised with.
pub struct TextCleaner {
    tags: Regex,
    specials: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self> {
        let tags = Regex::new(r"<.*?>")
            .map_err(|err| Error::internal(format!("tag pattern failed to compile: {err}")))?;
        let specials = Regex::new(r#"[^A-Za-z0-9\s.,!?'"-]"#)
            .map_err(|err| Error::internal(format!("charset pattern failed to compile: {err}")))?;
        Ok(Self { tags, specials })
    }

    pub fn clean(&self, text: &str) -> String {
        let stripped = self.tags.replace_all(text, "");
        self.specials.replace_all(&stripped, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("plain text stays", "plain text stays")]
    #[case("<p>tagged</p> text", "tagged text")]
    #[case("a <a href=\"x\">link</a> here", "a link here")]
    #[case("smart – dash — stripped", "smart  dash  stripped")]
    #[case("keep .,!?'\"- punctuation!", "keep .,!?'\"- punctuation!")]
    #[case("unicode é ü removed", "unicode   removed")]
    fn clean_cases(#[case] input: &str, #[case] expected: &str) {
        let cleaner = TextCleaner::new().unwrap();
        assert_eq!(cleaner.clean(input), expected);
    }

    #[test]
    fn tags_are_matched_non_greedily() {
        let cleaner = TextCleaner::new().unwrap();
        assert_eq!(cleaner.clean("<b>one</b> and <i>two</i>"), "one and two");
    }
}
