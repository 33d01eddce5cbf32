/// Decoder length bounds for one summarization call, derived from the size
/// of the cleaned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPlan {
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl LengthPlan {
    /// Inputs below this word count are returned verbatim instead of being
    /// run through the model.
    pub const MIN_INPUT_WORDS: usize = 50;

    const MAX_SUMMARY_TOKENS: usize = 130;
    const MIN_SUMMARY_TOKENS: usize = 30;

    /// None means the text is too short to summarize. The cap stays below
    /// the input length so the model cannot pad the summary past the source.
    pub fn for_words(words: usize) -> Option<Self> {
        if words < Self::MIN_INPUT_WORDS {
            return None;
        }

        let max_tokens = Self::MAX_SUMMARY_TOKENS.min(words - 10);
        let mut min_tokens = Self::MIN_SUMMARY_TOKENS;
        if min_tokens >= max_tokens {
            min_tokens = max_tokens / 2;
        }

        Some(Self {
            min_tokens,
            max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, None)]
    #[case(49, None)]
    #[case(50, Some(LengthPlan { min_tokens: 30, max_tokens: 40 }))]
    #[case(100, Some(LengthPlan { min_tokens: 30, max_tokens: 90 }))]
    #[case(140, Some(LengthPlan { min_tokens: 30, max_tokens: 130 }))]
    #[case(1000, Some(LengthPlan { min_tokens: 30, max_tokens: 130 }))]
    fn plan_table(#[case] words: usize, #[case] expected: Option<LengthPlan>) {
        assert_eq!(LengthPlan::for_words(words), expected);
    }

    #[test]
    fn minimum_input_keeps_min_below_max() {
        // The 50-word floor guarantees max_tokens >= 40, so the plan never
        // needs to halve the minimum; this pins that relationship down.
        let plan = LengthPlan::for_words(LengthPlan::MIN_INPUT_WORDS).unwrap();
        assert!(plan.min_tokens < plan.max_tokens);
    }
}
