mod plan;
mod text;

pub use plan::LengthPlan;
pub use text::TextCleaner;

use crate::Result;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Seam between the request path and the actual model. The production
/// implementation is `bart::BartSummarizer`; tests plug in stubs.
pub trait SummaryEngine: Send {
    fn summarize(&self, text: &str, plan: &LengthPlan) -> Result<String>;
}

/// A `Summarizer` wrapped for the request path. Exactly one summarization
/// runs at a time; concurrent requests queue on the mutex.
pub type SharedSummarizer = Arc<Mutex<Summarizer>>;

pub struct Summarizer {
    cleaner: TextCleaner,
    engine: Box<dyn SummaryEngine>,
}

impl Summarizer {
    pub fn new(engine: Box<dyn SummaryEngine>) -> Result<Self> {
        Ok(Self {
            cleaner: TextCleaner::new()?,
            engine,
        })
    }

    pub fn into_shared(self) -> SharedSummarizer {
        Arc::new(Mutex::new(self))
    }

    /// Cleans the text and summarizes it. Inputs below the word floor skip
    /// the model, and an engine failure falls back to the cleaned text.
    pub fn summarize(&self, text: &str) -> String {
        let text = self.cleaner.clean(text);
        let words = text.split_whitespace().count();

        let Some(plan) = LengthPlan::for_words(words) else {
            return text;
        };

        match self.engine.summarize(&text, &plan) {
            Ok(summary) => summary,
            Err(err) => {
                warn!("Summarization failed, returning original text: {}", err);
                text
            }
        }
    }
}
