use newsgist::summarizer::{LengthPlan, Summarizer};

mod common;

use common::mocks::StubEngine;

fn words(count: usize) -> String {
    (0..count)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn short_inputs_bypass_the_engine() {
    let engine = StubEngine::new("unused");
    let calls = engine.calls.clone();
    let summarizer = Summarizer::new(Box::new(engine)).unwrap();

    let input = words(49);
    let summary = summarizer.summarize(&input);

    assert_eq!(summary, input);
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn long_inputs_reach_the_engine_cleaned() {
    let engine = StubEngine::new("A concise summary.");
    let calls = engine.calls.clone();
    let summarizer = Summarizer::new(Box::new(engine)).unwrap();

    let input = format!("<p>Breaking §news§</p> {}", words(60));
    let summary = summarizer.summarize(&input);

    assert_eq!(summary, "A concise summary.");

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (text, plan) = &calls[0];
    assert!(!text.contains('<'));
    assert!(!text.contains('§'));
    assert!(text.contains("Breaking news"));

    // The length plan is derived from the cleaned word count.
    let cleaned_words = text.split_whitespace().count();
    assert_eq!(*plan, LengthPlan::for_words(cleaned_words).unwrap());
}

#[test_log::test]
fn engine_failures_fall_back_to_the_cleaned_text() {
    let engine = StubEngine::failing("model exploded");
    let calls = engine.calls.clone();
    let summarizer = Summarizer::new(Box::new(engine)).unwrap();

    let input = words(80);
    let summary = summarizer.summarize(&input);

    assert_eq!(summary, input);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn exactly_fifty_words_get_summarized() {
    let engine = StubEngine::new("Right at the floor.");
    let calls = engine.calls.clone();
    let summarizer = Summarizer::new(Box::new(engine)).unwrap();

    let summary = summarizer.summarize(&words(50));

    assert_eq!(summary, "Right at the floor.");
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].1,
        LengthPlan {
            min_tokens: 30,
            max_tokens: 40,
        }
    );
}
