mod config;
mod generate;
mod model;

pub use config::BartConfig;
pub use generate::BartSummarizer;
pub use model::{BartModel, DecoderCache};
