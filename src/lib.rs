pub mod bart;
pub mod config;
pub mod error;
pub mod hub;
pub mod nyt;
pub mod server;
pub mod summarizer;

pub use error::{Error, Result};
