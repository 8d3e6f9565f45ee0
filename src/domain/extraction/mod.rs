//! Structured output extraction

mod extractor;

pub use extractor::{ExtractionError, JsonExtractor};
