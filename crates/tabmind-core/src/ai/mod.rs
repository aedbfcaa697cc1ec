//! Ports to the on-device AI backends.

pub mod language_model;
pub mod summarizer;

pub use language_model::{Availability, LanguageModel, LanguageModelConfig, LanguageModelSession};
pub use summarizer::{
    SummaryFormat, SummaryKind, SummaryLength, SummarizerBackend, SummarizerOptions,
    SummarizerSession,
};
