//! Two-tier OT/ICS relevance classification over CVE records.
//!
//! A cheap lexical gate (fixed OT vocabulary) decides whether to spend a
//! generative-model call at all; the model then confirms or rejects the
//! record, with ambiguous answers resolved by the lexical verdict. Accepted
//! records get a short AI-generated operational impact narrative.

pub mod classifier;
pub mod completion;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use classifier::OtClassifier;
pub use completion::{CompletionError, TextCompletion};
pub use providers::ollama::OllamaProvider;
