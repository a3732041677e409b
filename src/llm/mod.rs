pub mod client;
pub mod explainer;
pub mod extractor;
pub mod prompts;
pub mod types;

pub use client::*;
pub use explainer::*;
pub use extractor::*;
pub use types::*;
