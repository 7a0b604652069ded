//! Vision provider implementations

pub mod openai;
pub mod placeholder;

pub use openai::OpenAiVisionProvider;
pub use placeholder::PlaceholderProvider;
