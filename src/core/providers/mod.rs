//! Provider implementations

pub mod gemini;
pub mod perplexity;

pub use gemini::GeminiProvider;
pub use perplexity::PerplexityProvider;
