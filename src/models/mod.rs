//! API data models
//!
//! This module contains the proxy's own wire shapes and the request and
//! response envelopes of the two upstream providers.

pub mod analysis;
pub mod gemini;
pub mod perplexity;
