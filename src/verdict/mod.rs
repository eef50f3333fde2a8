//! Verdict classification of provider analysis text

pub mod classifier;

pub use classifier::{Classifier, ConfidenceRanges, Verdict, VerdictLabel};
