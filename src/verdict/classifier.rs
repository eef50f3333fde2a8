//! Keyword-based verdict classification
//!
//! Maps the free-form analysis text returned by a provider onto a tri-state
//! verdict. The confidence attached to the verdict is synthetic: it is drawn
//! uniformly from a range that depends only on the label.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Phrases that mark an analysis as fake. Checked before [`REAL_MARKERS`].
const FAKE_MARKERS: [&str; 3] = ["likely fake", "misinformation", "false"];

/// Phrases that mark an analysis as real
const REAL_MARKERS: [&str; 3] = ["likely genuine", "likely real", "true"];

/// Verdict label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictLabel {
    Real,
    Fake,
    Uncertain,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::Real => "real",
            VerdictLabel::Fake => "fake",
            VerdictLabel::Uncertain => "uncertain",
        }
    }
}

/// Classification result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub label: VerdictLabel,

    /// Synthetic confidence in `[0, 1]`
    pub confidence: f64,
}

impl Verdict {
    /// Confidence as a whole percentage, rounded half away from zero
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Closed interval a confidence value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRange {
    pub min: f64,
    pub max: f64,
}

impl ConfidenceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `0 <= min <= max <= 1`
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max
            && self.max <= 1.0
    }

    /// Map a unit draw in `[0, 1)` into the range
    fn sample(&self, unit: f64) -> f64 {
        let value = self.min + unit.clamp(0.0, 1.0) * (self.max - self.min);
        value.min(self.max)
    }
}

/// Per-label confidence ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceRanges {
    pub fake: ConfidenceRange,
    pub real: ConfidenceRange,
    pub uncertain: ConfidenceRange,
}

impl Default for ConfidenceRanges {
    fn default() -> Self {
        Self {
            fake: ConfidenceRange::new(0.85, 1.0),
            real: ConfidenceRange::new(0.85, 1.0),
            uncertain: ConfidenceRange::new(0.4, 0.7),
        }
    }
}

impl ConfidenceRanges {
    pub fn for_label(&self, label: VerdictLabel) -> ConfidenceRange {
        match label {
            VerdictLabel::Fake => self.fake,
            VerdictLabel::Real => self.real,
            VerdictLabel::Uncertain => self.uncertain,
        }
    }

    /// Name of the first invalid range, if any
    pub fn first_invalid(&self) -> Option<&'static str> {
        [
            ("fake", self.fake),
            ("real", self.real),
            ("uncertain", self.uncertain),
        ]
        .into_iter()
        .find(|(_, range)| !range.is_valid())
        .map(|(name, _)| name)
    }
}

/// Source of uniform draws in `[0, 1)`
pub trait ConfidenceSource {
    fn next_unit(&mut self) -> f64;
}

/// Draws from the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl ConfidenceSource for ThreadRngSource {
    fn next_unit(&mut self) -> f64 {
        rand::thread_rng().gen_range(0.0..1.0)
    }
}

/// Determine the label for an analysis text.
///
/// Matching is case-insensitive substring search, first match wins, and the
/// fake markers are checked before the real ones. Text containing both sets
/// therefore resolves to [`VerdictLabel::Fake`].
pub fn label_for(analysis: &str) -> VerdictLabel {
    let normalized = analysis.to_lowercase();

    if FAKE_MARKERS.iter().any(|m| normalized.contains(m)) {
        VerdictLabel::Fake
    } else if REAL_MARKERS.iter().any(|m| normalized.contains(m)) {
        VerdictLabel::Real
    } else {
        VerdictLabel::Uncertain
    }
}

/// Verdict classifier with a configurable range table
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    ranges: ConfidenceRanges,
}

impl Classifier {
    pub fn new(ranges: ConfidenceRanges) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &ConfidenceRanges {
        &self.ranges
    }

    /// Classify using the thread-local random generator
    pub fn classify(&self, analysis: &str) -> Verdict {
        self.classify_with(analysis, &mut ThreadRngSource)
    }

    /// Classify with an explicit draw source
    pub fn classify_with<S: ConfidenceSource + ?Sized>(
        &self,
        analysis: &str,
        source: &mut S,
    ) -> Verdict {
        let label = label_for(analysis);
        let confidence = self.ranges.for_label(label).sample(source.next_unit());
        Verdict { label, confidence }
    }
}
