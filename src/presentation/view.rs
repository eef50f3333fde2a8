//! Detector view state
//!
//! A value-object model of the detector screen: which page is active and
//! which status panel (loading, result, error) is showing. Transitions are
//! pure, so the flow can be driven and checked without any rendering
//! surface.

use crate::verdict::{Verdict, VerdictLabel};
use std::fmt;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some news text to analyze.";
pub const LOADING_MESSAGE: &str = "Analyzing news...";

/// Navigable pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Detector,
    About,
}

/// Status panel shown below the form. At most one is visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Result { verdict: Verdict, analysis: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub page: Page,
    pub status: Status,
}

impl ViewState {
    /// Home page, nothing showing
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch page. Any visible status panel is hidden.
    #[must_use]
    pub fn show_page(self, page: Page) -> Self {
        Self {
            page,
            status: Status::Idle,
        }
    }

    #[must_use]
    pub fn show_loading(self) -> Self {
        Self {
            status: Status::Loading,
            ..self
        }
    }

    #[must_use]
    pub fn show_result(self, verdict: Verdict, analysis: impl Into<String>) -> Self {
        Self {
            status: Status::Result {
                verdict,
                analysis: analysis.into(),
            },
            ..self
        }
    }

    #[must_use]
    pub fn show_error(self, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error {
                message: message.into(),
            },
            ..self
        }
    }
}

/// Headline shown for a verdict
pub fn verdict_title(label: VerdictLabel) -> &'static str {
    match label {
        VerdictLabel::Real => "Likely REAL News",
        VerdictLabel::Fake => "Likely FAKE News",
        VerdictLabel::Uncertain => "Uncertain - Needs Verification",
    }
}

pub fn confidence_line(verdict: &Verdict) -> String {
    format!("Confidence: {}%", verdict.confidence_percent())
}

/// Message shown when an analysis attempt fails
pub fn failure_message(reason: &str) -> String {
    format!("Analysis failed: {reason}. Please try again.")
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            Status::Idle => Ok(()),
            Status::Loading => f.write_str(LOADING_MESSAGE),
            Status::Result { verdict, analysis } => write!(
                f,
                "{}\n{}\n\n{}",
                verdict_title(verdict.label),
                confidence_line(verdict),
                analysis
            ),
            Status::Error { message } => f.write_str(message),
        }
    }
}
