//! Presentation of analysis results

pub mod view;

pub use view::{Page, Status, ViewState};
