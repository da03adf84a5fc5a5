//! View components for the Timebox Viewer.

pub mod chart;
pub mod formatting;
pub mod legend;
