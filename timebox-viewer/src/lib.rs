//! Timebox Viewer - interactive timebox queries over a time-series chart.
//!
//! This library exposes the core components for testing.

pub mod app;
pub mod args;
pub mod config;
pub mod demo;
pub mod message;
pub mod view;

// Re-export commonly used types
pub use app::{Launch, TimeboxViewer};
pub use config::ViewerConfig;
pub use message::Message;
