//! Chart-data export for external renderers.
//!
//! JSON for a plotting frontend, Markdown for human inspection.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};
