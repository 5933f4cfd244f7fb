//! Application services

pub mod analysis;

pub use analysis::{render, AnalysisOptions, AnalysisService, OutputFormat};
