//! Core library functions for the comment graph analyzer

pub mod analyzer;
pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod query;
pub mod storage;

pub use analyzer::CommentAnalyzer;
pub use config::Config;
pub use error::{AnalyzerError, Result, ValidationError, ValidationRule};
