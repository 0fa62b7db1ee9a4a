//! Request-scoped workers

pub mod analyzer;

pub use analyzer::run_analysis;
