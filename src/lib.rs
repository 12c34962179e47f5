//! text2cypher-cleanup - issue detection for text-to-Cypher datasets.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod detect;
pub mod error;
pub mod graph;
pub mod llm;
pub mod logging;
