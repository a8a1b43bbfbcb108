//! wiscar-core — Assessment engine, scoring, and radar geometry.
//!
//! This crate defines the question-bank model, the session state machine that
//! walks it, the scoring seam with its default WISCAR policy, and the radar
//! layout used to chart results.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod radar;
pub mod report;
pub mod results;
pub mod scoring;
pub mod traits;
