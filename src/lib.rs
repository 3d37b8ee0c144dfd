//! Life Expectancy Prediction API Library
//!
//! This library provides the core functionality for the life expectancy
//! prediction service: feature encoding, the formula/model reconciliation
//! pipeline, the age-floor safety net, narrative and recommendation
//! generation, and the HTTP handlers around them.
//!
//! # Modules
//!
//! - `artifacts`: trained model and label-encoder artifacts.
//! - `baselines`: regional average life-expectancy lookup.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `encoder`: feature encoding into the model's schema.
//! - `errors`: Error handling types.
//! - `formula`: deterministic lifestyle rule table.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `narrative`: prose summary generation.
//! - `prediction`: the end-to-end prediction workflow.
//! - `recommendations`: rule-driven recommendation engine.
//! - `scores`: per-category health display scores.
//! - `storage`: best-effort persistence and submission logging.

pub mod artifacts;
pub mod baselines;
pub mod config;
pub mod db;
pub mod encoder;
pub mod errors;
pub mod formula;
pub mod handlers;
pub mod models;
pub mod narrative;
pub mod prediction;
pub mod recommendations;
pub mod scores;
pub mod storage;
