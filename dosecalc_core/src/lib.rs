#![forbid(unsafe_code)]

//! Core domain model and calculation logic for the medication dose calculator.
//!
//! This crate provides:
//! - Domain types (medication records, dose queries and results)
//! - The built-in medication catalog with search and exact lookup
//! - The dose engine (input validation, total dose and volume)
//! - Configuration and logging setup shared by the front ends

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use engine::{compute_dose, compute_dose_from_text, compute_for_medication, parse_input};
