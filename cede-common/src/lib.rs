//! # CEDE Common Library
//!
//! Shared code for the Clip Edit Decision Engine including:
//! - Error taxonomy (`Error` enum)
//! - Configuration loading
//! - Engine tuning parameters
//! - Time utilities

pub mod config;
pub mod error;
pub mod params;
pub mod time;

pub use error::{Error, Result};
pub use params::{AnalyzerParams, StoreParams, TransitionParams};
