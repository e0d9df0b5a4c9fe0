//! EduNex AI flows
//!
//! Chat tutoring, course recommendations and text/document/audio/YouTube
//! summaries, each run as a validated pipeline against a hosted model.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod flows;
pub mod ports;
pub mod server;
pub mod utils;

pub use error::{AppError, Result};
