//! External service adapters
//!
//! This module contains adapters for external APIs including:
//! - LLM (hosted generative model) services
//! - Video transcript services

pub mod llm;
pub mod transcript;

#[cfg(test)]
pub(crate) mod test_server;
