//! Model gateway adapters
//!
//! Implementations of the ModelGatewayPort trait:
//! - Google (Gemini)

pub mod google;

pub use google::GoogleService;
