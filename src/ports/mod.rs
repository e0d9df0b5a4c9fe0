/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod llm;
pub mod transcript;

#[cfg(test)]
pub mod mocks;

pub use llm::{GenerationRequest, MediaPart, ModelGatewayPort, ModelResponse, ResponseFormat};
pub use transcript::TranscriptFetcherPort;
