//! Mock implementations for testing

use crate::error::{AppError, Result};
use crate::ports::llm::{GenerationRequest, ModelGatewayPort, ModelResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted reply of the stub gateway
#[derive(Debug, Clone)]
pub enum StubReply {
    Text(String),
    Empty,
    Unavailable,
}

impl StubReply {
    fn into_result(self) -> Result<ModelResponse> {
        match self {
            StubReply::Text(text) => Ok(ModelResponse::from_text(text)),
            StubReply::Empty => Ok(ModelResponse::Empty {
                reason: Some("SAFETY".to_string()),
            }),
            StubReply::Unavailable => Err(AppError::GatewayUnavailable(
                "stub provider returned 503: upstream overloaded".to_string(),
            )),
        }
    }
}

/// Deterministic gateway that records every request it receives
///
/// Scripted replies are consumed in order; once they run out the default
/// reply is returned for every further call.
#[derive(Clone)]
pub struct StubGateway {
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
    scripted: Arc<Mutex<VecDeque<StubReply>>>,
    default_reply: StubReply,
}

impl StubGateway {
    /// Always answers with the given text
    pub fn replying(text: &str) -> Self {
        Self {
            calls: Arc::default(),
            scripted: Arc::default(),
            default_reply: StubReply::Text(text.to_string()),
        }
    }

    /// Answers with the scripted replies in order, then with `default_reply`
    pub fn scripted(replies: Vec<StubReply>, default_reply: StubReply) -> Self {
        Self {
            calls: Arc::default(),
            scripted: Arc::new(Mutex::new(replies.into())),
            default_reply,
        }
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelGatewayPort for StubGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelResponse> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        reply.into_result()
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        true
    }
}
