/// Boundary layer between transports and the AI flows
///
/// Every command re-validates its input, runs the flow and converts any
/// failure into a user-safe `CommandError`.
mod error;
mod flows;

pub use error::{CommandError, CommandErrorKind};

use crate::flows::{FlowOrchestrator, FlowRegistry};
use std::sync::Arc;

/// Shared entry point for every transport (HTTP handlers, tests)
#[derive(Clone)]
pub struct Commands {
    orchestrator: Arc<FlowOrchestrator>,
    registry: Arc<FlowRegistry>,
}

impl Commands {
    pub fn new(orchestrator: Arc<FlowOrchestrator>, registry: Arc<FlowRegistry>) -> Self {
        Self {
            orchestrator,
            registry,
        }
    }
}
