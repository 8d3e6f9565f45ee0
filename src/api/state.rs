//! Application state for shared services

use std::sync::Arc;

use crate::domain::ChainOrchestrator;

/// Application state shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub orchestrator: Arc<ChainOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: ChainOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
