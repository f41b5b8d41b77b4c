//! Shared application state

use std::sync::Arc;

use lexmem_core::{SessionRegistry, Storage};

use crate::explain::Explainer;

/// State shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Words, review history, and the ranked queue
    pub storage: Arc<Storage>,
    /// Live study sessions
    pub sessions: Arc<SessionRegistry>,
    /// Absent when no API key is configured; word creation still works,
    /// words just go unexplained
    pub explainer: Option<Arc<Explainer>>,
}
