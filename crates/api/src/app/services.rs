use std::path::{Path, PathBuf};
use std::sync::Arc;

use courier_infra::{ApprovalWorkflow, Dispatcher, InMemoryItemStore, LogDispatcher};

use crate::config::ApiConfig;

/// The workflow as wired into the API: in-memory store, any dispatcher.
pub type ItemWorkflow = ApprovalWorkflow<Arc<InMemoryItemStore>, dyn Dispatcher>;

/// Shared state handed to every handler.
///
/// Created once at startup; there is no process-wide global state.
pub struct AppServices {
    workflow: ItemWorkflow,
    readme_path: PathBuf,
}

impl AppServices {
    /// Production wiring: empty in-memory store, log-only delivery.
    pub fn in_memory(config: &ApiConfig) -> Self {
        Self::with_dispatcher(Arc::new(LogDispatcher), config.readme_path.clone())
    }

    /// Wiring with a caller-provided dispatcher (tests, alternative delivery).
    pub fn with_dispatcher(dispatcher: Arc<dyn Dispatcher>, readme_path: impl Into<PathBuf>) -> Self {
        Self {
            workflow: ApprovalWorkflow::new(InMemoryItemStore::arc(), dispatcher),
            readme_path: readme_path.into(),
        }
    }

    pub fn workflow(&self) -> &ItemWorkflow {
        &self.workflow
    }

    pub fn readme_path(&self) -> &Path {
        &self.readme_path
    }
}
