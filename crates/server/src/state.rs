//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use propchat_agent::ChatService;
use propchat_config::Settings;
use propchat_dataset::PropertyStore;
use propchat_llm::LlmBackend;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub chat: ChatService,
    /// Name of the configured model provider, if any
    pub llm_provider: Option<&'static str>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State over a loaded store, using `backend` when one is available
    pub fn new(config: Settings, store: Arc<PropertyStore>, backend: Option<Arc<dyn LlmBackend>>) -> Self {
        let llm_provider = backend.as_ref().map(|b| b.provider());
        let chat = ChatService::with_backend(store, backend, config.chat.clone());

        Self {
            config: Arc::new(config),
            chat,
            llm_provider,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn store(&self) -> &PropertyStore {
        self.chat.store()
    }
}
