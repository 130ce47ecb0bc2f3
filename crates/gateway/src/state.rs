use std::sync::Arc;

use af_blobstore::BlobStore;
use af_contextpack::PromptComposer;
use af_domain::config::Config;
use af_providers::{ImageProvider, LlmInvoker, LlmProvider, RegionSelector};
use af_sessions::{HistoryStore, KeyLayout, ProfileStore};

/// Shared application state passed to every handler.
///
/// Built once at startup from explicit dependencies; nothing in here is
/// a process-wide global. Clones are cheap and share the same clients.
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub store: Arc<dyn BlobStore>,
    pub keys: KeyLayout,

    // ── Conversation state ────────────────────────────────────────────
    pub history: HistoryStore,
    pub profiles: ProfileStore,

    // ── Generation ────────────────────────────────────────────────────
    pub composer: PromptComposer,
    pub llm: LlmInvoker,
    pub images: Arc<dyn ImageProvider>,
}

impl AppState {
    /// Wire the state from already-constructed backends. The region list
    /// comes from `config.llm.regions`; selection is uniform random.
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn BlobStore>,
        llm: Arc<dyn LlmProvider>,
        images: Arc<dyn ImageProvider>,
    ) -> Self {
        let keys = KeyLayout::from_config(&config.conversation);
        let invoker = LlmInvoker::from_config(llm, &config.llm);
        Self {
            history: HistoryStore::new(store.clone(), keys.clone()),
            profiles: ProfileStore::new(store.clone(), keys.clone()),
            composer: PromptComposer::new(),
            llm: invoker,
            images,
            keys,
            store,
            config,
        }
    }

    /// Replace the region selection strategy.
    pub fn with_region_selector(mut self, selector: Arc<dyn RegionSelector>) -> Self {
        self.llm = self.llm.with_selector(selector);
        self
    }
}
