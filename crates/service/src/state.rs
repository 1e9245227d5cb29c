use crate::config::Config;
use platen::{AssetCatalog, FontStore, GhostscriptConfig};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Shared application state accessible to all handlers
#[derive(Clone)]
pub struct AppState {
    /// System font database, shared by every merge job
    pub fonts: Arc<FontStore>,

    /// Server-side image assets addressable from scenes
    pub assets: Arc<AssetCatalog>,

    /// Ghostscript settings handed to each CMYK conversion
    pub ghostscript: GhostscriptConfig,

    /// Limits concurrent synchronous merge jobs
    /// Prevents OOM from too many simultaneous render tasks
    pub sync_semaphore: Arc<Semaphore>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let ghostscript = config.ghostscript();
        let sync_semaphore = Arc::new(Semaphore::new(config.concurrency.max_sync_requests));

        Self {
            fonts: Arc::new(FontStore::new()),
            assets: Arc::new(AssetCatalog::new()),
            ghostscript,
            sync_semaphore,
            config: Arc::new(config),
        }
    }
}
