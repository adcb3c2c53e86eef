pub mod config;
pub mod metrics;
pub mod routes;

pub use config::AppConfig;
pub use routes::{router, AppState};

use anyhow::Result;
use extract::Extractor;
use store::JsonStore;

/// Wire up the extractor and store described by `config`.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    Ok(AppState {
        extractor: Extractor::new(config.llm.build_client()?),
        store: JsonStore::new(config.store.path.clone()),
        metrics: metrics::Metrics::new(),
    })
}
