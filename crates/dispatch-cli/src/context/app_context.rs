use std::sync::Arc;

use anyhow::Context;
use dispatch_config::DispatchConfig;
use dispatch_db::DispatchDb;
use dispatch_db::engine::AssignmentEngine;
use dispatch_db::store::LibsqlStore;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: DispatchConfig,
    pub engine: AssignmentEngine<LibsqlStore>,
}

impl AppContext {
    /// Open the database and build the assignment engine.
    pub async fn init(config: DispatchConfig) -> anyhow::Result<Self> {
        let db = DispatchDb::open(&config.database)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;

        if db.is_in_memory() {
            tracing::warn!("using an in-memory database; state is lost on exit");
        }

        let engine = AssignmentEngine::new(LibsqlStore::new(Arc::new(db)), &config.engine);
        Ok(Self { config, engine })
    }

    /// The database behind the engine's store.
    pub fn db(&self) -> &DispatchDb {
        self.engine.store().db()
    }
}
