use std::sync::Arc;

use crate::config::bot::BotConfig;
use crate::notify::Notifier;
use crate::persistence::PersistenceManager;
use crate::realm::RealmRegistry;
use crate::services::CommandService;

/// Shared handles given to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BotConfig>,
    /// The only process-wide mutable structure; realms lock individually.
    pub registry: Arc<RealmRegistry>,
    pub persistence: Arc<PersistenceManager>,
    pub commands: Arc<CommandService>,
    /// Outbound relay, when a webhook is configured.
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl AppState {
    pub fn new(
        config: BotConfig,
        registry: Arc<RealmRegistry>,
        persistence: Arc<PersistenceManager>,
        commands: Arc<CommandService>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            persistence,
            commands,
            notifier,
        }
    }

    pub fn realm_count(&self) -> usize {
        self.registry.len()
    }
}
