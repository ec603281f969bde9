use std::sync::Arc;

use tracing::info;

use crate::ai::SearchStrategy;
use crate::config::bot::BotConfig;
use crate::error::AppError;
use crate::notify::{Notifier, WebhookNotifier};
use crate::persistence::{FileSnapshotStore, PersistenceManager, SnapshotStore};
use crate::services::{AutomatedOpponentDriver, CommandService};
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main).
///
/// Unset pieces come from the config: a file store at `snapshot_path`, the
/// strategy named by `engine`, and a webhook notifier if `notify_url` is set.
pub struct StateBuilder {
    config: BotConfig,
    store: Option<Arc<dyn SnapshotStore>>,
    strategy: Option<Arc<dyn SearchStrategy>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            config: BotConfig::for_tests(),
            store: None,
            strategy: None,
            notifier: None,
        }
    }

    pub fn with_config(mut self, config: BotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn SearchStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Opens the store, loads the registry from it and wires the services.
    /// A corrupt or locked snapshot is returned as an error.
    pub async fn build(self) -> Result<AppState, AppError> {
        let config = self.config;

        let store: Arc<dyn SnapshotStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileSnapshotStore::open(&config.snapshot_path)?),
        };
        let persistence = Arc::new(PersistenceManager::new(store, config.snapshot_debounce));
        let registry = Arc::new(
            persistence
                .load_on_startup(&config.default_prefix, &config.bot_user_id)
                .await?,
        );

        let driver = match self.strategy {
            Some(strategy) => AutomatedOpponentDriver::new(
                config.bot_user_id.clone(),
                strategy,
                config.engine_depth,
            ),
            None => AutomatedOpponentDriver::from_registry(
                config.bot_user_id.clone(),
                &config.engine,
                config.engine_depth,
                config.rng_seed,
            )?,
        };

        let notifier = match (self.notifier, &config.notify_url) {
            (Some(notifier), _) => Some(notifier),
            (None, Some(url)) => Some(
                Arc::new(WebhookNotifier::new(url.clone(), config.notify_timeout)?)
                    as Arc<dyn Notifier>,
            ),
            (None, None) => None,
        };

        let commands = Arc::new(CommandService::new(
            Arc::clone(&registry),
            Arc::clone(&persistence),
            driver,
            config.board_url_template.clone(),
            config.rng_seed,
        ));

        info!(
            realms = registry.len(),
            engine = %config.engine,
            depth = config.engine_depth,
            notify = notifier.is_some(),
            "Application state ready"
        );
        Ok(AppState::new(config, registry, persistence, commands, notifier))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
