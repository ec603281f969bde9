use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chessbot::ai::{AiError, RandomMover, SearchStrategy};
use chessbot::engine::ChessEngine;
use chessbot::infra::state::build_state;
use chessbot::notify::Notifier;
use chessbot::persistence::MemorySnapshotStore;
use chessbot::services::Reply;
use chessbot::{AppError, AppState, BotConfig, RealmId};
use parking_lot::Mutex;

/// State backed by an in-memory snapshot store that the test can inspect.
pub struct TestState {
    pub state: AppState,
    pub store: Arc<MemorySnapshotStore>,
}

/// Seeded random opponent and a debounce long enough that only the first
/// mutation in a test writes.
pub async fn build_test_state() -> TestState {
    build(long_debounce(), None, Arc::new(RandomMover::new(Some(11)))).await
}

pub async fn build_test_state_with_notifier(notifier: Arc<dyn Notifier>) -> TestState {
    build(long_debounce(), Some(notifier), Arc::new(RandomMover::new(Some(11)))).await
}

/// Every mutation snapshots, and the bot searches with `strategy`.
pub async fn build_test_state_with_strategy(strategy: Arc<dyn SearchStrategy>) -> TestState {
    let mut config = BotConfig::for_tests();
    config.snapshot_debounce = Duration::ZERO;
    build(config, None, strategy).await
}

fn long_debounce() -> BotConfig {
    let mut config = BotConfig::for_tests();
    config.snapshot_debounce = Duration::from_secs(3600);
    config
}

async fn build(
    config: BotConfig,
    notifier: Option<Arc<dyn Notifier>>,
    strategy: Arc<dyn SearchStrategy>,
) -> TestState {
    let store = Arc::new(MemorySnapshotStore::new());
    let mut builder = build_state()
        .with_config(config)
        .with_store(store.clone())
        .with_strategy(strategy);
    if let Some(notifier) = notifier {
        builder = builder.with_notifier(notifier);
    }
    let state = builder.build().await.expect("build test state");
    TestState { state, store }
}

/// Notifier that keeps every delivery in memory.
#[derive(Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<(RealmId, Vec<Reply>)>>,
}

impl RecordingNotifier {
    pub fn deliveries(&self) -> Vec<(RealmId, Vec<Reply>)> {
        self.deliveries.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, realm: &RealmId, replies: &[Reply]) -> Result<(), AppError> {
        self.deliveries
            .lock()
            .push((realm.clone(), replies.to_vec()));
        Ok(())
    }
}

/// Notifier that always fails, to show relay failures stay invisible to callers.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn deliver(&self, _realm: &RealmId, _replies: &[Reply]) -> Result<(), AppError> {
        Err(AppError::internal("webhook down"))
    }
}

/// Random mover that reports when a search begins, then takes `delay` to answer.
pub struct SlowMover {
    inner: RandomMover,
    delay: Duration,
    started: tokio::sync::Notify,
}

impl SlowMover {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: RandomMover::new(Some(5)),
            delay,
            started: tokio::sync::Notify::new(),
        }
    }

    /// Resolves once a search has begun.
    pub async fn search_started(&self) {
        self.started.notified().await;
    }
}

impl SearchStrategy for SlowMover {
    fn choose_move(&self, engine: &ChessEngine, depth: u8) -> Result<Option<String>, AiError> {
        self.started.notify_one();
        std::thread::sleep(self.delay);
        self.inner.choose_move(engine, depth)
    }
}
