use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::model::CreatureId;
use crate::ui::detail::DetailIntent;
use crate::ui::list::{ListEffect, ListIntent, ListReducer, ListState};
use crate::ui::mvi::Reducer;

use super::effects::EffectRunner;

const INTENT_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Store task has stopped")]
    Disconnected,
}

/// State published after every processed intent.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub state: ListState,
    /// Intents received from handles and fully reduced so far.
    pub processed: u64,
    /// Effects started but not yet re-entered as intents.
    pub in_flight: usize,
}

/// Owner of the list state and scheduler of its effects.
pub struct Store {
    state: ListState,
    intents: mpsc::Receiver<ListIntent>,
    results_tx: mpsc::UnboundedSender<ListIntent>,
    results_rx: mpsc::UnboundedReceiver<ListIntent>,
    runner: Arc<EffectRunner>,
    published: watch::Sender<StoreSnapshot>,
    processed: u64,
    in_flight: usize,
}

impl Store {
    pub fn new(initial: ListState, runner: EffectRunner) -> (StoreHandle, Store) {
        let (sender, intents) = mpsc::channel(INTENT_BUFFER);
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let (published, snapshots) = watch::channel(StoreSnapshot {
            state: initial.clone(),
            processed: 0,
            in_flight: 0,
        });

        let handle = StoreHandle {
            sender,
            snapshots,
            sent: Arc::new(AtomicU64::new(0)),
        };
        let store = Store {
            state: initial,
            intents,
            results_tx,
            results_rx,
            runner: Arc::new(runner),
            published,
            processed: 0,
            in_flight: 0,
        };
        (handle, store)
    }

    /// Create a store and run it on the current tokio runtime.
    pub fn spawn(initial: ListState, runner: EffectRunner) -> StoreHandle {
        let (handle, store) = Store::new(initial, runner);
        tokio::spawn(store.run());
        handle
    }

    /// Process intents until every handle is dropped and no effect is left.
    ///
    /// Returns the final state.
    pub async fn run(mut self) -> ListState {
        let mut handles_open = true;

        loop {
            if !handles_open && self.in_flight == 0 {
                break;
            }

            tokio::select! {
                biased;

                Some(result) = self.results_rx.recv() => {
                    self.in_flight -= 1;
                    self.apply(result);
                }
                received = self.intents.recv(), if handles_open => match received {
                    Some(intent) => {
                        self.processed += 1;
                        self.apply(intent);
                    }
                    None => {
                        tracing::debug!(in_flight = self.in_flight, "All store handles dropped");
                        handles_open = false;
                    }
                },
            }

            self.publish();
        }

        tracing::debug!("Store stopped");
        self.state
    }

    fn apply(&mut self, intent: ListIntent) {
        tracing::trace!(?intent, "Reducing intent");
        let (state, effect) = ListReducer::reduce(std::mem::take(&mut self.state), intent);
        self.state = state;

        if let Some(effect) = effect {
            self.start(effect);
        }
    }

    fn start(&mut self, effect: ListEffect) {
        tracing::debug!(effect = effect.kind(), "Starting effect");
        self.in_flight += 1;

        let runner = Arc::clone(&self.runner);
        let results = self.results_tx.clone();
        tokio::spawn(async move {
            let intent = runner.run(effect).await;
            if results.send(intent).is_err() {
                tracing::trace!("Effect result dropped (store gone)");
            }
        });
    }

    fn publish(&self) {
        self.published.send_replace(StoreSnapshot {
            state: self.state.clone(),
            processed: self.processed,
            in_flight: self.in_flight,
        });
    }
}

/// Cloneable handle used by presentation layers.
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::Sender<ListIntent>,
    snapshots: watch::Receiver<StoreSnapshot>,
    sent: Arc<AtomicU64>,
}

impl StoreHandle {
    pub async fn dispatch(&self, intent: ListIntent) -> Result<(), RuntimeError> {
        self.sender
            .send(intent)
            .await
            .map_err(|_| RuntimeError::Disconnected)?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub async fn request_next_page(&self) -> Result<(), RuntimeError> {
        self.dispatch(ListIntent::RequestNextPage).await
    }

    pub async fn select_creature(&self, id: CreatureId) -> Result<(), RuntimeError> {
        self.dispatch(ListIntent::SelectById { id }).await
    }

    pub async fn toggle_favorite(&self, id: CreatureId) -> Result<(), RuntimeError> {
        self.dispatch(ListIntent::ToggleFavorite { id }).await
    }

    /// Toggle the favorite status of the open detail, if any.
    pub async fn toggle_detail_favorite(&self) -> Result<(), RuntimeError> {
        self.dispatch(ListIntent::Detail(DetailIntent::ToggleFavorite))
            .await
    }

    pub async fn dismiss_detail(&self) -> Result<(), RuntimeError> {
        self.dispatch(ListIntent::Detail(DetailIntent::Dismiss)).await
    }

    pub async fn refresh_favorites(&self) -> Result<(), RuntimeError> {
        self.dispatch(ListIntent::RefreshFavorites).await
    }

    /// Latest published state.
    pub fn state(&self) -> ListState {
        self.snapshots.borrow().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until every intent sent through this handle (and its clones) has
    /// been reduced and no effect is outstanding.
    pub async fn settled(&self) -> Result<ListState, RuntimeError> {
        let target = self.sent.load(Ordering::SeqCst);
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| snapshot.processed >= target && snapshot.in_flight == 0)
            .await
            .map_err(|_| RuntimeError::Disconnected)?;
        Ok(snapshot.state.clone())
    }
}
