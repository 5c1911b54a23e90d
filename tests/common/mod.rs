//! Shared test utilities and fake capabilities.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use async_trait::async_trait;
use creaturedex::capability::{
    CreatureSource, FavoritesClient, KeyValueFavorites, MemoryStore,
};
use creaturedex::error::TransportError;
use creaturedex::model::{Creature, CreatureId};
use creaturedex::runtime::{EffectRunner, Store, StoreHandle};
use creaturedex::ui::list::{FailurePolicy, ListState};
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;

pub fn creature(id: CreatureId) -> Creature {
    Creature::new(id, format!("creature-{id}"), id * 2, id * 10, format!("img-{id}"))
}

pub fn creatures(ids: impl IntoIterator<Item = CreatureId>) -> Vec<Creature> {
    ids.into_iter().map(creature).collect()
}

pub fn ids(creatures: &[Creature]) -> Vec<CreatureId> {
    creatures.iter().map(|c| c.id).collect()
}

/// Wait for the store to settle, failing the test instead of hanging.
pub async fn settle(handle: &StoreHandle) -> ListState {
    tokio::time::timeout(Duration::from_secs(5), handle.settled())
        .await
        .expect("store did not settle in time")
        .expect("store stopped")
}

// -- Remote list fake ---------------------------------------------------------

/// A scripted outcome for one `fetch_page` call.
pub enum PageScript {
    Page(Vec<Creature>),
    Fail(&'static str),
}

/// Remote source serving a fixed collection by offset/limit, with optional
/// scripted pages, failures and a gate that holds fetches until released.
pub struct FakeSource {
    collection: Vec<Creature>,
    scripted: Mutex<VecDeque<PageScript>>,
    calls: Mutex<Vec<(usize, usize)>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
    pub fn with_collection(collection: Vec<Creature>) -> Self {
        Self {
            collection,
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn scripted(pages: Vec<PageScript>) -> Self {
        Self {
            collection: Vec::new(),
            scripted: Mutex::new(pages.into()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Every fetch waits for one permit from `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CreatureSource for FakeSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Creature>, TransportError> {
        self.calls.lock().push((offset, limit));

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let scripted = self.scripted.lock().pop_front();
        match scripted {
            Some(PageScript::Page(page)) => Ok(page),
            Some(PageScript::Fail(reason)) => Err(TransportError::Decode {
                url: "fake://pokemon".to_string(),
                message: reason.to_string(),
            }),
            None => Ok(self
                .collection
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect()),
        }
    }
}

// -- Favorites fake -----------------------------------------------------------

/// Favorites client over an in-memory store that records call order.
pub struct RecordingFavorites {
    inner: KeyValueFavorites,
    log: Mutex<Vec<String>>,
}

impl RecordingFavorites {
    pub fn new() -> Self {
        Self {
            inner: KeyValueFavorites::new(Arc::new(MemoryStore::new())),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl FavoritesClient for RecordingFavorites {
    async fn fetch_favorite_ids(&self) -> HashSet<CreatureId> {
        self.log.lock().push("fetch".to_string());
        self.inner.fetch_favorite_ids().await
    }

    async fn toggle_favorite(&self, id: CreatureId) {
        self.log.lock().push(format!("toggle:{id}"));
        self.inner.toggle_favorite(id).await
    }
}

// -- Store helpers ------------------------------------------------------------

pub struct Harness {
    pub handle: StoreHandle,
    pub source: Arc<FakeSource>,
    pub favorites: Arc<RecordingFavorites>,
}

pub fn spawn_store(source: FakeSource, page_size: usize, policy: FailurePolicy) -> Harness {
    let source = Arc::new(source);
    let favorites = Arc::new(RecordingFavorites::new());
    let runner = EffectRunner::new(source.clone(), favorites.clone());
    let handle = Store::spawn(ListState::new(page_size, policy), runner);
    Harness {
        handle,
        source,
        favorites,
    }
}

// -- Config helpers -----------------------------------------------------------

/// Create a temporary config file with the given TOML body.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
