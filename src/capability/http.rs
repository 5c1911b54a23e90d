//! Remote list capability over the PokeAPI REST interface.
//!
//! A page is one list request followed by one detail request per entry.
//! Detail requests run concurrently, bounded by a semaphore, and the page
//! fails as soon as any one of them fails.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::ApiConfig;
use crate::error::TransportError;
use crate::model::{Creature, CreatureId};

use super::source::CreatureSource;

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    url: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    id: CreatureId,
    name: String,
    height: u32,
    weight: u32,
    #[serde(default)]
    sprites: Sprites,
}

#[derive(Debug, Default, Deserialize)]
struct Sprites {
    front_default: Option<String>,
    #[serde(default)]
    other: OtherSprites,
}

#[derive(Debug, Default, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<Artwork>,
}

#[derive(Debug, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

impl DetailResponse {
    fn into_creature(self) -> Creature {
        let image_ref = self
            .sprites
            .other
            .official_artwork
            .and_then(|artwork| artwork.front_default)
            .or(self.sprites.front_default)
            .unwrap_or_default();
        Creature::new(self.id, self.name, self.height, self.weight, image_ref)
    }
}

/// [`CreatureSource`] backed by PokeAPI.
pub struct PokeApiSource {
    client: Client,
    base_url: String,
    max_concurrent_details: usize,
}

impl PokeApiSource {
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Request {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_concurrent_details: config.max_concurrent_details.max(1),
        })
    }

    fn list_url(&self, offset: usize, limit: usize) -> String {
        format!("{}/pokemon?offset={}&limit={}", self.base_url, offset, limit)
    }
}

#[async_trait]
impl CreatureSource for PokeApiSource {
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Creature>, TransportError> {
        let url = self.list_url(offset, limit);
        let listing: ListResponse = get_json(&self.client, &url).await?;
        tracing::debug!(
            offset,
            limit,
            entries = listing.results.len(),
            "Fetched creature listing"
        );

        let detail_urls = listing.results.into_iter().map(|entry| entry.url).collect();
        fetch_details(&self.client, detail_urls, self.max_concurrent_details).await
    }
}

/// Fetch every detail URL concurrently and return creatures in input order.
async fn fetch_details(
    client: &Client,
    urls: Vec<String>,
    max_concurrent: usize,
) -> Result<Vec<Creature>, TransportError> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let mut tasks = JoinSet::new();
    let total = urls.len();

    for (index, url) in urls.into_iter().enumerate() {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| TransportError::Join(e.to_string()))?;
            let detail: DetailResponse = get_json(&client, &url).await?;
            Ok::<_, TransportError>((index, detail.into_creature()))
        });
    }

    let mut slots: Vec<Option<Creature>> = vec![None; total];
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| TransportError::Join(e.to_string()))
            .and_then(|result| result);

        match outcome {
            Ok((index, creature)) => slots[index] = Some(creature),
            Err(err) => {
                tasks.abort_all();
                tracing::debug!(error = %err, "Detail lookup failed, abandoning page");
                return Err(err);
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, TransportError> {
    let parsed = Url::parse(url).map_err(|_| TransportError::InvalidUrl {
        url: url.to_string(),
    })?;

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| TransportError::Request {
            url: url.to_string(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await.map_err(|e| TransportError::Request {
        url: url.to_string(),
        source: e,
    })?;

    serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
