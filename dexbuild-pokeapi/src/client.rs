use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::error::ApiError;
use crate::types::{EncounterSite, EvolutionChain, Pokemon, Species};

const BASE_URL: &str = "https://pokeapi.co/api/v2";
const USER_AGENT: &str = "dexbuild-tools/1.0";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(600);

/// HTTP client for PokeAPI with rate limiting.
///
/// PokeAPI has no hard quota but its fair-use policy asks for spaced
/// requests and an identifying user agent; a full form-dex scan is over
/// a thousand calls, so both matter.
pub struct PokeApiClient {
    http: reqwest::Client,
    last_request: Arc<Mutex<Instant>>,
}

impl PokeApiClient {
    /// Create a new client.
    pub fn new() -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            last_request: Arc::new(Mutex::new(Instant::now() - MIN_REQUEST_INTERVAL)),
        })
    }

    /// Fetch a Pokémon by name or numeric id.
    pub async fn pokemon(&self, ident: &str) -> Result<Pokemon, ApiError> {
        self.get_json(&format!("{BASE_URL}/pokemon/{ident}")).await
    }

    /// Fetch a species by name or numeric id.
    pub async fn species(&self, ident: &str) -> Result<Species, ApiError> {
        self.get_json(&format!("{BASE_URL}/pokemon-species/{ident}"))
            .await
    }

    /// Fetch an evolution chain by the resource URL a species points at.
    pub async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, ApiError> {
        self.get_json(url).await
    }

    /// Fetch the encounter sites for a Pokémon id.
    pub async fn encounters(&self, id: u32) -> Result<Vec<EncounterSite>, ApiError> {
        self.get_json(&format!("{BASE_URL}/pokemon/{id}/encounters"))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.rate_limit().await;

        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::Api(format!(
                "Failed to parse {url}: {e}. Response: {}",
                &text[..text.len().min(200)]
            ))
        })
    }

    /// Enforce rate limiting: wait until at least MIN_REQUEST_INTERVAL has
    /// passed since the last API request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
        }
        *last = Instant::now();
    }
}
