// PokeAPI client for evolution-chain lookups.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use pokedraft_core::config::PokeApiConfig;
use pokedraft_core::family::{Family, FamilyId};
use pokedraft_core::lookup::{FamilyLookup, LookupError};

// ---------------------------------------------------------------------------
// PokeApiClient
// ---------------------------------------------------------------------------

pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a client against `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &PokeApiConfig) -> Result<Self, LookupError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the evolution-chain resource for `id`.
    pub fn family_url(&self, id: FamilyId) -> String {
        format!("{}/evolution-chain/{}/", self.base_url, id)
    }

    /// Fetch one evolution chain.
    pub async fn fetch_family(&self, id: FamilyId) -> Result<Family, LookupError> {
        let url = self.family_url(id);
        debug!(%id, %url, "fetching evolution chain");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                id,
                status: status.as_u16(),
            });
        }

        response.json::<Family>().await.map_err(|e| {
            if e.is_decode() {
                LookupError::Decode {
                    id,
                    message: e.to_string(),
                }
            } else {
                LookupError::Transport(e.to_string())
            }
        })
    }
}

#[async_trait]
impl FamilyLookup for PokeApiClient {
    async fn lookup(&self, id: FamilyId) -> Result<Family, LookupError> {
        self.fetch_family(id).await
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
