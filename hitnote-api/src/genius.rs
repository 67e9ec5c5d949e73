//! Genius metadata search client
//!
//! Thin wrapper over the Genius `/search` endpoint. Search hits carry no
//! album information, so `album` is always "Single"; the core persists
//! whatever this collaborator returns, deduplicating by triple only.

use hitnote_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// One candidate track from the external provider, shaped for the
/// frontend's add-music flow.
#[derive(Debug, Clone, Serialize)]
pub struct GeniusResult {
    pub genius_id: i64,
    pub nome: String,
    pub artista: String,
    pub album: String,
    pub data_lancamento: String,
    pub url_imagem_capa: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    id: i64,
    title: String,
    #[serde(default)]
    artist_names: String,
    #[serde(default)]
    release_date_for_display: Option<String>,
    #[serde(default)]
    song_art_image_url: Option<String>,
}

#[derive(Clone)]
pub struct GeniusClient {
    http: reqwest::Client,
    api_url: String,
    access_token: String,
}

impl GeniusClient {
    pub fn new(api_url: String, access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            access_token,
        }
    }

    /// Search Genius for candidate tracks matching `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<GeniusResult>> {
        if self.access_token.is_empty() {
            return Err(Error::Config(
                "GENIUS_ACCESS_TOKEN não configurado".to_string(),
            ));
        }

        let url = format!("{}/search", self.api_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", query)])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Genius request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("Genius returned error: {}", e)))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Genius response malformed: {}", e)))?;

        let results = body
            .response
            .hits
            .into_iter()
            .map(|hit| GeniusResult {
                genius_id: hit.result.id,
                nome: hit.result.title,
                artista: hit.result.artist_names,
                // Search hits don't expose the album.
                album: "Single".to_string(),
                data_lancamento: hit.result.release_date_for_display.unwrap_or_default(),
                url_imagem_capa: hit.result.song_art_image_url.unwrap_or_default(),
            })
            .collect();

        Ok(results)
    }
}
