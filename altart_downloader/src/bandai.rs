//! Bandai TCG+ API client for deck recipes and card images
//!
//! Uses blocking reqwest; callers on an async runtime go through
//! `tokio::task::spawn_blocking`.

use crate::materializer::ImageSource;
use crate::pipeline::DeckSource;
use optcg_common::{DeckError, DeckRecipe, RecipeEnvelope, Result};
use std::time::Duration;

/// Production API host
pub const DEFAULT_API_BASE: &str = "https://api.bandai-tcg-plus.com";

/// Game title ID of the One Piece Card Game on Bandai TCG+
pub const ONE_PIECE_GAME_TITLE_ID: u32 = 4;

const RECIPE_PATH: &str = "/api/user/deck/recipe";
const USER_AGENT: &str = "OPTCG-AltArt-Downloader/1.0";

/// Client for the recipe endpoint and the card image CDN
pub struct BandaiClient {
    http: reqwest::blocking::Client,
    api_base: String,
    game_title_id: u32,
}

impl BandaiClient {
    /// Client against an API host, e.g. [`DEFAULT_API_BASE`]
    pub fn with_base_url(api_base: &str, game_title_id: u32) -> Result<Self> {
        // Upstream calls are single-shot and never time out
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            game_title_id,
        })
    }

    /// Fetch a deck recipe by its recipe code
    pub fn fetch_deck(&self, recipe_code: &str) -> Result<DeckRecipe> {
        let url = format!("{}{}", self.api_base, RECIPE_PATH);

        log::info!("Fetching deck recipe {} from {}", recipe_code, url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("url_code", recipe_code.to_string()),
                ("game_title_id", self.game_title_id.to_string()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::UpstreamFetch(status));
        }

        let body = response.text()?;
        let envelope: RecipeEnvelope = serde_json::from_str(&body)?;

        log::debug!(
            "Recipe {} has {} main, {} extra, {} side entries",
            recipe_code,
            envelope.success.main_deck.len(),
            envelope.success.extra_deck.len(),
            envelope.success.side_deck.len()
        );

        Ok(envelope.success)
    }

    /// Fetch image bytes from a URL
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("Fetching image: {}", url);

        let response = self.http.get(url).send()?;

        if response.status().is_success() {
            Ok(response.bytes()?.to_vec())
        } else {
            Err(DeckError::HttpStatus(response.status()))
        }
    }
}

impl DeckSource for BandaiClient {
    fn fetch_deck(&self, recipe_code: &str) -> Result<DeckRecipe> {
        BandaiClient::fetch_deck(self, recipe_code)
    }
}

impl ImageSource for BandaiClient {
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        BandaiClient::fetch_image(self, url)
    }
}

#[cfg(test)]
#[path = "bandai_tests.rs"]
mod tests;
