//! Runtime configuration shared by the web server and the pipeline

use crate::archive::{SessionArchiver, HELPER_SCRIPT_NAME};
use crate::bandai::{BandaiClient, DEFAULT_API_BASE, ONE_PIECE_GAME_TITLE_ID};
use crate::pipeline::DeckPipeline;
use optcg_common::{Result, SessionLayout};
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root of all session directories and archives
    pub data_dir: PathBuf,
    pub bind: String,
    pub port: u16,
    /// Script added to every archive, if it exists
    pub helper_script: PathBuf,
    /// Archive staging root; the data directory when unset
    pub staging_dir: Option<PathBuf>,
    /// Bandai TCG+ API host
    pub api_base: String,
    pub game_title_id: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            helper_script: PathBuf::from(HELPER_SCRIPT_NAME),
            staging_dir: None,
            api_base: DEFAULT_API_BASE.to_string(),
            game_title_id: ONE_PIECE_GAME_TITLE_ID,
        }
    }
}

impl AppConfig {
    pub fn layout(&self) -> SessionLayout {
        SessionLayout::new(&self.data_dir)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Blocking client; build it off the async runtime
    pub fn bandai_client(&self) -> Result<BandaiClient> {
        BandaiClient::with_base_url(&self.api_base, self.game_title_id)
    }

    pub fn pipeline(&self) -> Result<DeckPipeline<BandaiClient>> {
        Ok(DeckPipeline::new(self.bandai_client()?, self.layout()))
    }

    pub fn archiver(&self) -> SessionArchiver {
        let archiver = SessionArchiver::new(self.layout(), &self.helper_script);
        match &self.staging_dir {
            Some(dir) => archiver.with_staging_dir(dir),
            None => archiver,
        }
    }
}
