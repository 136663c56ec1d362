//! OPTCG Alt-Art Downloader
//!
//! Resolves Bandai TCG+ deck share links, picks out the alternate-art prints
//! in the deck and stores their images per session, ready to be downloaded
//! as a zip for the OPTCG simulator.

pub mod alt_art;
pub mod archive;
pub mod bandai;
pub mod config;
pub mod materializer;
pub mod pipeline;
pub mod recipe_link;
pub mod session;
pub mod web;

pub use alt_art::is_alt_art;
pub use archive::SessionArchiver;
pub use bandai::BandaiClient;
pub use config::AppConfig;
pub use materializer::{AssetMaterializer, CardOutcome, SkipReason};
pub use pipeline::{DeckPipeline, PipelineReport};
pub use recipe_link::resolve_recipe_code;
pub use session::{create_session, list_images};
