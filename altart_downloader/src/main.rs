//! OPTCG Alt-Art Downloader
//!
//! Serves the session/deck/download API used by the web frontend.

use altart_downloader::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// OPTCG alt-art downloader server - turns deck links into alt-art image packs
#[derive(Parser, Debug)]
#[command(name = "altart_downloader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding session folders and archives
    #[arg(short, long, default_value = altart_downloader::config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Address to bind the web server to
    #[arg(long, default_value = altart_downloader::config::DEFAULT_BIND)]
    bind: String,

    /// Port for the web server
    #[arg(short, long, default_value_t = altart_downloader::config::DEFAULT_PORT)]
    port: u16,

    /// Helper script added to every downloaded archive (skipped if missing)
    #[arg(long, default_value = altart_downloader::archive::HELPER_SCRIPT_NAME)]
    helper_script: PathBuf,

    /// Scratch space for archive staging (default: the data directory)
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Bandai TCG+ API base URL
    #[arg(long, default_value = altart_downloader::bandai::DEFAULT_API_BASE)]
    api_base: String,

    /// Game title ID sent with recipe requests
    #[arg(long, default_value_t = altart_downloader::bandai::ONE_PIECE_GAME_TITLE_ID)]
    game_title_id: u32,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            data_dir: args.data_dir,
            bind: args.bind,
            port: args.port,
            helper_script: args.helper_script,
            staging_dir: args.staging_dir,
            api_base: args.api_base,
            game_title_id: args.game_title_id,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from(Args::parse());

    log::info!("Starting altart_downloader...");
    log::info!("Recipe API: {}", config.api_base);

    if !config.helper_script.is_file() {
        log::warn!(
            "Helper script {} not found, archives will contain images only",
            config.helper_script.display()
        );
    }

    if let Err(e) = altart_downloader::web::serve(config).await {
        log::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
