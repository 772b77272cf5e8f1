use clap::Parser;
use reel::core::config::{self, ReelConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::Path;

const LOG_FILE: &str = "reel.log";

#[derive(Parser)]
#[command(name = "reel", about = "Terminal client for a film review service")]
struct Args {
    /// Base URL of the review service (overrides REEL_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Config is read before the logger exists, so a parse error is reported
    // once logging starts.
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (ReelConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        args.api_url.as_deref(),
        args.log_level.as_deref(),
    );

    let level = resolved
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Debug);
    // The terminal is still ours, so this is the last chance to say so.
    if let Err(e) = init_logging(level, Path::new(LOG_FILE)) {
        eprintln!("reel: logging disabled: {e}");
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!("Reel starting up against {}", resolved.api_base_url);
    log::debug!("Resolved config: {:?}", resolved);

    reel::tui::run(resolved)
}

/// File logger with RFC3339 timestamps. Fails if the file cannot be created
/// or a logger is already installed.
fn init_logging(level: LevelFilter, path: &Path) -> Result<(), String> {
    let log_file =
        File::create(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, log_config, log_file).map_err(|e| e.to_string())
}
