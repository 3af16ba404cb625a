mod renderer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use journey_core::layout::{LayoutConfig, LayoutMode};
use journey_core::model::Timeline;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: journey <timeline.json> [--mode inline|outline] [--config layout.json]";
const LOG_FILTER_ENV: &str = "JOURNEY_LOG";
const LOG_FILE_ENV: &str = "JOURNEY_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "journey.log";

#[derive(Debug, PartialEq)]
struct Args {
    path: PathBuf,
    mode: LayoutMode,
    config: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut path = None;
    let mut mode = LayoutMode::default();
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => {
                let value = args.next().context("--mode needs a value")?;
                mode = value.parse()?;
            }
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a path")?));
            }
            flag if flag.starts_with("--") => bail!("unknown option `{flag}`"),
            _ if path.is_some() => bail!("unexpected argument `{arg}`"),
            _ => path = Some(PathBuf::from(&arg)),
        }
    }

    Ok(Args {
        path: path.context("missing timeline file")?,
        mode,
        config,
    })
}

fn load_config(path: &Path) -> Result<LayoutConfig> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&data).with_context(|| format!("invalid layout config {}", path.display()))
}

fn parse_config(data: &[u8]) -> Result<LayoutConfig> {
    let config: LayoutConfig = serde_json::from_slice(data)?;
    config.validate()?;
    Ok(config)
}

/// Logs go to a file: the terminal itself is owned by the alternate screen.
/// Nothing is installed unless `JOURNEY_LOG` holds a filter directive.
fn init_logging() -> Result<()> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) else {
        return Ok(());
    };
    let path = std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            std::process::exit(1);
        }
    };

    init_logging()?;

    let timeline = Timeline::load(&args.path)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LayoutConfig::default(),
    };
    tracing::info!(
        timeline = %timeline.name,
        activities = timeline.activities.len(),
        mode = %args.mode,
        "opening timeline"
    );

    renderer::render_tui(&timeline, config, args.mode)
}
