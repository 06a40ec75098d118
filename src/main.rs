use anyhow::{Context, Result, bail};
use blind_snake::game::GameConfig;
use blind_snake::modes::{Controller, PlayMode};
use blind_snake::score::ScoreStore;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blind_snake")]
#[command(version, about = "Snake with a self-driving mode and a tamper-evident high score")]
#[command(disable_help_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Who steers the snake
    #[arg(long, value_enum, default_value = "auto")]
    mode: Mode,

    /// Ticks per second; above the record limit (20) no high score is saved
    #[arg(short = 'f', long = "framerate", allow_hyphen_values = true)]
    framerate: Option<String>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// JSON game configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// High score file (defaults to ~/.snake_highscore)
    #[arg(long)]
    score_file: Option<PathBuf>,

    /// Write logs here; the game screen owns the terminal otherwise
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print help (`-h` prints the high score)
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored high score and exit
    #[command(visible_alias = "h", short_flag = 'h')]
    Highscore,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Let the autopilot play
    Auto,
    /// Play with the keyboard
    Human,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();
    init_logging(cli.log_file.as_deref(), !interactive)?;

    let store = match &cli.score_file {
        Some(path) => Ok(ScoreStore::at(path)),
        None => ScoreStore::in_home_dir(),
    };

    if let Some(Command::Highscore) = cli.command {
        let store = store.context("Failed to locate the high score file")?;
        println!("The current record length is {}", store.read());
        return Ok(());
    }

    let config = build_config(&cli)?;

    let store = match store {
        Ok(store) => Some(store),
        Err(err) => {
            warn!(error = %err, "high score disabled for this session");
            eprintln!("Warning: {err}. Highscore will not be saved.");
            None
        }
    };

    let controller = match cli.mode {
        Mode::Auto => Controller::autopilot(config.laziness),
        Mode::Human => Controller::human(),
    };

    let mut play_mode = PlayMode::new(config, store, controller);
    play_mode.run().await
}

/// Defaults, then the config file, then flags
fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    // A bad value is reported and the session keeps its current rate
    if let Some(raw) = &cli.framerate {
        match GameConfig::parse_framerate(raw) {
            Some(fps) => {
                config.updates_per_second = fps;
                if !config.highscore_eligible() {
                    println!(
                        "Framerate is greater than {}. Highscore will not be updated.",
                        config.highscore_rate_limit
                    );
                }
            }
            None => eprintln!("Error: Invalid framerate value provided for -f."),
        }
    }

    let max_side = i32::MAX as usize;
    if config.grid_width == 0 || config.grid_height == 0 {
        bail!("grid must be at least 1x1");
    }
    if config.grid_width > max_side || config.grid_height > max_side {
        bail!("grid is too large");
    }

    Ok(config)
}

fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {:?}", path))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}
