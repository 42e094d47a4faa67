use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use snake_rl::game::GameConfig;
use snake_rl::logging::{self, LogTarget};
use snake_rl::modes::{HeadlessMode, PlayMode};
use snake_rl::policy::{HeuristicPolicy, HumanPolicy, Policy, QNetPolicy};

#[derive(Parser)]
#[command(name = "snake_rl")]
#[command(version, about = "Snake driven by a human, a rule-based agent or a trained Q-network")]
struct Cli {
    /// Run mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Who chooses the moves
    #[arg(long, default_value = "human")]
    policy: PolicyKind,

    /// Q-network weights for --policy model (reads <PATH>.meta.json alongside)
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON game config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Board height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Cell edge in pixels
    #[arg(long)]
    block_size: Option<i32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Episodes to run in headless mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Milliseconds per tick in play mode
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Write logs here (play mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interactive terminal game
    Play,
    /// Run episodes without rendering and print statistics
    Headless,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    /// Keyboard steering
    Human,
    /// Rule-based agent
    Heuristic,
    /// Trained Q-network loaded from --model
    Model,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }

    fn build_policy(&self) -> Result<Box<dyn Policy>> {
        Ok(match self.policy {
            PolicyKind::Human => Box::new(HumanPolicy::new()),
            PolicyKind::Heuristic => Box::new(HeuristicPolicy::new()),
            PolicyKind::Model => {
                let path = self
                    .model
                    .as_ref()
                    .context("--policy model needs --model <PATH>")?;
                let policy = QNetPolicy::load(path)
                    .with_context(|| format!("Failed to load model from {:?}", path))?;
                Box::new(policy)
            }
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let target = match (&cli.log_file, cli.mode) {
        (Some(path), _) => LogTarget::File(path.as_path()),
        (None, Mode::Headless) => LogTarget::Stderr,
        (None, Mode::Play) => LogTarget::Disabled,
    };
    logging::init(target)?;

    let config = cli.game_config()?;
    let policy = cli.build_policy()?;

    match cli.mode {
        Mode::Play => {
            let tick = Duration::from_millis(cli.tick_ms.max(1));
            let mut play_mode = PlayMode::new(config, policy, tick)?;
            play_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless = HeadlessMode::new(config, policy, cli.episodes)?;
            let stats = headless.run()?;
            println!("{}", stats.format_summary());
        }
    }

    Ok(())
}
