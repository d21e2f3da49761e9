use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::info;

use crate::animation::{Curve, LoopConfig, Repeat};
use crate::error::LoopResult;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time. The app can never crash due to a
/// missing config file; this is always available as the base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// anim-loop: a terminal playground for looping animations
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "anim-loop", version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log file path (logging disabled if not specified)
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Log level filter (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Target FPS for the tick loop (overrides config file)
    #[arg(long)]
    pub fps: Option<u16>,

    /// Repeat count: -1 forever, 0 one cycle, N for N + 1 cycles
    #[arg(long, allow_negative_numbers = true)]
    pub repeat: Option<i64>,

    /// Play a backward leg after each forward leg
    #[arg(long)]
    pub mirror: Option<bool>,

    /// Present progress from 1 to 0
    #[arg(long)]
    pub reverse: Option<bool>,

    /// Restart the current leg when resuming from pause
    #[arg(long)]
    pub no_continuity: bool,

    /// Forward leg duration in milliseconds
    #[arg(long)]
    pub duration_ms: Option<u64>,

    /// Delay before each forward leg in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Easing curve name
    #[arg(long)]
    pub curve: Option<String>,

    /// Run without a terminal UI and print lifecycle events as JSON lines
    #[arg(long)]
    pub headless: bool,

    /// Stop a headless run after this many ticks
    #[arg(long, default_value_t = 10_000)]
    pub max_ticks: u64,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration, parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub animation: AnimationSection,
    #[serde(default)]
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    pub log_level: String,

    /// Target FPS
    pub fps: u16,
}

/// The `[animation]` table, in file units
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationSection {
    pub repeat: Repeat,
    pub paused: bool,
    pub continuity: bool,
    pub mirror: bool,
    pub reverse: bool,
    pub curve: Curve,
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub backward_delay_ms: Option<u64>,
    pub backward_duration_ms: Option<u64>,
}

/// Which presentation the stage panel uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    Bar,
    Pulse,
    Spin,
}

impl Effect {
    pub fn next(self) -> Self {
        match self {
            Effect::Bar => Effect::Pulse,
            Effect::Pulse => Effect::Spin,
            Effect::Spin => Effect::Bar,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Effect::Bar => "bar",
            Effect::Pulse => "pulse",
            Effect::Spin => "spin",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub effect: Effect,

    /// Show the lifecycle event log panel
    pub show_log: bool,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            fps: 30,
        }
    }
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            repeat: Repeat::Infinite,
            paused: false,
            continuity: true,
            mirror: true,
            reverse: false,
            curve: Curve::EaseInOut,
            delay_ms: 300,
            duration_ms: 1200,
            backward_delay_ms: None,
            backward_duration_ms: None,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            effect: Effect::Bar,
            show_log: true,
        }
    }
}

impl AnimationSection {
    /// Convert file units into a validated [`LoopConfig`]
    pub fn to_loop_config(&self) -> LoopResult<LoopConfig> {
        let config = LoopConfig {
            repeat: self.repeat,
            paused: self.paused,
            continuity: self.continuity,
            mirror: self.mirror,
            reverse: self.reverse,
            curve: self.curve.clone(),
            delay: Duration::from_millis(self.delay_ms),
            duration: Duration::from_millis(self.duration_ms),
            backward_delay: self.backward_delay_ms.map(Duration::from_millis),
            backward_duration: self.backward_duration_ms.map(Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/anim-loop/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("anim-loop")
            .join("config.toml")
    }

    /// Parse a config from TOML text
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).wrap_err("Failed to parse anim-loop config")
    }

    /// The embedded defaults
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_CONFIG_TOML)
    }

    /// Convenience: tick interval from FPS
    pub fn tick_rate(&self) -> Duration {
        let fps = self.general.fps.max(1);
        Duration::from_millis(1000 / u64::from(fps))
    }

    /// Apply CLI overrides on top of the file values
    pub fn apply_cli(&mut self, cli: &CliArgs) -> Result<()> {
        if let Some(ref level) = cli.log_level {
            self.general.log_level = level.clone();
        }
        if let Some(fps) = cli.fps {
            self.general.fps = fps;
        }
        if let Some(repeat) = cli.repeat {
            self.animation.repeat = Repeat::try_from(repeat)?;
        }
        if let Some(mirror) = cli.mirror {
            self.animation.mirror = mirror;
        }
        if let Some(reverse) = cli.reverse {
            self.animation.reverse = reverse;
        }
        if cli.no_continuity {
            self.animation.continuity = false;
        }
        if let Some(ms) = cli.duration_ms {
            self.animation.duration_ms = ms;
        }
        if let Some(ms) = cli.delay_ms {
            self.animation.delay_ms = ms;
        }
        if let Some(ref curve) = cli.curve {
            self.animation.curve = curve.parse()?;
        }
        Ok(())
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If config file doesn't exist, create directory tree + write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    // Bootstrap: ensure the file exists on disk
    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(&config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    let mut config = Config::parse(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to parse config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             anim-loop --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })?;

    config.apply_cli(cli)?;
    Ok(config)
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}
