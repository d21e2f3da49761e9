mod app;
mod event;
mod ui;

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use anim_loop::config::{self, CliArgs, Config};
use anim_loop::{CycleController, LifecycleEvent, LoopError, LoopObserver, Tween};

use crate::app::App;
use crate::event::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    // Restores the terminal before color-eyre prints the panic report
    install_panic_hook();

    let config = config::load(&cli)?;

    // Held until exit so buffered log lines get flushed
    let _log_guard = init_logging(cli.log.as_deref(), &config.general.log_level)?;

    info!("anim-loop starting");

    if cli.headless {
        run_headless(&config, cli.max_ticks).await?;
    } else {
        run_tui(&config).await?;
    }

    info!("anim-loop exiting");
    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let mut event_handler = EventHandler::new(config.tick_rate());
    let mut app = App::new(config, event_handler.sender())?;

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| LoopError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // ── Main event loop ───────────────────────────────────────────────
    let result = loop {
        if let Err(e) = terminal.draw(|f| ui::draw(f, &app)) {
            break Err(e);
        }

        match event_handler.next().await {
            Some(event) => app.handle_event(event),
            None => break Ok(()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    event_handler.stop();
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.wrap_err("Failed to draw frame")
}

/// Prints every lifecycle notification to stdout as one JSON object per line
struct JsonLines;

impl JsonLines {
    fn print(&self, event: LifecycleEvent) {
        match serde_json::to_string(&event) {
            Ok(line) => {
                let mut out = io::stdout().lock();
                let _ = writeln!(out, "{line}");
            }
            Err(e) => tracing::warn!("failed to encode {}: {e}", event.label()),
        }
    }
}

impl LoopObserver for JsonLines {
    fn on_start(&mut self) {
        self.print(LifecycleEvent::Start);
    }

    fn on_pause(&mut self) {
        self.print(LifecycleEvent::Pause);
    }

    fn on_continue(&mut self) {
        self.print(LifecycleEvent::Continue);
    }

    fn on_cycle(&mut self, cycle: u32) {
        self.print(LifecycleEvent::Cycle { cycle });
    }

    fn on_complete(&mut self) {
        self.print(LifecycleEvent::Complete);
    }
}

/// Drive the controller from a plain interval until it completes, the tick
/// budget runs out, or Ctrl+C arrives.
async fn run_headless(config: &Config, max_ticks: u64) -> Result<()> {
    let loop_config = config.animation.to_loop_config()?;
    let mut controller = CycleController::new(Tween::new(loop_config.duration), loop_config)?;
    controller.subscribe(JsonLines);
    controller.activate();

    let mut interval = tokio::time::interval(config.tick_rate());
    let mut last = Instant::now();
    let mut ticks = 0u64;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while !controller.is_completed() && ticks < max_ticks {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                controller.tick(now.duration_since(last));
                last = now;
                ticks += 1;
            }
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }

    info!(
        ticks,
        cycles = controller.cycle(),
        state = controller.state().name(),
        "headless run finished"
    );
    controller.dispose();
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    color_eyre::install().ok();
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call default handler
        default_hook(panic_info);
    }));
}

/// Initialize tracing to a log file through a non-blocking writer.
///
/// `RUST_LOG` wins over the configured level. Without a log path nothing is
/// recorded, since stdout belongs to the TUI (or the JSON event stream).
fn init_logging(log_path: Option<&Path>, level: &str) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::EnvFilter;

    let Some(path) = log_path else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(io::sink)
            .init();
        return Ok(None);
    };

    let file = std::fs::File::create(path)
        .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
