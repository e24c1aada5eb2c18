//! Unveil CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`unveil_engine`] (reveal state machine) and [`unveil_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::new() -> run_reveal() -> RevealScheduler + TUI
//!                                          |
//!                                          v
//!                          RunResult::Dismissed | Cancelled
//! ```
//!
//! # Event Loop
//!
//! One task, one cooperative loop:
//!
//! 1. Redraw if the scheduler changed the frame
//! 2. Wait for the earliest timer deadline or the next input event
//! 3. Dispatch every due timer (or the input event) to the scheduler
//! 4. Leave the loop on `TickOutcome::Terminate`

mod names;

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    env,
    future,
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    panic,
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tokio::time::sleep_until;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use unveil_engine::{
    ConfigError, Phase, RevealScheduler, RevealSettings, TickOutcome, TimerQueue, UnveilConfig,
};
use unveil_tui::{InputPump, Palette, draw, palette};

fn init_tracing() {
    // RUST_LOG wins; an unset or unparsable value falls back to info.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No writable log file: run silent rather than write over the alternate screen.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.unveil/logs/unveil.log
    if let Some(config_path) = UnveilConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("unveil.log"));
    }

    // Fallback: ./.unveil/logs/unveil.log (useful in constrained environments)
    candidates.push(PathBuf::from(".unveil").join("logs").join("unveil.log"));

    candidates
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen, Show);
}

/// Restore the terminal before the default hook prints, so a panic is readable.
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, alternate screen and a hidden cursor are restored on drop, so the terminal
/// stays usable after errors and early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            restore_terminal();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                restore_terminal();
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
        let _ = self.terminal.show_cursor();
    }
}

/// A missing file means defaults; an unreadable or malformed one is an error.
fn config_or_default(
    loaded: Result<Option<UnveilConfig>, ConfigError>,
) -> Result<UnveilConfig> {
    let config = loaded.context("failed to load config")?;
    Ok(config.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunResult {
    Dismissed,
    Cancelled,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    install_panic_hook();

    // Config problems surface before the alternate screen hides stderr.
    let config = config_or_default(UnveilConfig::load())?;
    let settings = RevealSettings::from_config(&config.reveal())
        .context("invalid [reveal] settings in config")?;
    let args = names::lossy_args(env::args_os().skip(1));
    let names = names::collect_names(args, config.names());
    if names.is_empty() {
        tracing::warn!("No names given; the reveal will finish immediately");
    }
    let palette = palette(config.high_contrast());

    let mut scheduler = RevealScheduler::from_names(names, settings);

    let run_result = {
        let mut session = TerminalSession::new()?;
        run_reveal(&mut session.terminal, &mut scheduler, &palette).await
    };

    match run_result {
        Ok(RunResult::Dismissed) => {
            for (rank, name) in scheduler.session().names().iter().enumerate() {
                println!("{}. {name}", rank + 1);
            }
        }
        Ok(RunResult::Cancelled) => {}
        Err(err) => {
            tracing::error!("reveal failed: {err:?}");
            eprintln!("Error: {err:?}");
            return Err(err);
        }
    }

    Ok(())
}

async fn run_reveal<B>(
    terminal: &mut Terminal<B>,
    scheduler: &mut RevealScheduler,
    palette: &Palette,
) -> Result<RunResult>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut timers = TimerQueue::new(Instant::now());
    scheduler.launch(&mut timers);

    let result: Result<RunResult> = loop {
        if scheduler.take_redraw() {
            let view = scheduler.view();
            if let Err(e) = terminal.draw(|frame| draw(frame, &view, palette)) {
                break Err(e.into());
            }
        }

        let outcome = tokio::select! {
            () = wait_for(timers.next_deadline()) => {
                let now = Instant::now();
                let mut outcome = TickOutcome::Continue;
                while let Some(kind) = timers.pop_due(now) {
                    outcome = scheduler.on_tick(kind, &mut timers);
                    if outcome == TickOutcome::Terminate {
                        break;
                    }
                }
                outcome
            }
            event = input.recv() => match event {
                Ok(event) => {
                    timers.advance_to(Instant::now());
                    scheduler.on_input(event, &mut timers)
                }
                Err(e) => break Err(e),
            },
        };

        if outcome == TickOutcome::Terminate {
            let result = match scheduler.phase() {
                Phase::Dismissed => RunResult::Dismissed,
                _ => RunResult::Cancelled,
            };
            break Ok(result);
        }
    };

    input.shutdown().await;
    result
}

/// Sleep until `deadline`, or forever when nothing is armed (a finished reveal waits
/// for input only).
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline.into()).await,
        None => future::pending().await,
    }
}
