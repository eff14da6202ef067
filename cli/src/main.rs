//! Rankwise CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`rankwise_engine`] (sort session and app state) and
//! [`rankwise_tui`] (rendering), providing RAII-based terminal management
//! with guaranteed cleanup.
//!
//! ```text
//! main() -> parse args -> read items -> TerminalSession::new() -> run_app()
//!                                                                      |
//!                                                                      v
//!                                  terminal restored -> print ranking -> exit
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`rankwise_tui::InputPump`])
//! 3. Advance application state (`app.tick()`)
//! 4. Render frame

use anyhow::{Context, Result, bail};
use clap::{Args, Parser};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, IsTerminal, Read, Stderr, Write, stderr},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rankwise_engine::{App, ItemList, OutputFormat, RankwiseConfig, SortResult};
use rankwise_tui::{InputPump, draw, handle_events};

/// Exit status when the input could not be used.
const EXIT_BAD_INPUT: u8 = 2;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
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

    // Primary: ~/.rankwise/logs/rankwise.log
    if let Some(config_path) = RankwiseConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("rankwise.log"));
    }

    // Fallback: ./.rankwise/logs/rankwise.log
    candidates.push(PathBuf::from(".rankwise").join("logs").join("rankwise.log"));

    candidates
}

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "rankwise", version)]
#[command(about = "Rank a list by answering one pairwise question at a time")]
struct Cli {
    /// File with one item per line; `-` or no file reads piped stdin
    input: Option<PathBuf>,
    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Debug, Args)]
#[group(multiple = false)]
struct FormatArgs {
    /// Print the ranking as a JSON array
    #[arg(long)]
    json: bool,
    /// Print the ranking one item per line
    #[arg(long)]
    text: bool,
}

impl FormatArgs {
    /// `None` leaves the choice to the config file.
    fn selected(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else if self.text {
            Some(OutputFormat::Text)
        } else {
            None
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut stdin = io::stdin();
            if path.is_none() && stdin.is_terminal() {
                bail!("no input: pass a file or pipe items on stdin (see --help)");
            }
            let mut raw = String::new();
            stdin
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Draws on stderr in the alternate screen; stdout is reserved for the
/// final ranking.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stderr>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stderr();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stderr(), LeaveAlternateScreen);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend + Write,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.tick();

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}

// ============================================================================
// Output
// ============================================================================

fn print_ranking(result: &SortResult, format: OutputFormat) -> Result<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            for item in result.items() {
                writeln!(out, "{item}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, result.items())?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // clap handles --help and usage errors itself (exit status 2).
    let cli = Cli::parse();
    init_tracing();

    let config = match RankwiseConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            eprintln!("Warning: {err}; using defaults");
            RankwiseConfig::default()
        }
    };
    let format = cli.format.selected().unwrap_or_else(|| config.output_format());

    let raw = match read_input(cli.input.as_deref()) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return Ok(ExitCode::from(EXIT_BAD_INPUT));
        }
    };
    let items = match ItemList::parse(&raw) {
        Ok(items) => items,
        Err(err) => {
            eprintln!("Error: {err}");
            return Ok(ExitCode::from(EXIT_BAD_INPUT));
        }
    };
    info!(items = items.len(), "Input parsed");

    let mut app = App::start(items, &config);
    let run_result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };
    app.shutdown();

    if let Err(err) = run_result {
        eprintln!("Error: {err:?}");
        return Ok(ExitCode::FAILURE);
    }

    if let Some(reason) = app.error() {
        eprintln!("Error: {reason}");
        return Ok(ExitCode::FAILURE);
    }

    match app.into_result() {
        Some(result) if result.is_sorted() => {
            print_ranking(&result, format)?;
            Ok(ExitCode::SUCCESS)
        }
        // A stopped session hands the input back untouched.
        Some(result) => {
            print_ranking(&result, format)?;
            eprintln!("Sorting stopped; the list is unchanged.");
            Ok(ExitCode::FAILURE)
        }
        None => {
            eprintln!("Quit before sorting finished.");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser, error::ErrorKind};
    use std::iter;

    use super::{Cli, OutputFormat};

    fn parse(raw: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(iter::once("rankwise").chain(raw.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn file_and_format_flags() {
        let cli = parse(&["--json", "list.txt"]).unwrap();
        assert_eq!(cli.format.selected(), Some(OutputFormat::Json));
        assert_eq!(cli.input.unwrap().to_str(), Some("list.txt"));
    }

    #[test]
    fn no_flags_defers_to_config() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.format.selected(), None);
        assert!(cli.input.is_none());
    }

    #[test]
    fn dash_means_stdin() {
        let cli = parse(&["-"]).unwrap();
        assert_eq!(cli.input.unwrap().to_str(), Some("-"));
    }

    #[test]
    fn double_dash_allows_leading_dash_file_names() {
        let cli = parse(&["--text", "--", "-notes.txt"]).unwrap();
        assert_eq!(cli.input.unwrap().to_str(), Some("-notes.txt"));
        assert_eq!(cli.format.selected(), Some(OutputFormat::Text));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_files() {
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["a.txt", "b.txt"]).is_err());
    }

    #[test]
    fn help_and_usage_errors_end_in_the_parser() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["-h"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["--fast"]).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn json_and_text_are_exclusive() {
        let err = parse(&["--json", "--text"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
