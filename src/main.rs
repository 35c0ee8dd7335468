use clap::{Parser, ValueEnum};
use dropsort::config::OrganizerConfig;
use dropsort::layout::DestinationLayout;
use dropsort::mover::FileMover;
use dropsort::orchestrator::Orchestrator;
use dropsort::output::OutputFormatter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[derive(Parser)]
#[command(name = "dropsort")]
#[command(about = "Sorts a downloads directory into category folders as files arrive")]
struct Cli {
    /// Operating mode; an interactive menu is shown when omitted
    #[arg(value_enum)]
    mode: Option<Mode>,

    /// Directory to sweep and watch (defaults to ~/Downloads)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Root directory for the category folders (defaults to ~/FileOrganizer)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preview the sweep without moving anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Organize existing files, then keep watching
    SweepWatch,
    /// Only watch for new files
    Watch,
    /// Move every sorted file back to the source directory
    Reverse,
    /// Do nothing and exit
    Exit,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            OutputFormatter::error(&message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    println!("dropsort - keep your downloads sorted");

    let mut config = OrganizerConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    if let Some(source) = cli.source {
        config.paths.source_dir = Some(source);
    }
    if let Some(root) = cli.root {
        config.paths.organizer_root = Some(root);
    }

    let source_dir = config.source_dir().map_err(|e| e.to_string())?;
    let organizer_root = config.organizer_root().map_err(|e| e.to_string())?;
    let extensions = config.extension_map().map_err(|e| e.to_string())?;
    let filters = config.compiled_filters().map_err(|e| e.to_string())?;

    // The one failure that aborts the process: without the category
    // directories nothing can be sorted.
    let layout = DestinationLayout::create(&organizer_root).map_err(|e| e.to_string())?;

    let orchestrator = Orchestrator::new(
        source_dir,
        layout,
        extensions,
        filters,
        FileMover::new(config.timing.stability_probe()),
        config.timing.settle_delay(),
    );

    if cli.dry_run {
        let report = orchestrator.dry_run_sweep().map_err(|e| e.to_string())?;
        orchestrator.print_sweep_summary(&report);
        return Ok(());
    }

    let mode = match cli.mode {
        Some(mode) => mode,
        None => prompt_mode()?,
    };

    match mode {
        Mode::SweepWatch => {
            let stop = spawn_stop_listener();
            orchestrator.sweep_and_watch(&stop).map_err(|e| e.to_string())
        }
        Mode::Watch => {
            let stop = spawn_stop_listener();
            orchestrator.watch_only(&stop).map_err(|e| e.to_string())
        }
        Mode::Reverse => {
            let report = orchestrator.reverse_all();
            OutputFormatter::success(&format!(
                "Reversal complete, restored {} {}",
                report.restored,
                if report.restored == 1 { "file" } else { "files" }
            ));
            if !report.skipped.is_empty() {
                OutputFormatter::warning(&format!("Skipped: {}", report.skipped.len()));
            }
            if !report.failed.is_empty() {
                for (path, reason) in &report.failed {
                    OutputFormatter::error(&format!("{}: {}", path.display(), reason));
                }
                return Err(format!(
                    "{} files could not be moved back",
                    report.failed.len()
                ));
            }
            Ok(())
        }
        Mode::Exit => {
            orchestrator.noop();
            Ok(())
        }
    }
}

/// Shows the four-option menu and reads the operator's choice.
fn prompt_mode() -> Result<Mode, String> {
    println!();
    println!("Options:");
    println!("1. Organize existing files and start watching");
    println!("2. Only start watching (don't organize existing files)");
    println!("3. Move all sorted files back to the source directory");
    println!("4. Exit");
    print!("\nEnter your choice (1-4): ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| e.to_string())?;

    match line.trim() {
        "1" => Ok(Mode::SweepWatch),
        "2" => Ok(Mode::Watch),
        "3" => Ok(Mode::Reverse),
        "4" | "" => Ok(Mode::Exit),
        other => Err(format!("Invalid choice: {}", other)),
    }
}

/// Arms the cooperative stop flag and flips it when the operator presses
/// Enter. The watch loop observes the flag between notification ticks.
fn spawn_stop_listener() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    println!("Press Enter to stop watching.");
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        flag.store(true, Ordering::Relaxed);
    });

    stop
}
