//! Minutes CLI - meeting intelligence from transcripts
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{CommandFactory, Parser, Subcommand};
use minutes::report::{self, ReportOptions};
use minutes::transcript::DEMO_TRANSCRIPT;
use minutes::{analyze, Config, Format, Transcript};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "minutes")]
#[command(author, version, about = "Meeting intelligence from raw transcripts", long_about = None)]
struct Cli {
    /// Log every rule match
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transcript file, or text piped on stdin
    Analyze {
        /// Transcript file (UTF-8 text)
        file: Option<PathBuf>,
        /// Meeting title used in the report header
        #[arg(long)]
        title: Option<String>,
        /// Report format
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// Write the report to a file, or into a directory with a generated name
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Analyze the built-in executive demo transcript
    Demo {
        /// Report format
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
    /// Print the JSON schema of the export format
    Schema,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            title,
            format,
            out,
        } => {
            let config = Config::load()?;
            let bytes = read_input(file.as_deref())?;
            let transcript = Transcript::from_bytes(bytes).context("cannot analyze input")?;
            if transcript.is_blank() {
                eprintln!("Warning: the transcript is empty");
            }

            let mut options = ReportOptions::from(&config.report);
            if let Some(title) = title {
                options.title = title;
            }
            let format = format.unwrap_or(config.output.format);

            run(&transcript, &options, format, out.as_deref(), &config)?;
        }
        Commands::Demo { format } => {
            let config = Config::load()?;
            let mut options = ReportOptions::from(&config.report);
            options.title = "Executive Strategy Meeting".to_string();
            let format = format.unwrap_or(config.output.format);

            run(&Transcript::from(DEMO_TRANSCRIPT), &options, format, None, &config)?;
        }
        Commands::Schema => {
            println!("{}", report::export_schema()?);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "minutes", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Analyze, render and emit one report
fn run(
    transcript: &Transcript,
    options: &ReportOptions,
    format: Format,
    out: Option<&Path>,
    config: &Config,
) -> anyhow::Result<()> {
    let to_stdout = out.map_or(true, |p| p == Path::new("-"));
    if !config.output.color || !to_stdout || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let result = analyze(transcript.as_str());
    log::info!(
        "found {} decisions and {} action items",
        result.decisions.len(),
        result.action_items.len()
    );

    let now = Local::now();
    let rendered = report::render(&result, options, format, now)?;

    match out {
        Some(path) if !to_stdout => {
            let target = output_path(path, format, now);
            std::fs::write(&target, rendered)
                .with_context(|| format!("failed to write {}", target.display()))?;
            println!("Saved report to {}", target.display());
        }
        _ => print!("{}", rendered),
    }

    Ok(())
}

/// Resolve `--out`: a directory gets a generated file name inside it
fn output_path(path: &Path, format: Format, now: DateTime<Local>) -> PathBuf {
    if path.is_dir() {
        path.join(report::default_file_name(format, now))
    } else {
        path.to_path_buf()
    }
}

/// Read the transcript from a file, or from stdin when it is piped
fn read_input(file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            if atty::is(atty::Stream::Stdin) {
                bail!("no transcript given: pass a FILE or pipe text on stdin");
            }
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Ok(bytes)
        }
    }
}
