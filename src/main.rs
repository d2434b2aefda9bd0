use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewsense::SentimentError;
use reviewsense::classifiers::SgdConfig;
use reviewsense::config::DataPaths;
use reviewsense::service::SentimentService;
use reviewsense::tasks::{BatchSnapshot, run_setup, update_model};
use reviewsense::ui::cli::args::{Cli, Command, ServeArgs, UpdateArgs};
use reviewsense::vectorizer::VectorizerConfig;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_RED: &str = "\x1b[31m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log filter '{}'", cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let paths = cli.paths();
    match cli.command {
        Command::Setup => setup(&paths),
        Command::Update(args) => update(&paths, &args),
        Command::Serve(args) => serve(&paths, &args),
    }
}

fn setup(paths: &DataPaths) -> Result<ExitCode> {
    let report = run_setup(paths, VectorizerConfig::default(), SgdConfig::default())
        .context("setup failed")?;

    println!("{BOLD}{FG_CYAN}▶ Setup complete{RESET}");
    println!(
        "  {DIM}stopwords{RESET}  {} words  {FG_GREY}{}{RESET}",
        report.stopwords,
        report.stopwords_path.display()
    );
    println!(
        "  {DIM}classifier{RESET} {} bootstrap reviews  {FG_GREY}{}{RESET}",
        report.bootstrap_samples,
        report.model_path.display()
    );
    println!(
        "  {DIM}review log{RESET} empty  {FG_GREY}{}{RESET}",
        report.database_path.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn update(paths: &DataPaths, args: &UpdateArgs) -> Result<ExitCode> {
    let header: Vec<String> = vec![
        format!("{BOLD}{FG_CYAN}▶ Batch Update{RESET}"),
        format!(
            "{DIM}batch_size={}{RESET}  {DIM}log={}{RESET}  {}",
            args.batch_size,
            paths.database().display(),
            timestamp_now()
        ),
        format!(
            "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
        ),
    ];

    let (tx, rx) = std::sync::mpsc::channel();
    let render = std::thread::spawn(move || render_batches_with_header(rx, header, 150));

    let outcome = update_model(paths, args.batch_size, Some(tx));
    let _ = render.join();

    match outcome {
        Ok(report) if report.is_empty() => {
            println!("{DIM}Review log is empty, model left as it was.{RESET}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(report) => {
            println!(
                "{FG_GREEN}{BOLD}✔ Model updated{RESET} with {} reviews in {} batches ({:.3}s CPU)",
                report.rows, report.batches, report.seconds
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(SentimentError::MissingFile { path }) => {
            eprintln!("{FG_RED}{BOLD}CRITICAL ERROR: required data file missing.{RESET}");
            for line in missing_file_report(paths, &path) {
                eprintln!("{line}");
            }
            eprintln!("{DIM}Run `reviewsense setup` first.{RESET}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("batch update failed"),
    }
}

fn missing_file_report(paths: &DataPaths, missing: &Path) -> Vec<String> {
    vec![
        format!("  missing:   {}", missing.display()),
        format!("  database:  {}", paths.database().display()),
        format!("  model:     {}", paths.classifier().display()),
        format!("  stopwords: {}", paths.stopwords().display()),
    ]
}

fn serve(paths: &DataPaths, args: &ServeArgs) -> Result<ExitCode> {
    let config = args.server_config();
    let service = SentimentService::open(paths, config.persist_feedback)
        .with_context(|| format!("failed to load model from {}", paths.data_dir().display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime
        .block_on(reviewsense::web::serve(config, Arc::new(service)))
        .context("server failed")?;
    Ok(ExitCode::SUCCESS)
}

/// Print header once, then one line per finished batch.
fn render_batches_with_header(
    rx: Receiver<BatchSnapshot>,
    header_lines: Vec<String>,
    repaint_every_ms: u64,
) {
    for line in &header_lines {
        println!("{line}");
    }
    let _ = io::stdout().flush();

    let tick = Duration::from_millis(repaint_every_ms);
    let mut last_draw = Instant::now();
    let mut pending: Vec<BatchSnapshot> = Vec::new();

    loop {
        match rx.recv_timeout(tick) {
            Ok(s) => pending.push(s),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                for s in pending.drain(..) {
                    println!("{}", format_batch(&s));
                }
                let _ = io::stdout().flush();
                break;
            }
        }

        if last_draw.elapsed() >= tick {
            for s in pending.drain(..) {
                println!("{}", format_batch(&s));
            }
            let _ = io::stdout().flush();
            last_draw = Instant::now();
        }
    }
}

fn format_batch(s: &BatchSnapshot) -> String {
    let loss = if s.mean_loss.is_nan() {
        format!("{DIM}NaN{RESET}")
    } else {
        format!("{:>10.6}", s.mean_loss)
    };
    format!(
        "{FG_GREEN}{BOLD}batch{RESET} {:>6}  \
         {FG_CYAN}{BOLD}size{RESET} {:>7}  \
         {FG_MAGENTA}{BOLD}seen{RESET} {:>9}  \
         {DIM}loss{RESET} {}  \
         {DIM}t{RESET} {:>9.6}s",
        s.batch, s.batch_size, s.rows_seen, loss, s.seconds
    )
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
