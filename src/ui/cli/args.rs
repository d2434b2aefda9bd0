use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::config::{DEFAULT_ADDR, DEFAULT_BATCH_SIZE, DEFAULT_DATA_DIR, DataPaths, ServerConfig};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Movie review sentiment classifier that learns from user feedback"
)]
pub struct Cli {
    /// Directory holding the model, stopwords and review log
    #[arg(
        long,
        global = true,
        env = "REVIEWSENSE_DATA_DIR",
        default_value = DEFAULT_DATA_DIR,
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
    )]
    pub data_dir: PathBuf,

    /// Log filter (e.g. info, debug, reviewsense=trace)
    #[arg(
        long,
        global = true,
        env = "REVIEWSENSE_LOG",
        default_value = "info",
        value_name = "FILTER"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the stopword file, a bootstrap classifier and an empty review log
    Setup,
    /// Replay the review log into the stored classifier
    Update(UpdateArgs),
    /// Serve the review web UI
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Reviews per partial fit
    #[arg(
        long,
        default_value_t = DEFAULT_BATCH_SIZE,
        value_name = "N",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
    )]
    pub batch_size: usize,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_ADDR, value_name = "ADDR")]
    pub addr: SocketAddr,

    /// Keep feedback updates in memory instead of saving the model each time
    #[arg(long)]
    pub no_persist: bool,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            addr: self.addr,
            persist_feedback: !self.no_persist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["reviewsense", "update"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        match cli.command {
            Command::Update(args) => assert_eq!(args.batch_size, DEFAULT_BATCH_SIZE),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "reviewsense",
            "serve",
            "--data-dir",
            "/tmp/reviews",
            "--addr",
            "0.0.0.0:8080",
            "--no-persist",
        ])
        .unwrap();
        assert_eq!(cli.paths().database(), PathBuf::from("/tmp/reviews/reviews.sqlite"));
        match cli.command {
            Command::Serve(args) => {
                let config = args.server_config();
                assert_eq!(config.addr.port(), 8080);
                assert!(!config.persist_feedback);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(Cli::try_parse_from(["reviewsense", "update", "--batch-size", "0"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["reviewsense"]).is_err());
    }
}
