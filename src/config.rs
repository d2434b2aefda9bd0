use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const MIN_REVIEW_CHARS: usize = 15;

/// Locations of every persisted artifact, all derived from one data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join("model")
    }

    pub fn classifier(&self) -> PathBuf {
        self.model_dir().join("classifier.bin")
    }

    pub fn stopwords(&self) -> PathBuf {
        self.model_dir().join("stopwords.json")
    }

    pub fn database(&self) -> PathBuf {
        self.data_dir.join("reviews.sqlite")
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Save the model after every feedback update.
    pub persist_feedback: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 5000).into(),
            persist_feedback: true,
        }
    }
}
