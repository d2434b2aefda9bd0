use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SentimentError};
use crate::storage::atomic_write;
use crate::text::StopwordSet;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StopwordFile {
    format_version: u32,
    words: StopwordSet,
}

#[derive(Debug, Clone)]
pub struct StopwordStore {
    path: PathBuf,
}

impl StopwordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<StopwordSet> {
        if !self.path.exists() {
            return Err(SentimentError::missing(&self.path));
        }
        let file: StopwordFile = serde_json::from_reader(BufReader::new(File::open(&self.path)?))?;
        if file.format_version != FORMAT_VERSION {
            return Err(SentimentError::UnsupportedFormat {
                path: self.path.clone(),
                found: file.format_version,
                supported: FORMAT_VERSION,
            });
        }
        Ok(file.words)
    }

    pub fn save(&self, words: &StopwordSet) -> Result<()> {
        let file = StopwordFile {
            format_version: FORMAT_VERSION,
            words: words.clone(),
        };
        atomic_write(&self.path, |w| Ok(serde_json::to_writer_pretty(w, &file)?))?;
        info!(
            "{} stopwords saved to {}",
            words.len(),
            self.path.display()
        );
        Ok(())
    }
}
