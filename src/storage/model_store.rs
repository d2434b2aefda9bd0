use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifiers::{ClassifierState, OnlineClassifier};
use crate::error::{Result, SentimentError};
use crate::storage::atomic_write;
use crate::vectorizer::VectorizerConfig;

const MAGIC: [u8; 4] = *b"RSNT";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct FileHeader {
    magic: [u8; 4],
    format_version: u32,
}

/// Everything needed to rebuild the prediction path: the classifier and the
/// vectorizer configuration it was trained against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub saved_at: DateTime<Utc>,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierState,
}

impl ModelFile {
    pub fn into_classifier(self) -> Result<(VectorizerConfig, Box<dyn OnlineClassifier>)> {
        let trained_on = self.classifier.n_features();
        if trained_on != self.vectorizer.n_features {
            return Err(SentimentError::VectorizerMismatch {
                expected: trained_on,
                found: self.vectorizer.n_features,
            });
        }
        Ok((self.vectorizer, self.classifier.into_classifier()?))
    }
}

#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<ModelFile> {
        if !self.path.exists() {
            return Err(SentimentError::missing(&self.path));
        }
        let mut reader = BufReader::new(File::open(&self.path)?);

        let header: FileHeader = bincode::deserialize_from(&mut reader)
            .map_err(|_| SentimentError::CorruptModel {
                path: self.path.clone(),
            })?;
        if header.magic != MAGIC {
            return Err(SentimentError::CorruptModel {
                path: self.path.clone(),
            });
        }
        if header.format_version != FORMAT_VERSION {
            return Err(SentimentError::UnsupportedFormat {
                path: self.path.clone(),
                found: header.format_version,
                supported: FORMAT_VERSION,
            });
        }

        let model: ModelFile = bincode::deserialize_from(&mut reader)?;
        debug!(
            "Loaded model from {} (saved {})",
            self.path.display(),
            model.saved_at
        );
        Ok(model)
    }

    pub fn save(&self, vectorizer: &VectorizerConfig, classifier: &dyn OnlineClassifier) -> Result<()> {
        let model = ModelFile {
            saved_at: Utc::now(),
            vectorizer: *vectorizer,
            classifier: classifier.export_state(),
        };
        self.write(&model)
    }

    pub fn write(&self, model: &ModelFile) -> Result<()> {
        let header = FileHeader {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
        };
        atomic_write(&self.path, |w| {
            bincode::serialize_into(&mut *w, &header)?;
            bincode::serialize_into(&mut *w, model)?;
            Ok(())
        })?;
        info!("Model saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{SgdClassifier, SgdConfig};
    use crate::core::Sentiment;
    use crate::text::{StopwordSet, Tokenizer};
    use crate::vectorizer::HashingVectorizer;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn trained() -> (HashingVectorizer, SgdClassifier) {
        let config = VectorizerConfig::default();
        let vectorizer =
            HashingVectorizer::new(config, Tokenizer::new(Arc::new(StopwordSet::english())))
                .unwrap();
        let mut clf = SgdClassifier::new(SgdConfig::default(), config.n_features);
        let xs = vectorizer.transform(&["Good movie", "Bad movie", "Wonderful plot"]);
        clf.partial_fit(
            &xs,
            &[Sentiment::Positive, Sentiment::Negative, Sentiment::Positive],
        )
        .unwrap();
        (vectorizer, clf)
    }

    #[test]
    fn missing_model_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("classifier.bin"));
        assert!(!store.exists());
        assert!(matches!(
            store.load(),
            Err(SentimentError::MissingFile { .. })
        ));
    }

    #[test]
    fn round_trip_predicts_identically() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("model").join("classifier.bin"));
        let (vectorizer, clf) = trained();

        store.save(vectorizer.config(), &clf).unwrap();
        let (config, restored) = store.load().unwrap().into_classifier().unwrap();
        assert_eq!(config, *vectorizer.config());

        let held_out = vectorizer.transform(&[
            "good plot but bad acting",
            "wonderful wonderful movie",
            "nothing in common",
        ]);
        for x in &held_out {
            assert_eq!(clf.predict(x), restored.predict(x));
            let (a, b) = (clf.predict_proba(x), restored.predict_proba(x));
            assert!((a[1] - b[1]).abs() < 1e-12, "live={a:?} restored={b:?}");
        }
    }

    #[test]
    fn save_overwrites_in_place() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("classifier.bin"));
        let (vectorizer, mut clf) = trained();
        store.save(vectorizer.config(), &clf).unwrap();

        let xs = vectorizer.transform(&["Good movie"]);
        clf.partial_fit(&xs, &[Sentiment::Negative]).unwrap();
        store.save(vectorizer.config(), &clf).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.classifier, clf.export_state());
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn foreign_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("classifier.bin");
        std::fs::write(&path, b"definitely not a model file").unwrap();
        assert!(matches!(
            ModelStore::new(&path).load(),
            Err(SentimentError::CorruptModel { .. })
        ));
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("classifier.bin");
        let header = FileHeader {
            magic: MAGIC,
            format_version: FORMAT_VERSION + 1,
        };
        std::fs::write(&path, bincode::serialize(&header).unwrap()).unwrap();

        match ModelStore::new(&path).load() {
            Err(SentimentError::UnsupportedFormat { found, .. }) => {
                assert_eq!(found, FORMAT_VERSION + 1)
            }
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_vectorizer_is_rejected() {
        let (vectorizer, clf) = trained();
        let model = ModelFile {
            saved_at: Utc::now(),
            vectorizer: VectorizerConfig {
                n_features: 1 << 10,
                ..*vectorizer.config()
            },
            classifier: clf.export_state(),
        };
        assert!(matches!(
            model.into_classifier(),
            Err(SentimentError::VectorizerMismatch { .. })
        ));
    }
}
