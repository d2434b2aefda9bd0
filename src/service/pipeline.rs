use std::sync::Arc;

use tracing::info;

use crate::classifiers::OnlineClassifier;
use crate::config::DataPaths;
use crate::error::Result;
use crate::storage::{ModelStore, StopwordStore};
use crate::text::Tokenizer;
use crate::vectorizer::HashingVectorizer;

/// A classifier together with the exact vectorizer it was trained with.
pub struct Pipeline {
    pub vectorizer: Arc<HashingVectorizer>,
    pub classifier: Box<dyn OnlineClassifier>,
}

impl Pipeline {
    /// Rebuilds the vectorizer from the configuration recorded in the model
    /// file, so prediction and training always hash the same way.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let model = ModelStore::new(paths.classifier()).load()?;
        let stopwords = StopwordStore::new(paths.stopwords()).load()?;

        let (config, classifier) = model.into_classifier()?;
        let vectorizer = HashingVectorizer::new(config, Tokenizer::new(Arc::new(stopwords)))?;
        info!("Pipeline loaded ({config})");

        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            classifier,
        })
    }
}
