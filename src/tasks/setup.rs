use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::classifiers::{OnlineClassifier, SgdClassifier, SgdConfig};
use crate::config::DataPaths;
use crate::core::Sentiment;
use crate::error::Result;
use crate::storage::{ModelStore, ReviewLog, StopwordStore};
use crate::text::{StopwordSet, Tokenizer};
use crate::vectorizer::{HashingVectorizer, VectorizerConfig};

/// Tiny labelled set that gives the first model something to say.
pub const BOOTSTRAP_REVIEWS: [(&str, Sentiment); 6] = [
    ("I love this movie it is fantastic and great", Sentiment::Positive),
    ("This film was terrible and boring", Sentiment::Negative),
    ("Absolutely wonderful acting and plot", Sentiment::Positive),
    ("I hated every minute of this bad movie", Sentiment::Negative),
    ("Good movie", Sentiment::Positive),
    ("Bad movie", Sentiment::Negative),
];

#[derive(Debug, Clone)]
pub struct SetupReport {
    pub stopwords: usize,
    pub bootstrap_samples: usize,
    pub stopwords_path: PathBuf,
    pub model_path: PathBuf,
    pub database_path: PathBuf,
}

/// Creates the data directory layout, the stopword file, a bootstrap-trained
/// classifier and an empty review log. An existing log is destroyed.
pub fn run_setup(
    paths: &DataPaths,
    vectorizer_config: VectorizerConfig,
    sgd_config: SgdConfig,
) -> Result<SetupReport> {
    fs::create_dir_all(paths.model_dir())?;
    info!("Data directory ready at {}", paths.data_dir().display());

    let stopwords = StopwordSet::english();
    StopwordStore::new(paths.stopwords()).save(&stopwords)?;
    let stopword_count = stopwords.len();

    let vectorizer = HashingVectorizer::new(vectorizer_config, Tokenizer::new(Arc::new(stopwords)))?;
    let (texts, labels): (Vec<&str>, Vec<Sentiment>) = BOOTSTRAP_REVIEWS.iter().copied().unzip();

    let mut classifier = SgdClassifier::new(sgd_config, vectorizer.n_features());
    let summary = classifier.partial_fit(&vectorizer.transform(&texts), &labels)?;
    info!(
        "Bootstrap classifier trained on {} reviews (mean loss {:.4})",
        summary.samples, summary.mean_loss
    );

    ModelStore::new(paths.classifier()).save(vectorizer.config(), &classifier)?;
    ReviewLog::create_fresh(paths.database())?;

    Ok(SetupReport {
        stopwords: stopword_count,
        bootstrap_samples: summary.samples,
        stopwords_path: paths.stopwords(),
        model_path: paths.classifier(),
        database_path: paths.database(),
    })
}
