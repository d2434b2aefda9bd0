use std::path::Path;
use std::sync::Arc;

use crate::classifiers::SgdConfig;
use crate::config::DataPaths;
use crate::tasks::run_setup;
use crate::text::{StopwordSet, Tokenizer};
use crate::vectorizer::{HashingVectorizer, VectorizerConfig};

/// Runs setup with default hyper-parameters under `root`.
pub fn bootstrap_data_dir(root: &Path) -> DataPaths {
    let paths = DataPaths::new(root);
    run_setup(&paths, VectorizerConfig::default(), SgdConfig::default())
        .expect("bootstrap setup failed");
    paths
}

pub fn english_vectorizer() -> Arc<HashingVectorizer> {
    let tokenizer = Tokenizer::new(Arc::new(StopwordSet::english()));
    Arc::new(
        HashingVectorizer::new(VectorizerConfig::default(), tokenizer)
            .expect("default vectorizer config is valid"),
    )
}
