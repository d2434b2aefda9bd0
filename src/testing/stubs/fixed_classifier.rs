use crate::classifiers::sgd::SgdState;
use crate::classifiers::{ClassifierState, FitSummary, OnlineClassifier, SgdConfig};
use crate::core::Sentiment;
use crate::error::{Result, SentimentError};
use crate::vectorizer::{DEFAULT_N_FEATURES, SparseVector};

/// Always answers with the same probability and never learns.
pub struct FixedClassifier {
    positive: f64,
    n_features: usize,
    samples_seen: u64,
}

impl FixedClassifier {
    pub fn new(positive: f64) -> Self {
        Self {
            positive: positive.clamp(0.0, 1.0),
            n_features: DEFAULT_N_FEATURES,
            samples_seen: 0,
        }
    }
}

impl Default for FixedClassifier {
    fn default() -> Self {
        Self::new(0.75)
    }
}

impl OnlineClassifier for FixedClassifier {
    fn predict_proba(&self, _x: &SparseVector) -> [f64; 2] {
        [1.0 - self.positive, self.positive]
    }

    fn partial_fit(&mut self, xs: &[SparseVector], ys: &[Sentiment]) -> Result<FitSummary> {
        if xs.len() != ys.len() {
            return Err(SentimentError::invalid("xs and ys differ in length"));
        }
        self.samples_seen += ys.len() as u64;
        Ok(FitSummary {
            samples: ys.len(),
            mean_loss: if ys.is_empty() { f64::NAN } else { 0.0 },
        })
    }

    /// A zero-weight linear model of the same width.
    fn export_state(&self) -> ClassifierState {
        ClassifierState::Sgd(SgdState {
            config: SgdConfig::default(),
            n_features: self.n_features,
            weights: Vec::new(),
            intercept: 0.0,
            t: 1.0 + self.samples_seen as f64,
            samples_seen: self.samples_seen,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ModelStore;
    use crate::vectorizer::VectorizerConfig;
    use tempfile::TempDir;

    #[test]
    fn exported_state_can_be_checkpointed() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("classifier.bin"));
        let mut stub = FixedClassifier::default();
        stub.partial_fit(&[SparseVector::zeros(DEFAULT_N_FEATURES)], &[Sentiment::Positive])
            .unwrap();

        store.save(&VectorizerConfig::default(), &stub).unwrap();
        let (_, restored) = store.load().unwrap().into_classifier().unwrap();
        let ClassifierState::Sgd(state) = restored.export_state();
        assert_eq!(state.samples_seen, 1);
        assert_eq!(state.n_features, DEFAULT_N_FEATURES);
    }
}
