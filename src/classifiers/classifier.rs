use crate::classifiers::ClassifierState;
use crate::core::Sentiment;
use crate::error::Result;
use crate::vectorizer::SparseVector;

/// Outcome of one `partial_fit` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitSummary {
    pub samples: usize,
    /// Mean loss of each sample measured just before its update. NaN for an empty batch.
    pub mean_loss: f64,
}

/// A binary linear model that can be updated one small batch at a time.
///
/// The class set is always both `Sentiment` variants, so a batch holding a
/// single class never shrinks what the model can predict.
pub trait OnlineClassifier: Send {
    /// Class probabilities indexed by `Sentiment::index`.
    fn predict_proba(&self, x: &SparseVector) -> [f64; 2];

    fn predict(&self, x: &SparseVector) -> Sentiment {
        let proba = self.predict_proba(x);
        if proba[Sentiment::Positive.index()] > proba[Sentiment::Negative.index()] {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    fn partial_fit(&mut self, xs: &[SparseVector], ys: &[Sentiment]) -> Result<FitSummary>;

    fn export_state(&self) -> ClassifierState;
}
