use crate::classifiers::{ClassifierState, FitSummary, OnlineClassifier};
use crate::core::Sentiment;
use crate::error::Result;
use crate::vectorizer::SparseVector;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Clone)]
pub struct PartialFitSpyHandle {
    calls: Arc<AtomicU64>,
    samples: Arc<AtomicU64>,
    labels: Arc<Mutex<Vec<Sentiment>>>,
}

impl PartialFitSpyHandle {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn samples(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }

    /// Every label passed to `partial_fit`, in call order.
    pub fn labels(&self) -> Vec<Sentiment> {
        self.labels.lock().clone()
    }
}

/// Wraps a real classifier and records what it was trained on.
pub struct PartialFitSpyClassifier {
    inner: Box<dyn OnlineClassifier>,
    handle: PartialFitSpyHandle,
}

impl PartialFitSpyClassifier {
    pub fn wrap(inner: Box<dyn OnlineClassifier>) -> (Self, PartialFitSpyHandle) {
        let handle = PartialFitSpyHandle {
            calls: Arc::new(AtomicU64::new(0)),
            samples: Arc::new(AtomicU64::new(0)),
            labels: Arc::new(Mutex::new(Vec::new())),
        };
        (
            Self {
                inner,
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl OnlineClassifier for PartialFitSpyClassifier {
    fn predict_proba(&self, x: &SparseVector) -> [f64; 2] {
        self.inner.predict_proba(x)
    }

    fn partial_fit(&mut self, xs: &[SparseVector], ys: &[Sentiment]) -> Result<FitSummary> {
        self.handle.calls.fetch_add(1, Ordering::Relaxed);
        self.handle
            .samples
            .fetch_add(ys.len() as u64, Ordering::Relaxed);
        self.handle.labels.lock().extend_from_slice(ys);
        self.inner.partial_fit(xs, ys)
    }

    fn export_state(&self) -> ClassifierState {
        self.inner.export_state()
    }
}
