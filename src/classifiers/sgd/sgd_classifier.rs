use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::classifiers::sgd::{LearningRate, LogLoss, sigmoid};
use crate::classifiers::{ClassifierState, FitSummary, OnlineClassifier};
use crate::core::Sentiment;
use crate::error::{Result, SentimentError};
use crate::vectorizer::SparseVector;

const MAX_DLOSS: f64 = 1e12;
const MIN_WSCALE: f64 = 1e-9;
const SPARSE_INTERCEPT_DECAY: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SgdConfig {
    /// L2 regularization strength.
    pub alpha: f64,
    pub learning_rate: LearningRate,
    pub fit_intercept: bool,
    /// Visit the samples of each `partial_fit` call in a seeded random order.
    pub shuffle: bool,
    pub seed: u64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            learning_rate: LearningRate::Optimal,
            fit_intercept: true,
            shuffle: false,
            seed: 1,
        }
    }
}

/// On-disk form of an `SgdClassifier`. Weights are stored sparsely, already scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgdState {
    pub config: SgdConfig,
    pub n_features: usize,
    pub weights: Vec<(u32, f64)>,
    pub intercept: f64,
    pub t: f64,
    pub samples_seen: u64,
}

/// Linear classifier trained by plain SGD on the log loss with L2 penalty.
///
/// The effective weight vector is `wscale * weights`, which turns the L2
/// shrink of every step into a single multiplication.
#[derive(Debug, Clone)]
pub struct SgdClassifier {
    config: SgdConfig,
    weights: Vec<f64>,
    wscale: f64,
    intercept: f64,
    t: f64,
    samples_seen: u64,
}

impl SgdClassifier {
    pub fn new(config: SgdConfig, n_features: usize) -> Self {
        Self {
            config,
            weights: vec![0.0; n_features],
            wscale: 1.0,
            intercept: 0.0,
            t: 1.0,
            samples_seen: 0,
        }
    }

    pub fn from_state(state: SgdState) -> Result<Self> {
        let mut clf = Self::new(state.config, state.n_features);
        for (index, value) in state.weights {
            let slot = clf.weights.get_mut(index as usize).ok_or_else(|| {
                SentimentError::invalid(format!(
                    "weight index {index} out of range for {} features",
                    state.n_features
                ))
            })?;
            *slot = value;
        }
        clf.intercept = state.intercept;
        clf.t = state.t;
        clf.samples_seen = state.samples_seen;
        Ok(clf)
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.weights.get(index).map_or(0.0, |w| w * self.wscale)
    }

    pub fn decision_function(&self, x: &SparseVector) -> f64 {
        x.dot(&self.weights) * self.wscale + self.intercept
    }

    fn check_dim(&self, x: &SparseVector) -> Result<()> {
        if x.dim() != self.weights.len() {
            return Err(SentimentError::VectorizerMismatch {
                expected: self.weights.len(),
                found: x.dim(),
            });
        }
        Ok(())
    }

    fn scale(&mut self, factor: f64) {
        self.wscale *= factor;
        if self.wscale < MIN_WSCALE {
            self.reset_wscale();
        }
    }

    fn reset_wscale(&mut self) {
        let wscale = self.wscale;
        for w in &mut self.weights {
            *w *= wscale;
        }
        self.wscale = 1.0;
    }

    fn add(&mut self, x: &SparseVector, update: f64) {
        let step = update / self.wscale;
        for (i, v) in x.iter() {
            self.weights[i] += v * step;
        }
    }

    fn step(&mut self, x: &SparseVector, y: Sentiment) -> f64 {
        let alpha = self.config.alpha;
        let target = y.signed();
        let p = self.decision_function(x);
        let loss = LogLoss::loss(p, target);

        let eta = self.config.learning_rate.eta(self.t, alpha);
        let dloss = LogLoss::dloss(p, target).clamp(-MAX_DLOSS, MAX_DLOSS);
        let update = -eta * dloss;

        self.scale((1.0 - eta * alpha).max(0.0));
        if update != 0.0 {
            self.add(x, update);
            if self.config.fit_intercept {
                self.intercept += update * SPARSE_INTERCEPT_DECAY;
            }
        }

        self.t += 1.0;
        self.samples_seen += 1;
        loss
    }

    fn visit_order(&self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        if self.config.shuffle {
            let mut rng = StdRng::seed_from_u64(self.config.seed ^ self.samples_seen);
            order.shuffle(&mut rng);
        }
        order
    }
}

impl OnlineClassifier for SgdClassifier {
    fn predict_proba(&self, x: &SparseVector) -> [f64; 2] {
        let positive = sigmoid(self.decision_function(x));
        [1.0 - positive, positive]
    }

    fn partial_fit(&mut self, xs: &[SparseVector], ys: &[Sentiment]) -> Result<FitSummary> {
        if xs.len() != ys.len() {
            return Err(SentimentError::invalid(format!(
                "got {} vectors but {} labels",
                xs.len(),
                ys.len()
            )));
        }
        for x in xs {
            self.check_dim(x)?;
        }

        let mut loss_sum = 0.0;
        for i in self.visit_order(xs.len()) {
            loss_sum += self.step(&xs[i], ys[i]);
        }

        let mean_loss = if xs.is_empty() {
            f64::NAN
        } else {
            loss_sum / xs.len() as f64
        };
        Ok(FitSummary {
            samples: xs.len(),
            mean_loss,
        })
    }

    fn export_state(&self) -> ClassifierState {
        let weights = self
            .weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(i, w)| (i as u32, w * self.wscale))
            .collect();

        ClassifierState::Sgd(SgdState {
            config: self.config,
            n_features: self.weights.len(),
            weights,
            intercept: self.intercept,
            t: self.t,
            samples_seen: self.samples_seen,
        })
    }
}
