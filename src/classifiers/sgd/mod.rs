mod learning_rate;
mod loss;
mod sgd_classifier;

pub use learning_rate::{LearningRate, optimal_init};
pub use loss::{LogLoss, sigmoid};
pub use sgd_classifier::{SgdClassifier, SgdConfig, SgdState};
