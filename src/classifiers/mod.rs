mod classifier;
pub mod sgd;
mod state;

pub use classifier::{FitSummary, OnlineClassifier};
pub use sgd::{SgdClassifier, SgdConfig};
pub use state::ClassifierState;
