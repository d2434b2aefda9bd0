mod partial_fit_spy_classifier;

pub use partial_fit_spy_classifier::{PartialFitSpyClassifier, PartialFitSpyHandle};
