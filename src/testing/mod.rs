mod fixtures;
mod spies;
mod stubs;

pub use fixtures::{bootstrap_data_dir, english_vectorizer};
pub use spies::{PartialFitSpyClassifier, PartialFitSpyHandle};
pub use stubs::FixedClassifier;
