use serde::{Deserialize, Serialize};

use crate::classifiers::OnlineClassifier;
use crate::classifiers::sgd::{SgdClassifier, SgdState};
use crate::error::Result;

/// Serializable form of every classifier the model file can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassifierState {
    Sgd(SgdState),
}

impl ClassifierState {
    pub fn n_features(&self) -> usize {
        match self {
            ClassifierState::Sgd(state) => state.n_features,
        }
    }

    pub fn into_classifier(self) -> Result<Box<dyn OnlineClassifier>> {
        match self {
            ClassifierState::Sgd(state) => Ok(Box::new(SgdClassifier::from_state(state)?)),
        }
    }
}
