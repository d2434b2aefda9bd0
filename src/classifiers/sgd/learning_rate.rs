use serde::{Deserialize, Serialize};

use crate::classifiers::sgd::LogLoss;

/// Step-size schedule. `t` counts samples seen, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LearningRate {
    /// `1 / (alpha * (t0 + t - 1))` with `t0` from the typical-weight heuristic.
    Optimal,
    Constant { eta0: f64 },
    InvScaling { eta0: f64, power_t: f64 },
}

impl Default for LearningRate {
    fn default() -> Self {
        LearningRate::Optimal
    }
}

impl LearningRate {
    pub fn eta(&self, t: f64, alpha: f64) -> f64 {
        match *self {
            LearningRate::Optimal => 1.0 / (alpha * (optimal_init(alpha) + t - 1.0)),
            LearningRate::Constant { eta0 } => eta0,
            LearningRate::InvScaling { eta0, power_t } => eta0 / t.powf(power_t),
        }
    }
}

/// Offset chosen so the first step is about the size of a typical weight
/// for a model regularized by `alpha`.
pub fn optimal_init(alpha: f64) -> f64 {
    let typw = (1.0 / alpha.sqrt()).sqrt();
    let initial_eta0 = typw / (-LogLoss::dloss(-typw, 1.0)).max(1.0);
    1.0 / (initial_eta0 * alpha)
}
