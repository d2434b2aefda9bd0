mod batch_updater;
mod progress;
mod setup;

pub use batch_updater::{BatchUpdater, update_model};
pub use progress::{BatchSnapshot, UpdateReport};
pub use setup::{BOOTSTRAP_REVIEWS, SetupReport, run_setup};
