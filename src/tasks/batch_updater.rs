use std::sync::Arc;
use std::sync::mpsc::Sender;

use cpu_time::ThreadTime;
use tracing::{info, warn};

use crate::classifiers::OnlineClassifier;
use crate::config::DataPaths;
use crate::core::{ReviewRecord, Sentiment};
use crate::error::{Result, SentimentError};
use crate::service::Pipeline;
use crate::storage::{ModelStore, ReviewLog};
use crate::tasks::{BatchSnapshot, UpdateReport};
use crate::vectorizer::HashingVectorizer;

/// Replays the review log into a classifier, one `partial_fit` per batch.
///
/// Every row in the log is replayed on every run, including rows the live
/// server already trained on.
pub struct BatchUpdater {
    classifier: Box<dyn OnlineClassifier>,
    vectorizer: Arc<HashingVectorizer>,
    batch_size: usize,

    checkpoints: Option<ModelStore>,
    progress_tx: Option<Sender<BatchSnapshot>>,

    batches: usize,
    rows: u64,
    loss_sum: f64,

    start_cpu: ThreadTime,
}

impl BatchUpdater {
    pub fn new(
        classifier: Box<dyn OnlineClassifier>,
        vectorizer: Arc<HashingVectorizer>,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(SentimentError::invalid("batch_size must be > 0"));
        }

        Ok(Self {
            classifier,
            vectorizer,
            batch_size,
            checkpoints: None,
            progress_tx: None,
            batches: 0,
            rows: 0,
            loss_sum: 0.0,
            start_cpu: ThreadTime::now(),
        })
    }

    pub fn with_progress(mut self, tx: Sender<BatchSnapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Save the model after every batch.
    pub fn with_checkpoints(mut self, store: ModelStore) -> Self {
        self.checkpoints = Some(store);
        self
    }

    pub fn classifier(&self) -> &dyn OnlineClassifier {
        self.classifier.as_ref()
    }

    pub fn run(&mut self, log: &ReviewLog) -> Result<UpdateReport> {
        self.start_cpu = ThreadTime::now();
        self.batches = 0;
        self.rows = 0;
        self.loss_sum = 0.0;

        let batch_size = self.batch_size;
        log.for_each_batch(batch_size, |batch| self.train_on_batch(batch))?;

        let report = UpdateReport {
            batches: self.batches,
            rows: self.rows,
            mean_loss: if self.rows == 0 {
                f64::NAN
            } else {
                self.loss_sum / self.rows as f64
            },
            seconds: self.start_cpu.elapsed().as_secs_f64(),
        };
        if report.is_empty() {
            warn!("Review log {} is empty, nothing to replay", log.path().display());
        } else {
            info!("Batch update finished: {report}");
        }
        Ok(report)
    }

    fn train_on_batch(&mut self, batch: &[ReviewRecord]) -> Result<()> {
        let texts: Vec<&str> = batch.iter().map(|r| r.text.as_str()).collect();
        let labels: Vec<Sentiment> = batch.iter().map(|r| r.sentiment).collect();

        let xs = self.vectorizer.transform(&texts);
        let summary = self.classifier.partial_fit(&xs, &labels)?;

        self.batches += 1;
        self.rows += summary.samples as u64;
        self.loss_sum += summary.mean_loss * summary.samples as f64;

        if let Some(store) = &self.checkpoints {
            store.save(self.vectorizer.config(), self.classifier.as_ref())?;
        }

        let snapshot = BatchSnapshot {
            batch: self.batches,
            batch_size: batch.len(),
            rows_seen: self.rows,
            mean_loss: summary.mean_loss,
            seconds: self.start_cpu.elapsed().as_secs_f64(),
        };
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot);
        }
        Ok(())
    }
}

/// Loads the stored model and replays the whole log into it, saving a
/// checkpoint after every batch. The last checkpoint is the updated model; an
/// empty log leaves the file as it was.
pub fn update_model(
    paths: &DataPaths,
    batch_size: usize,
    progress: Option<Sender<BatchSnapshot>>,
) -> Result<UpdateReport> {
    for required in [paths.database(), paths.classifier()] {
        if !required.exists() {
            return Err(SentimentError::missing(required));
        }
    }

    let log = ReviewLog::open(paths.database())?;
    let pipeline = Pipeline::load(paths)?;
    let store = ModelStore::new(paths.classifier());

    let mut updater = BatchUpdater::new(pipeline.classifier, pipeline.vectorizer, batch_size)?
        .with_checkpoints(store);
    if let Some(tx) = progress {
        updater = updater.with_progress(tx);
    }

    info!(
        "Replaying {} logged reviews in batches of {}",
        log.count()?,
        batch_size
    );
    updater.run(&log)
}
