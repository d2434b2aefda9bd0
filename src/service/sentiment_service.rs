use std::slice;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::classifiers::OnlineClassifier;
use crate::config::DataPaths;
use crate::core::{Feedback, Sentiment};
use crate::error::Result;
use crate::service::Pipeline;
use crate::storage::{ModelStore, ReviewLog};
use crate::vectorizer::HashingVectorizer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub sentiment: Sentiment,
    /// Probability of `sentiment`, in [0.5, 1].
    pub probability: f64,
}

impl Prediction {
    /// Probability as a percentage rounded to two decimals.
    pub fn percent(&self) -> f64 {
        (self.probability * 10_000.0).round() / 100.0
    }
}

/// Shared state behind the web handlers.
///
/// The classifier lock is held across both the update and the model save, so
/// concurrent feedback is applied one at a time and never lost.
pub struct SentimentService {
    vectorizer: Arc<HashingVectorizer>,
    classifier: Mutex<Box<dyn OnlineClassifier>>,
    log: Mutex<ReviewLog>,
    store: Option<ModelStore>,
}

impl SentimentService {
    pub fn new(
        vectorizer: Arc<HashingVectorizer>,
        classifier: Box<dyn OnlineClassifier>,
        log: ReviewLog,
    ) -> Self {
        Self {
            vectorizer,
            classifier: Mutex::new(classifier),
            log: Mutex::new(log),
            store: None,
        }
    }

    /// Persist the model after every feedback update.
    pub fn with_model_store(mut self, store: ModelStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn open(paths: &DataPaths, persist_feedback: bool) -> Result<Self> {
        let log = ReviewLog::open(paths.database())?;
        let pipeline = Pipeline::load(paths)?;
        let service = Self::new(pipeline.vectorizer, pipeline.classifier, log);
        Ok(if persist_feedback {
            service.with_model_store(ModelStore::new(paths.classifier()))
        } else {
            service
        })
    }

    pub fn vectorizer(&self) -> &HashingVectorizer {
        &self.vectorizer
    }

    pub fn classify(&self, text: &str) -> Prediction {
        let x = self.vectorizer.transform_one(text);
        let proba = self.classifier.lock().predict_proba(&x);

        let sentiment = if proba[Sentiment::Positive.index()] > proba[Sentiment::Negative.index()] {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };
        Prediction {
            sentiment,
            probability: proba[sentiment.index()],
        }
    }

    /// Trains on one review and appends it to the log. Returns the label used.
    ///
    /// The update, the model save and the log row succeed or fail together:
    /// on any failure the log row is rolled back and the model, in memory and
    /// on disk, is restored to its state before the call.
    pub fn record_feedback(
        &self,
        review: &str,
        shown: Sentiment,
        feedback: Feedback,
    ) -> Result<Sentiment> {
        let label = feedback.resolve(shown);
        let x = self.vectorizer.transform_one(review);

        let mut classifier = self.classifier.lock();
        let mut log = self.log.lock();

        let staged = log.stage_review(review, label, Utc::now())?;
        let before = classifier.export_state();
        classifier.partial_fit(slice::from_ref(&x), &[label])?;

        let committed = match &self.store {
            Some(store) => store.save(self.vectorizer.config(), &**classifier),
            None => Ok(()),
        }
        .and_then(|()| staged.commit());

        if let Err(e) = committed {
            warn!("Feedback not recorded, restoring previous model: {e}");
            *classifier = before.into_classifier()?;
            if let Some(store) = &self.store {
                store.save(self.vectorizer.config(), &**classifier)?;
            }
            return Err(e);
        }

        debug!("Feedback {feedback} on {shown} recorded as {label}");
        Ok(label)
    }

    pub fn logged_reviews(&self) -> Result<u64> {
        self.log.lock().count()
    }
}
