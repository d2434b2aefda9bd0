use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tokio::task;
use tracing::{debug, error, warn};

use crate::error::SentimentError;
use crate::service::SentimentService;
use crate::web::forms::{FeedbackForm, ReviewForm};
use crate::web::templates;

/// Library errors rendered as an HTML error page.
#[derive(Debug)]
pub struct WebError(SentimentError);

impl From<SentimentError> for WebError {
    fn from(err: SentimentError) -> Self {
        WebError(err)
    }
}

impl From<task::JoinError> for WebError {
    fn from(err: task::JoinError) -> Self {
        WebError(SentimentError::Task(err))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SentimentError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Rejected request: {}", self.0);
        }
        (status, Html(templates::error_page(&self.0.to_string()))).into_response()
    }
}

pub async fn index() -> Html<String> {
    Html(templates::review_form("", &[]))
}

pub async fn results(
    State(service): State<Arc<SentimentService>>,
    Form(form): Form<ReviewForm>,
) -> Result<Html<String>, WebError> {
    let review = match form.validate() {
        Ok(review) => review.to_string(),
        Err(errors) => {
            debug!("Review rejected by validation: {errors:?}");
            return Ok(Html(templates::review_form(&form.moviereview, &errors)));
        }
    };

    let (review, prediction) = task::spawn_blocking(move || {
        let prediction = service.classify(&review);
        (review, prediction)
    })
    .await?;
    debug!(
        "Classified review as {} ({:.4})",
        prediction.sentiment, prediction.probability
    );
    Ok(Html(templates::results(&review, &prediction)))
}

pub async fn thanks(
    State(service): State<Arc<SentimentService>>,
    Form(form): Form<FeedbackForm>,
) -> Result<Html<String>, WebError> {
    let (feedback, shown) = form.parse()?;
    let review = form.review;

    let label =
        task::spawn_blocking(move || service.record_feedback(&review, shown, feedback)).await??;
    Ok(Html(templates::thanks(label)))
}

pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        templates::STYLESHEET,
    )
}
