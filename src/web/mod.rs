mod forms;
mod handlers;
mod server;
mod templates;

pub use forms::{FeedbackForm, REQUIRED_MESSAGE, ReviewForm};
pub use handlers::WebError;
pub use server::{router, serve};
pub use templates::escape_html;
