use std::fmt::Write;

use crate::core::Sentiment;
use crate::service::Prediction;

pub const STYLESHEET: &str = r#"html { font-family: "Helvetica Neue", Arial, sans-serif; }
body { width: 600px; margin: 40px auto; color: #222; }
h2 { color: #2b4b6f; }
textarea { width: 100%; font-size: 1em; }
.errors { color: #b00020; list-style: none; padding: 0; }
.prediction { font-weight: bold; }
.positive { color: #2e7d32; }
.negative { color: #c62828; }
.review { border-left: 3px solid #ccc; padding: 0 10px; white-space: pre-wrap; }
input[type=submit] { margin: 10px 10px 0 0; padding: 4px 16px; }
"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/static/style.css\">\n\
         </head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// The review form, optionally prefilled and annotated with validation errors.
pub fn review_form(review: &str, errors: &[String]) -> String {
    let mut body = String::from("<h2>Please enter your movie review:</h2>\n");
    if !errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for e in errors {
            let _ = writeln!(body, "<li>{}</li>", escape_html(e));
        }
        body.push_str("</ul>\n");
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"/results\">\n\
         <textarea name=\"moviereview\" rows=\"10\" cols=\"60\">{}</textarea>\n\
         <div><input type=\"submit\" value=\"Submit review\"></div>\n\
         </form>\n",
        escape_html(review)
    );
    page("Movie Classification", &body)
}

pub fn results(review: &str, prediction: &Prediction) -> String {
    let label: &'static str = prediction.sentiment.into();
    let review = escape_html(review);
    let mut body = String::new();
    let _ = write!(
        body,
        "<h2>Your movie review:</h2>\n\
         <div class=\"review\">{review}</div>\n\
         <h2>Prediction:</h2>\n\
         <p>This movie review is <span class=\"prediction {label}\">{label}</span> \
         (probability: {:.2}%).</p>\n\
         <form method=\"post\" action=\"/thanks\">\n\
         <input type=\"hidden\" name=\"review\" value=\"{review}\">\n\
         <input type=\"hidden\" name=\"prediction\" value=\"{label}\">\n\
         <input type=\"submit\" name=\"feedback_button\" value=\"Correct\">\n\
         <input type=\"submit\" name=\"feedback_button\" value=\"Incorrect\">\n\
         </form>\n\
         <p><a href=\"/\">Submit another review</a></p>\n",
        prediction.percent()
    );
    page("Prediction", &body)
}

pub fn thanks(label: Sentiment) -> String {
    let body = format!(
        "<h2>Thank you for your feedback!</h2>\n\
         <p>The review was recorded as {label}.</p>\n\
         <p><a href=\"/\">Submit another review</a></p>\n"
    );
    page("Thank you", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h2>Something went wrong</h2>\n<p>{}</p>\n<p><a href=\"/\">Back</a></p>\n",
        escape_html(message)
    );
    page("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn results_carry_hidden_fields_and_percentage() {
        let html = results(
            "A <great> movie",
            &Prediction {
                sentiment: Sentiment::Positive,
                probability: 0.972_724_55,
            },
        );
        assert!(html.contains("97.27%"));
        assert!(html.contains(r#"name="prediction" value="positive""#));
        assert!(html.contains(r#"name="review" value="A &lt;great&gt; movie""#));
        assert!(html.contains(r#"value="Correct""#));
        assert!(html.contains(r#"value="Incorrect""#));
        assert!(!html.contains("<great>"));
    }

    #[test]
    fn form_lists_errors() {
        let html = review_form("short", &["Field must be at least 15 characters long.".into()]);
        assert!(html.contains("<li>Field must be at least 15 characters long.</li>"));
        assert!(html.contains(">short</textarea>"));
    }
}
