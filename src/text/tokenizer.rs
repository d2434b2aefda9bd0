use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::StopwordSet;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Valid markup tag regex"));

static EMOTICON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?::|;|=)(?:-)?(?:\)|\(|D|P)").expect("Valid emoticon regex")
});

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("Valid non-word regex"));

/// Splits review text into lowercase word tokens plus emoticons.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: Arc<StopwordSet>,
}

impl Tokenizer {
    pub fn new(stopwords: Arc<StopwordSet>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let stripped = TAG.replace_all(text, "");
        let lowered = stripped.to_lowercase();

        let emoticons = EMOTICON
            .find_iter(&lowered)
            .map(|m| m.as_str().replace('-', ""));

        let words = NON_WORD.replace_all(&lowered, " ");

        words
            .split_whitespace()
            .map(str::to_owned)
            .chain(emoticons)
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }
}
