mod stopwords;
mod tokenizer;

pub use stopwords::StopwordSet;
pub use tokenizer::Tokenizer;
