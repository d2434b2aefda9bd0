use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::text::Tokenizer;
use crate::vectorizer::murmur3::murmur3_32;
use crate::vectorizer::SparseVector;

pub const DEFAULT_N_FEATURES: usize = 1 << 21;
const MAX_N_FEATURES: usize = 1 << 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Norm {
    L2,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub n_features: usize,
    pub alternate_sign: bool,
    pub norm: Norm,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            n_features: DEFAULT_N_FEATURES,
            alternate_sign: true,
            norm: Norm::L2,
        }
    }
}

impl Display for VectorizerConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "n_features={}, alternate_sign={}, norm={:?}",
            self.n_features, self.alternate_sign, self.norm
        )
    }
}

/// Stateless text-to-vector transform. There is no fitting step: the bucket of
/// a token depends only on its hash and `n_features`.
#[derive(Debug, Clone)]
pub struct HashingVectorizer {
    config: VectorizerConfig,
    tokenizer: Tokenizer,
}

impl HashingVectorizer {
    pub fn new(config: VectorizerConfig, tokenizer: Tokenizer) -> Result<Self> {
        if config.n_features == 0 || config.n_features > MAX_N_FEATURES {
            return Err(SentimentError::invalid(format!(
                "n_features must be in 1..={MAX_N_FEATURES}, got {}",
                config.n_features
            )));
        }
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.config.n_features
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SparseVector> {
        texts
            .iter()
            .map(|t| self.transform_one(t.as_ref()))
            .collect()
    }

    /// Undecodable byte sequences are skipped.
    pub fn transform_bytes(&self, raw: &[u8]) -> SparseVector {
        let text: String = raw.utf8_chunks().map(|chunk| chunk.valid()).collect();
        self.transform_one(&text)
    }

    pub fn transform_one(&self, text: &str) -> SparseVector {
        let mut buckets: BTreeMap<u32, f64> = BTreeMap::new();
        for token in self.tokenizer.tokenize(text) {
            let (index, sign) = self.bucket(&token);
            *buckets.entry(index).or_insert(0.0) += sign;
        }

        let mut vector = SparseVector::from_buckets(self.config.n_features, buckets);
        if self.config.norm == Norm::L2 {
            vector.normalize_l2();
        }
        vector
    }

    #[inline]
    fn bucket(&self, token: &str) -> (u32, f64) {
        let hash = murmur3_32(token.as_bytes(), 0) as i32;
        let index = (hash.unsigned_abs() as usize % self.config.n_features) as u32;
        let sign = if self.config.alternate_sign && hash < 0 {
            -1.0
        } else {
            1.0
        };
        (index, sign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StopwordSet;
    use std::sync::Arc;

    const EPS: f64 = 1e-12;

    fn vectorizer(config: VectorizerConfig) -> HashingVectorizer {
        let tokenizer = Tokenizer::new(Arc::new(StopwordSet::english()));
        HashingVectorizer::new(config, tokenizer).unwrap()
    }

    #[test]
    fn dimensionality_is_fixed() {
        let v = vectorizer(VectorizerConfig::default());
        let long = "an absolutely sprawling review ".repeat(500);
        for text in ["", "ok", "Good movie", long.as_str()] {
            assert_eq!(v.transform_one(text).dim(), DEFAULT_N_FEATURES);
        }
        let batch = v.transform(&["one text", "another text"]);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|x| x.dim() == DEFAULT_N_FEATURES));
    }

    #[test]
    fn buckets_and_signs_follow_the_signed_hash() {
        let v = vectorizer(VectorizerConfig::default());
        let x = v.transform_one("great movie");
        assert_eq!(x.nnz(), 2);
        let half = 1.0 / 2f64.sqrt();
        assert!((x.get(1_395_100) - half).abs() < EPS);
        assert!((x.get(730_602) + half).abs() < EPS);
    }

    #[test]
    fn output_is_l2_normalized() {
        let v = vectorizer(VectorizerConfig::default());
        let x = v.transform_one("great great great movie with a terrible ending");
        assert!((x.norm_l2() - 1.0).abs() < EPS);
    }

    #[test]
    fn no_norm_keeps_counts() {
        let v = vectorizer(VectorizerConfig {
            n_features: 16,
            alternate_sign: false,
            norm: Norm::None,
        });
        let x = v.transform_one("great great movie");
        assert_eq!(x.iter().map(|(_, c)| c).sum::<f64>(), 3.0);
    }

    #[test]
    fn deterministic_across_instances() {
        let a = vectorizer(VectorizerConfig::default());
        let b = vectorizer(VectorizerConfig::default());
        assert_eq!(
            a.transform_one("Wonderful acting :)"),
            b.transform_one("Wonderful acting :)")
        );
    }

    #[test]
    fn malformed_bytes_are_ignored() {
        let v = vectorizer(VectorizerConfig::default());
        let raw = b"great\xff\xfe movie";
        assert_eq!(v.transform_bytes(raw), v.transform_one("great movie"));
    }

    #[test]
    fn empty_text_gives_empty_vector() {
        let v = vectorizer(VectorizerConfig::default());
        assert!(v.transform_one("the and of").is_empty());
    }

    #[test]
    fn rejects_zero_features() {
        let tokenizer = Tokenizer::new(Arc::new(StopwordSet::english()));
        let cfg = VectorizerConfig {
            n_features: 0,
            ..VectorizerConfig::default()
        };
        assert!(matches!(
            HashingVectorizer::new(cfg, tokenizer),
            Err(SentimentError::InvalidInput(_))
        ));
    }
}
