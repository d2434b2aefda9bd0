mod hashing_vectorizer;
mod murmur3;
mod sparse_vector;

pub use hashing_vectorizer::{DEFAULT_N_FEATURES, HashingVectorizer, Norm, VectorizerConfig};
pub use murmur3::murmur3_32;
pub use sparse_vector::SparseVector;
