use std::collections::BTreeMap;

/// Fixed-dimension vector storing only non-zero entries, sorted by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds from bucket accumulators. Buckets that summed to zero are dropped.
    pub fn from_buckets(dim: usize, buckets: BTreeMap<u32, f64>) -> Self {
        let mut indices = Vec::with_capacity(buckets.len());
        let mut values = Vec::with_capacity(buckets.len());
        for (index, value) in buckets {
            debug_assert!((index as usize) < dim);
            if value != 0.0 {
                indices.push(index);
                values.push(value);
            }
        }
        Self {
            dim,
            indices,
            values,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices
            .iter()
            .zip(&self.values)
            .map(|(&i, &v)| (i as usize, v))
    }

    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&(index as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    pub fn norm_l2(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn normalize_l2(&mut self) {
        let norm = self.norm_l2();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Dot product against a dense vector. Indices past its end contribute nothing.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn sample() -> SparseVector {
        let mut buckets = BTreeMap::new();
        buckets.insert(7, 3.0);
        buckets.insert(1, -4.0);
        buckets.insert(4, 0.0);
        SparseVector::from_buckets(10, buckets)
    }

    #[test]
    fn zero_buckets_are_dropped_and_order_is_sorted() {
        let v = sample();
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, -4.0), (7, 3.0)]);
        assert_eq!(v.get(4), 0.0);
        assert_eq!(v.get(7), 3.0);
    }

    #[test]
    fn l2_normalization() {
        let mut v = sample();
        assert!((v.norm_l2() - 5.0).abs() < EPS);
        v.normalize_l2();
        assert!((v.norm_l2() - 1.0).abs() < EPS);
        assert!((v.get(1) + 0.8).abs() < EPS);
    }

    #[test]
    fn normalizing_empty_vector_is_a_no_op() {
        let mut v = SparseVector::zeros(3);
        v.normalize_l2();
        assert!(v.is_empty());
        assert_eq!(v.dim(), 3);
    }

    #[test]
    fn dot_with_dense() {
        let v = sample();
        let mut w = vec![0.0; 10];
        w[1] = 0.5;
        w[7] = 2.0;
        assert!((v.dot(&w) - 4.0).abs() < EPS);
        assert_eq!(v.dot(&[1.0, 1.0]), -4.0);
    }
}
