use std::fmt::Debug;

use num::Float;
use rayon::prelude::*;

use crate::{recommender::tfidf::TFIDFMatrix, utils::math::vector::ZeroSpVec};

/// Read-only view answering similarity queries over a fitted matrix.
/// Every row is unit length, so cosine similarity is a plain dot product.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityIndex<'a, N = f32>
where
    N: Float,
{
    matrix: &'a TFIDFMatrix<N>,
}

impl<'a, N> SimilarityIndex<'a, N>
where
    N: Float + Send + Sync,
{
    pub fn new(matrix: &'a TFIDFMatrix<N>) -> Self {
        Self { matrix }
    }

    /// Cosine similarity of `query` against every row, in row order.
    /// The query's own row is not skipped here.
    pub fn score_all(&self, query: &ZeroSpVec<N>) -> Hits<usize> {
        let list = self
            .matrix
            .rows
            .par_iter()
            .enumerate()
            .map(|(id, row)| (id, row.dot(query)))
            .collect();
        Hits::new(list)
    }
}

/// Scored results
pub struct Hits<K> {
    /// (key, score)
    pub list: Vec<(K, f64)>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<(K, f64)>) -> Self {
        Hits { list }
    }

    /// Sort by descending score.
    /// Stable: equal scores keep their current order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        // NaN は除外
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (K, f64)> {
        self.list.iter()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (key, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}
