pub mod math;

use std::fmt::{self, Debug};

use num::Num;
use serde::{Deserialize, Serialize};

/// ZeroSpVec is a sparse vector that treats zero elements as absent.
/// It keeps two parallel arrays:
/// - `ind`: the column index of every stored element
/// - `val`: the value of every stored element
///
/// Elements are always kept sorted by ascending `ind`, without duplicates.
/// `len` is the logical dimension of the vector, not the number of stored elements.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroSpVec<N>
where
    N: Num + Copy,
{
    ind: Vec<u32>,
    val: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new(len: usize) -> Self {
        ZeroSpVec {
            ind: Vec::new(),
            val: Vec::new(),
            len,
        }
    }

    #[inline]
    pub fn with_capacity(len: usize, cap: usize) -> Self {
        ZeroSpVec {
            ind: Vec::with_capacity(cap),
            val: Vec::with_capacity(cap),
            len,
        }
    }

    /// Build from unordered `(index, value)` pairs.
    /// Zero values are skipped, duplicated indices are summed.
    ///
    /// # Panics
    /// debug only: an index outside `len`
    pub fn from_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, N)>,
    {
        let mut pairs: Vec<(u32, N)> = pairs.into_iter().filter(|(_, v)| !v.is_zero()).collect();
        pairs.sort_unstable_by_key(|(i, _)| *i);

        let mut vec = Self::with_capacity(len, pairs.len());
        for (i, v) in pairs {
            debug_assert!((i as usize) < len, "index {i} out of range {len}");
            match vec.ind.last() {
                Some(&last) if last == i => {
                    if let Some(acc) = vec.val.last_mut() {
                        *acc = *acc + v;
                    }
                }
                _ => {
                    vec.ind.push(i);
                    vec.val.push(v);
                }
            }
        }
        vec
    }

    /// Logical dimension
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-zero elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.ind.len()
    }

    /// Get the value at `index`, zero when not stored
    #[inline]
    pub fn get(&self, index: u32) -> N {
        match self.ind.binary_search(&index) {
            Ok(pos) => self.val[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate over stored `(index, value)` pairs in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.ind.iter().copied().zip(self.val.iter().copied())
    }

    #[inline]
    pub fn as_ind_slice(&self) -> &[u32] {
        &self.ind
    }

    #[inline]
    pub fn as_val_slice(&self) -> &[N] {
        &self.val
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.ind.shrink_to_fit();
        self.val.shrink_to_fit();
    }
}

impl<N> Debug for ZeroSpVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "ZeroSpVec(len: {}, nnz: {}) [", self.len, self.nnz())?;
            for (i, v) in self.raw_iter() {
                writeln!(f, "    {i}: {v:?}")?;
            }
            write!(f, "]")
        } else {
            f.debug_map().entries(self.raw_iter()).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_merges_and_skips_zero() {
        let v = ZeroSpVec::from_pairs(8, vec![(5u32, 1.0f32), (1, 2.0), (5, 0.5), (3, 0.0)]);
        assert_eq!(v.len(), 8);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.as_ind_slice(), &[1, 5]);
        assert_eq!(v.as_val_slice(), &[2.0, 1.5]);
    }

    #[test]
    fn get_returns_zero_for_missing_index() {
        let v = ZeroSpVec::from_pairs(4, vec![(2u32, 3.0f64)]);
        assert_eq!(v.get(2), 3.0);
        assert_eq!(v.get(0), 0.0);
        assert_eq!(v.get(3), 0.0);
    }

    #[test]
    fn empty_vector_has_no_elements() {
        let v: ZeroSpVec<f32> = ZeroSpVec::new(0);
        assert!(v.is_empty());
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.raw_iter().count(), 0);
    }
}
