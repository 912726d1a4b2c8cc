use std::cmp::Ordering;

use num::{Float, NumCast};

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Float,
{
    /// ドット積
    /// Both index arrays are sorted, so a single merge pass is enough.
    ///
    /// # Arguments
    /// * `other` - the other vector
    ///
    /// # Returns
    /// * `f64` - accumulated in f64 regardless of `N`
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let (a_ind, a_val) = (self.as_ind_slice(), self.as_val_slice());
        let (b_ind, b_val) = (other.as_ind_slice(), other.as_val_slice());
        if a_ind.is_empty() || b_ind.is_empty() {
            return 0.0;
        }

        let mut result = 0_f64;
        let mut i = 0;
        let mut j = 0;
        while i < a_ind.len() && j < b_ind.len() {
            match a_ind[i].cmp(&b_ind[j]) {
                Ordering::Equal => {
                    result += a_val[i].to_f64().unwrap_or(0.0) * b_val[j].to_f64().unwrap_or(0.0);
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// Euclidean (L2) norm
    #[inline]
    pub fn norm(&self) -> f64 {
        self.as_val_slice()
            .iter()
            .map(|v| {
                let v = v.to_f64().unwrap_or(0.0);
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Scale to unit length in place.
    /// A zero vector stays the zero vector.
    pub fn normalize_l2(&mut self) -> &mut Self {
        let norm = self.norm();
        if norm > 0.0 && norm.is_finite() {
            let inv = <N as NumCast>::from(1.0 / norm).unwrap_or_else(N::zero);
            for v in self.val.iter_mut() {
                *v = *v * inv;
            }
        }
        self
    }
}
