// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Exact k-mer sets: the ground truth the sketches approximate.
//!
//! Memory grows with the number of distinct k-mers, so this is meant for
//! validating sketches on inputs that fit in memory.

use ahash::AHashSet;

use crate::common::ratio_or;
use crate::error::Error;
use crate::source::KmerSource;

/// The set of distinct k-mer codes of one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactKmerSet {
    kmers: AHashSet<u64>,
}

impl ExactKmerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every code from one pass over `source`.
    ///
    /// Codes are stored as produced; no hasher is applied since exact
    /// membership does not depend on bit distribution.
    pub fn from_source<S: KmerSource + ?Sized>(source: &S) -> Result<Self, Error> {
        let mut set = Self::new();
        source.for_each_kmer(&mut |kmer| set.insert(kmer))?;
        Ok(set)
    }

    /// Insert a code. Duplicates collapse.
    #[inline]
    pub fn insert(&mut self, kmer: u64) {
        self.kmers.insert(kmer);
    }

    pub fn contains(&self, kmer: u64) -> bool {
        self.kmers.contains(&kmer)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.kmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kmers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.kmers.iter().copied()
    }

    /// Add every code of `other` to this set.
    pub fn merge(&mut self, other: &Self) {
        self.kmers.extend(other.kmers.iter().copied());
    }

    /// Return `|A ∩ B|`.
    ///
    /// Iterates the smaller set (`self` on ties) and probes the larger.
    pub fn intersection_size(&self, other: &Self) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .kmers
            .iter()
            .filter(|&&k| large.kmers.contains(&k))
            .count()
    }

    /// Return the Jaccard index `|A ∩ B| / |A ∪ B|`.
    ///
    /// Two empty sets are identical (`1.0`); an empty set against a
    /// non-empty one scores `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kmersketch::exact::ExactKmerSet;
    /// let a = ExactKmerSet::from_source(&vec![1u64, 2, 3]).unwrap();
    /// let b = ExactKmerSet::from_source(&vec![2u64, 3, 4]).unwrap();
    /// assert_eq!(a.jaccard(&b), 0.5);
    /// ```
    pub fn jaccard(&self, other: &Self) -> f64 {
        let intersection = self.intersection_size(other);
        let union = self.len() + other.len() - intersection;
        ratio_or(intersection as f64, union as f64, 1.0)
    }

    /// Return the containment `|A ∩ B| / |A|` of `self` in `other`.
    ///
    /// An empty `self` is contained in an empty `other` (`1.0`) and in
    /// nothing else (`0.0`).
    pub fn containment(&self, other: &Self) -> f64 {
        if self.is_empty() {
            return if other.is_empty() { 1.0 } else { 0.0 };
        }
        self.intersection_size(other) as f64 / self.len() as f64
    }
}

impl FromIterator<u64> for ExactKmerSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            kmers: iter.into_iter().collect(),
        }
    }
}

impl Extend<u64> for ExactKmerSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        self.kmers.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[u64]) -> ExactKmerSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        let s = ExactKmerSet::from_source(&vec![7u64, 7, 7, 8]).unwrap();
        assert_eq!(s.len(), 2);
        assert!(s.contains(7));
        assert!(!s.contains(9));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let a = set(&[1, 2, 3, 4, 5]);
        let b = set(&[4, 5, 6]);
        assert_eq!(a.intersection_size(&b), 2);
        assert_eq!(b.intersection_size(&a), 2);
    }

    #[test]
    fn test_degenerate_jaccard() {
        let empty = ExactKmerSet::new();
        assert_eq!(empty.jaccard(&ExactKmerSet::new()), 1.0);
        assert_eq!(empty.jaccard(&set(&[1])), 0.0);
        assert_eq!(set(&[1]).jaccard(&empty), 0.0);
    }

    #[test]
    fn test_containment() {
        let a = set(&[1, 2]);
        let b = set(&[1, 2, 3, 4]);
        assert_eq!(a.containment(&b), 1.0);
        assert_eq!(b.containment(&a), 0.5);
        assert_eq!(ExactKmerSet::new().containment(&ExactKmerSet::new()), 1.0);
        assert_eq!(ExactKmerSet::new().containment(&a), 0.0);
    }

    #[test]
    fn test_merge_is_union() {
        let mut a = set(&[1, 2]);
        a.merge(&set(&[2, 3]));
        assert_eq!(a, set(&[1, 2, 3]));
    }
}
