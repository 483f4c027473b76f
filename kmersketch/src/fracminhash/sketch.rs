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

use crate::common::ratio_or;
use crate::error::Error;
use crate::hash::KmerHasher;
use crate::source::KmerSource;
use crate::source::feed_hashed;

/// Accumulates the retained hashes of one input.
///
/// Configuration and accumulation share one type: set the options, feed
/// hashes with [`update`](Self::update), then [`build`](Self::build) the
/// read-only sorted sketch.
#[derive(Debug, Clone)]
pub struct FracMinHashBuilder {
    scale: f64,
    max_hash: u64,
    deduplicate: bool,
    hashes: Vec<u64>,
}

impl FracMinHashBuilder {
    /// Create a builder retaining hashes at or below `scale * u64::MAX`.
    ///
    /// # Errors
    ///
    /// Returns a config error if `scale` is not in `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kmersketch::fracminhash::FracMinHashBuilder;
    /// let mut builder = FracMinHashBuilder::new(0.5).unwrap();
    /// builder.update(1);
    /// builder.update(u64::MAX);
    /// let sketch = builder.build();
    /// assert_eq!(sketch.hashes(), &[1]);
    /// assert!(FracMinHashBuilder::new(0.0).is_err());
    /// ```
    pub fn new(scale: f64) -> Result<Self, Error> {
        if !((0.0..=1.0).contains(&scale) && scale > 0.0) {
            return Err(Error::config_invalid(format!(
                "scale must be in (0, 1], got {scale}"
            )));
        }
        Ok(Self {
            scale,
            // saturates to u64::MAX at scale 1
            max_hash: (scale * u64::MAX as f64) as u64,
            deduplicate: false,
            hashes: vec![],
        })
    }

    /// Collapse repeated hashes when building. Off by default.
    pub fn deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    /// Retain `hash` if it falls under the threshold.
    #[inline]
    pub fn update(&mut self, hash: u64) {
        if hash <= self.max_hash {
            self.hashes.push(hash);
        }
    }

    /// Take over the retained hashes of a builder fed from another part of
    /// the same input.
    ///
    /// # Panics
    ///
    /// Panics if the scales differ.
    pub fn merge(&mut self, other: FracMinHashBuilder) {
        assert_eq!(
            self.max_hash, other.max_hash,
            "cannot merge FracMinHash builders of different scale"
        );
        self.hashes.extend(other.hashes);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn max_hash(&self) -> u64 {
        self.max_hash
    }

    /// Number of hashes retained so far.
    pub fn num_retained(&self) -> usize {
        self.hashes.len()
    }

    /// Sort the retained hashes into a sketch.
    pub fn build(self) -> FracMinHashSketch {
        let mut hashes = self.hashes;
        hashes.sort_unstable();
        if self.deduplicate {
            hashes.dedup();
        }
        FracMinHashSketch {
            scale: self.scale,
            max_hash: self.max_hash,
            deduplicated: self.deduplicate,
            hashes,
        }
    }
}

/// Sorted hashes retained below a scaled threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FracMinHashSketch {
    scale: f64,
    max_hash: u64,
    deduplicated: bool,
    hashes: Vec<u64>,
}

impl FracMinHashSketch {
    /// Build a sketch from one pass over `source` with the options of
    /// `builder`.
    pub fn from_source<S: KmerSource + ?Sized>(
        source: &S,
        hasher: &dyn KmerHasher,
        mut builder: FracMinHashBuilder,
    ) -> Result<Self, Error> {
        feed_hashed(source, hasher, |hash| builder.update(hash))?;
        Ok(builder.build())
    }

    /// Retained hashes in ascending order.
    pub fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    /// Number of retained entries, repeats included unless deduplicated.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn max_hash(&self) -> u64 {
        self.max_hash
    }

    pub fn is_deduplicated(&self) -> bool {
        self.deduplicated
    }

    /// Number of distinct retained hashes.
    pub fn num_distinct(&self) -> usize {
        if self.hashes.is_empty() {
            return 0;
        }
        1 + self.hashes.windows(2).filter(|w| w[0] != w[1]).count()
    }

    /// Estimate the cardinality of the input as `distinct retained / scale`.
    pub fn cardinality_estimate(&self) -> f64 {
        self.num_distinct() as f64 / self.scale
    }

    /// Count entries common to both sketches.
    ///
    /// Walks the two sorted sequences in step. Each matching pair consumes
    /// one entry from each side, so a hash repeated `x` times here and `y`
    /// times there contributes `min(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the scales differ.
    pub fn intersection_size(&self, other: &Self) -> usize {
        self.check_compatible(other);
        let (a, b) = (&self.hashes, &other.hashes);
        let (mut i, mut j) = (0, 0);
        let mut shared = 0;
        while i < a.len() && j < b.len() {
            if a[i] < b[j] {
                i += 1;
            } else if b[j] < a[i] {
                j += 1;
            } else {
                shared += 1;
                i += 1;
                j += 1;
            }
        }
        shared
    }

    /// Estimate the containment of this sketch's input in `other`'s.
    ///
    /// Returns `intersection / (|S_a| * (1 - (1 - s)^size_a))` where
    /// `size_a` is a cardinality estimate of this sketch's input. Two empty
    /// sketches score `1.0`; a zero denominator otherwise scores `0.0`.
    ///
    /// # Panics
    ///
    /// Panics if the scales differ.
    pub fn containment(&self, other: &Self, size_a: f64) -> f64 {
        self.check_compatible(other);
        if self.is_empty() && other.is_empty() {
            return 1.0;
        }
        let expected = self.len() as f64 * (1.0 - (1.0 - self.scale).powf(size_a));
        ratio_or(self.intersection_size(other) as f64, expected, 0.0)
    }

    fn check_compatible(&self, other: &Self) {
        assert_eq!(
            self.max_hash, other.max_hash,
            "FracMinHash sketches must share one scale"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::IdentityHasher;

    fn sketch(scale: f64, values: &[u64]) -> FracMinHashSketch {
        let mut builder = FracMinHashBuilder::new(scale).unwrap();
        values.iter().for_each(|&v| builder.update(v));
        builder.build()
    }

    #[test]
    fn test_scale_bounds() {
        assert!(FracMinHashBuilder::new(-0.1).is_err());
        assert!(FracMinHashBuilder::new(0.0).is_err());
        assert!(FracMinHashBuilder::new(1.5).is_err());
        assert!(FracMinHashBuilder::new(f64::NAN).is_err());
        assert_eq!(FracMinHashBuilder::new(1.0).unwrap().max_hash(), u64::MAX);
    }

    #[test]
    fn test_threshold_and_order() {
        let half = u64::MAX / 2;
        let s = sketch(0.5, &[u64::MAX, 30, half + 1024, 10, 20]);
        assert_eq!(s.hashes(), &[10, 20, 30]);
        assert!(s.hashes().iter().all(|&h| h <= s.max_hash()));
    }

    #[test]
    fn test_duplicates_kept_by_default() {
        let s = sketch(1.0, &[5, 5, 5, 6]);
        assert!(!s.is_deduplicated());
        assert_eq!(s.len(), 4);
        assert_eq!(s.num_distinct(), 2);

        let mut builder = FracMinHashBuilder::new(1.0).unwrap().deduplicate(true);
        [5u64, 5, 5, 6].iter().for_each(|&v| builder.update(v));
        let deduped = builder.build();
        assert!(deduped.is_deduplicated());
        assert_eq!(deduped.hashes(), &[5, 6]);
    }

    #[test]
    fn test_intersection_uses_multiset_semantics() {
        let a = sketch(1.0, &[1, 2, 2, 2, 3]);
        let b = sketch(1.0, &[2, 2, 3, 3, 4]);
        assert_eq!(a.intersection_size(&b), 3);
        assert_eq!(b.intersection_size(&a), 3);
    }

    #[test]
    fn test_containment_at_full_scale() {
        // at scale 1 the correction factor is exactly one
        let a = sketch(1.0, &[1, 2, 3, 4]);
        let b = sketch(1.0, &[3, 4, 5]);
        assert_eq!(a.containment(&b, 4.0), 0.5);
        assert_eq!(b.containment(&a, 3.0), 2.0 / 3.0);
    }

    #[test]
    fn test_containment_degenerate() {
        let empty = sketch(0.1, &[]);
        let some = sketch(1.0, &[1]);
        assert_eq!(empty.containment(&sketch(0.1, &[]), 0.0), 1.0);
        assert_eq!(sketch(1.0, &[]).containment(&some, 0.0), 0.0);
    }

    #[test]
    fn test_cardinality_estimate() {
        let s = sketch(1.0, &[1, 1, 2, 3]);
        assert_eq!(s.cardinality_estimate(), 3.0);
    }

    #[test]
    fn test_from_source_and_merge() {
        let values: Vec<u64> = (0..1000u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15)).collect();
        let (left, right) = values.split_at(400);

        let mut builder = FracMinHashBuilder::new(0.25).unwrap();
        left.iter().for_each(|&v| builder.update(v));
        let mut other = FracMinHashBuilder::new(0.25).unwrap();
        right.iter().for_each(|&v| other.update(v));
        builder.merge(other);

        let whole = FracMinHashSketch::from_source(
            &values,
            &IdentityHasher,
            FracMinHashBuilder::new(0.25).unwrap(),
        )
        .unwrap();
        assert_eq!(builder.build(), whole);
    }

    #[test]
    #[should_panic(expected = "share one scale")]
    fn test_scale_mismatch_rejected() {
        sketch(0.5, &[1]).intersection_size(&sketch(0.25, &[1]));
    }
}
