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

use std::sync::Arc;

use crate::error::Error;
use crate::exact::ExactKmerSet;
use crate::fracminhash::FracMinHashBuilder;
use crate::fracminhash::FracMinHashSketch;
use crate::fracminhash::jaccard_from_containment;
use crate::hash::HashFamily;
use crate::hash::KmerHasher;
use crate::hll::HllSketch;
use crate::minhash::MinHashSketch;
use crate::source::KmerSource;
use crate::source::feed_hashed;

/// A way to summarize a source and compare two summaries.
pub trait SimilarityEstimator: Send + Sync {
    /// Per-source summary. Read-only once built.
    type Sketch: Send + Sync;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Summarize one pass over `source`.
    fn build(&self, source: &dyn KmerSource) -> Result<Self::Sketch, Error>;

    /// Compare two summaries built by this estimator.
    fn similarity(&self, a: &Self::Sketch, b: &Self::Sketch) -> f64;
}

/// Exact Jaccard index over full k-mer sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactJaccard;

impl SimilarityEstimator for ExactJaccard {
    type Sketch = ExactKmerSet;

    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn build(&self, source: &dyn KmerSource) -> Result<ExactKmerSet, Error> {
        ExactKmerSet::from_source(source)
    }

    fn similarity(&self, a: &ExactKmerSet, b: &ExactKmerSet) -> f64 {
        a.jaccard(b)
    }
}

/// MinHash Jaccard estimate with one hash family shared by every sketch.
#[derive(Debug, Clone)]
pub struct MinHashJaccard {
    hasher: Arc<dyn KmerHasher>,
    family: Arc<HashFamily>,
}

impl MinHashJaccard {
    pub fn new(hasher: Arc<dyn KmerHasher>, family: HashFamily) -> Self {
        Self {
            hasher,
            family: Arc::new(family),
        }
    }

    pub fn family(&self) -> &Arc<HashFamily> {
        &self.family
    }
}

impl SimilarityEstimator for MinHashJaccard {
    type Sketch = MinHashSketch;

    fn name(&self) -> &'static str {
        "minhash"
    }

    fn build(&self, source: &dyn KmerSource) -> Result<MinHashSketch, Error> {
        MinHashSketch::from_source(source, self.hasher.as_ref(), self.family.clone())
    }

    fn similarity(&self, a: &MinHashSketch, b: &MinHashSketch) -> f64 {
        a.similarity(b)
    }
}

/// A FracMinHash sketch together with the HyperLogLog cardinality of the
/// same input.
#[derive(Debug, Clone)]
pub struct SizedFracMinHash {
    pub sketch: FracMinHashSketch,
    pub cardinality: f64,
}

/// Jaccard estimate derived from FracMinHash containment and HyperLogLog
/// cardinalities.
///
/// For a pair `(a, b)` the containment of `a` in `b` is computed with `a`'s
/// cardinality and converted with both cardinalities. The matrix builder
/// always passes the lower-indexed source as `a`.
#[derive(Debug, Clone)]
pub struct FracMinHashJaccard {
    hasher: Arc<dyn KmerHasher>,
    scale: f64,
    precision: u8,
    deduplicate: bool,
}

impl FracMinHashJaccard {
    /// # Errors
    ///
    /// Returns a config error if `scale` is not in `(0, 1]` or `precision`
    /// is not a valid HyperLogLog precision.
    pub fn new(hasher: Arc<dyn KmerHasher>, scale: f64, precision: u8) -> Result<Self, Error> {
        FracMinHashBuilder::new(scale)?;
        HllSketch::new(precision)?;
        Ok(Self {
            hasher,
            scale,
            precision,
            deduplicate: false,
        })
    }

    /// Collapse repeated hashes in every sketch. Off by default.
    pub fn deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }
}

impl SimilarityEstimator for FracMinHashJaccard {
    type Sketch = SizedFracMinHash;

    fn name(&self) -> &'static str {
        "fracminhash"
    }

    /// One pass feeds both the FracMinHash builder and the HyperLogLog
    /// sketch.
    fn build(&self, source: &dyn KmerSource) -> Result<SizedFracMinHash, Error> {
        let mut builder = FracMinHashBuilder::new(self.scale)?.deduplicate(self.deduplicate);
        let mut hll = HllSketch::new(self.precision)?;
        feed_hashed(source, self.hasher.as_ref(), |hash| {
            builder.update(hash);
            hll.update(hash);
        })?;
        Ok(SizedFracMinHash {
            sketch: builder.build(),
            cardinality: hll.estimate(),
        })
    }

    fn similarity(&self, a: &SizedFracMinHash, b: &SizedFracMinHash) -> f64 {
        let containment = a.sketch.containment(&b.sketch, a.cardinality);
        jaccard_from_containment(containment, a.cardinality, b.cardinality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::IdentityHasher;
    use crate::hash::default_hasher;

    #[test]
    fn test_exact_estimator() {
        let a = ExactJaccard.build(&vec![1u64, 2, 3]).unwrap();
        let b = ExactJaccard.build(&vec![2u64, 3, 4]).unwrap();
        assert_eq!(ExactJaccard.similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_minhash_estimator_shares_family() {
        let estimator = MinHashJaccard::new(default_hasher(), HashFamily::new(32, 1).unwrap());
        let a = estimator.build(&vec![1u64, 2, 3]).unwrap();
        let b = estimator.build(&vec![4u64, 5, 6]).unwrap();
        assert!(Arc::ptr_eq(a.family(), b.family()));
        assert_eq!(estimator.similarity(&a, &a), 1.0);
    }

    #[test]
    fn test_fracminhash_estimator_rejects_bad_config() {
        assert!(FracMinHashJaccard::new(default_hasher(), 0.0, 8).is_err());
        assert!(FracMinHashJaccard::new(default_hasher(), 0.1, 30).is_err());
    }

    #[test]
    fn test_fracminhash_identical_inputs() {
        let estimator = FracMinHashJaccard::new(Arc::new(IdentityHasher), 1.0, 8)
            .unwrap()
            .deduplicate(true);
        let values: Vec<u64> = (0..20_000u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15)).collect();
        let a = estimator.build(&values).unwrap();
        assert_eq!(a.sketch.len(), values.len());
        // identical inputs: containment 1, Jaccard 1
        assert!((estimator.similarity(&a, &a) - 1.0).abs() < 1e-9);
    }
}
